mod common;

use std::time::Duration;

use common::{hero_game, FakeProfiles, HERO};
use insights::analysis::{analyze, AnalysisRequest};
use insights::charts::render_outcomes;
use insights::config::Config;
use insights::filter::TimeClass;
use insights::outcomes::{DecisiveBreakdown, OutcomeTally};
use insights::report::Report;

fn quick_config() -> Config {
    Config {
        batch_delay: Duration::ZERO,
        retry_after_fallback: Duration::from_millis(1),
        ..Config::default()
    }
}

fn request() -> AnalysisRequest {
    AnalysisRequest {
        username: HERO.to_string(),
        year: 2024,
        month: 3,
        time_class: TimeClass::Blitz,
    }
}

async fn sample_report() -> Report {
    let source = FakeProfiles::new(&[("anna", "DE"), ("bob", "US"), ("kai", "XK")]);
    let openings = ["Italian-Game", "Scotch-Game", "Sicilian-Defense", "French-Defense", "Caro-Kann-Defense"];

    let mut games = Vec::new();
    for (i, opening) in openings.iter().enumerate() {
        for j in 0..5 {
            let opponent = ["anna", "bob", "kai"][(i + j) % 3];
            let termination = if j < i { format!("{opponent} won by checkmate") } else { "Hero won by resignation".into() };
            games.push(hero_game(true, opponent, &termination, Some(opening)));
        }
    }
    games.push(hero_game(false, "bob", "Game drawn by repetition", Some("Pirc-Defense")));

    let mut batches = 0;
    let report = analyze(&games, &request(), &quick_config(), &source, |_| batches += 1)
        .await
        .unwrap();
    assert_eq!(batches, games.len());
    report
}

#[tokio::test]
async fn test_analyze_builds_full_report() {
    let report = sample_report().await;

    assert_eq!(report.games_analyzed, 26);
    assert_eq!(report.countries.total(), 26);
    assert_eq!(report.outcomes.classified(), 26);
    assert_eq!(report.outcomes.drawn_by.repetition, 1);

    let white = report.white_openings.as_ref().unwrap();
    let slugs: Vec<&str> = white.iter().map(|s| s.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["Italian-Game", "Scotch-Game", "Sicilian-Defense", "French-Defense", "Caro-Kann-Defense"]
    );
    assert_eq!(
        report.black_openings.as_ref().unwrap_err(),
        "Not enough data for openings (0 of 5 needed)"
    );
}

#[tokio::test]
async fn test_summary_mentions_every_section() {
    let report = sample_report().await;
    let mut out = Vec::new();
    report.write_summary(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Hero | 2024/03 | blitz | 26 games"));
    assert!(text.contains("Kosovo"));
    assert!(text.contains("Won 15 | Lost 10 | Drawn 1"));
    assert!(text.contains("Best openings with white:"));
    assert!(text.contains("Not enough data for openings"));
}

#[tokio::test]
async fn test_charts_written_as_svg() {
    let report = sample_report().await;
    let dir = tempfile::tempdir().unwrap();
    let chart_dir = dir.path().join("charts");

    let written = report.render_charts(&chart_dir).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["countries.svg", "outcomes.svg", "openings_white.svg"]);
    for path in &written {
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
    }
}

#[test]
fn test_outcome_pies_skip_empty_slices() {
    let outcomes = OutcomeTally {
        won: 3,
        won_by: DecisiveBreakdown { resignation: 0, checkmate: 3, timeout: 0 },
        ..OutcomeTally::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("outcomes.svg");

    render_outcomes(&path, &outcomes, "rapid").unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<polygon"));
    assert!(svg.contains("Games(rapid) Won"));
    assert!(!svg.contains("Games(rapid) Lost"));
}
