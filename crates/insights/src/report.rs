//! Plain-text summary of a run and chart output.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use shakmaty::Color;

use crate::charts;
use crate::error::InsightsError;
use crate::openings::{top_openings, OpeningScore};
use crate::opponents::CountryTally;
use crate::outcomes::OutcomeTally;

/// Aggregated results of one analysed month.
#[derive(Debug, Clone)]
pub struct Report {
    pub username: String,
    pub year: i32,
    pub month: u32,
    pub time_class: String,
    pub games_analyzed: usize,
    pub countries: CountryTally,
    pub outcomes: OutcomeTally,
    pub white_openings: Result<Vec<OpeningScore>, String>,
    pub black_openings: Result<Vec<OpeningScore>, String>,
}

impl Report {
    pub fn new(
        username: &str,
        (year, month): (i32, u32),
        time_class: &str,
        games_analyzed: usize,
        countries: CountryTally,
        outcomes: OutcomeTally,
        min_opening_games: u32,
    ) -> Self {
        let ranking = |color| top_openings(&outcomes, color, min_opening_games).map_err(|e| e.to_string());
        let white_openings = ranking(Color::White);
        let black_openings = ranking(Color::Black);

        Self {
            username: username.to_string(),
            year,
            month,
            time_class: time_class.to_string(),
            games_analyzed,
            countries,
            outcomes,
            white_openings,
            black_openings,
        }
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{} | {}/{:02} | {} | {} games",
            self.username, self.year, self.month, self.time_class, self.games_analyzed
        )?;

        writeln!(out, "\nOpponent countries:")?;
        let total = self.games_analyzed.max(1) as f64;
        for (country, count) in self.countries.iter() {
            writeln!(out, "  {country:<32} {count:>4}  {:>5.1}%", f64::from(count) / total * 100.0)?;
        }

        let o = &self.outcomes;
        writeln!(out, "\nWon {} | Lost {} | Drawn {}", o.won, o.lost, o.drawn)?;
        if o.unclassified > 0 {
            writeln!(out, "  ({} games with unrecognised termination)", o.unclassified)?;
        }
        write_breakdown(out, "Won by", &o.won_by.entries())?;
        write_breakdown(out, "Lost by", &o.lost_by.entries())?;
        write_breakdown(out, "Drawn by", &o.drawn_by.entries())?;

        for (color, ranking) in [("white", &self.white_openings), ("black", &self.black_openings)] {
            writeln!(out, "\nBest openings with {color}:")?;
            match ranking {
                Ok(scores) => {
                    for score in scores {
                        writeln!(
                            out,
                            "  {:<48} {:>5.1}%  ({} games)",
                            score.slug,
                            score.win_fraction * 100.0,
                            score.games
                        )?;
                    }
                }
                Err(message) => writeln!(out, "  {message}")?,
            }
        }

        Ok(())
    }

    /// Write every chart into `dir`, returning the files created.
    pub fn render_charts(&self, dir: &Path) -> Result<Vec<PathBuf>, InsightsError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        let path = dir.join("countries.svg");
        charts::render_countries(&path, &self.countries, self.games_analyzed)?;
        written.push(path);

        let path = dir.join("outcomes.svg");
        charts::render_outcomes(&path, &self.outcomes, &self.time_class)?;
        written.push(path);

        for (color, ranking) in [("white", &self.white_openings), ("black", &self.black_openings)] {
            let Ok(scores) = ranking else {
                continue;
            };
            let path = dir.join(format!("openings_{color}.svg"));
            let x_desc = format!("Opening({}) with {}", self.time_class, color);
            charts::render_openings(&path, scores, &x_desc)?;
            written.push(path);
        }

        for path in &written {
            tracing::info!(path = %path.display(), "Chart written");
        }
        Ok(written)
    }
}

fn write_breakdown<W: Write>(out: &mut W, heading: &str, entries: &[(&str, u32)]) -> io::Result<()> {
    let parts: Vec<String> = entries
        .iter()
        .map(|(label, count)| format!("{label} {count}"))
        .collect();
    writeln!(out, "  {heading}: {}", parts.join(", "))
}
