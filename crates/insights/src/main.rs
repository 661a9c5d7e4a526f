use std::io;

use indicatif::{ProgressBar, ProgressStyle};
use insights::analysis::{analyze, AnalysisRequest};
use insights::clients::chess_com::{find_archive, ChessComClient};
use insights::config::Config;
use insights::error::InsightsError;
use insights::prompt::Prompter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env();

    match run(&config).await {
        Ok(()) => Ok(()),
        Err(e @ InsightsError::ArchiveNotFound { .. }) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(config: &Config) -> Result<(), InsightsError> {
    let client = ChessComClient::new(config)?;
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let username = prompter.username()?;
    let archives = client.fetch_archives(&username).await?;
    let year = prompter.year(&archives)?;
    let month = prompter.month(year, &archives)?;
    let time_class = prompter.time_class()?;

    let archive = find_archive(&archives, year, month)?;
    println!("{}", archive.url);

    let games = client.fetch_month_games(archive).await?;
    tracing::info!(games = games.len(), year, month, "Fetched month archive");

    let request = AnalysisRequest {
        username,
        year,
        month,
        time_class,
    };

    let criteria = request.criteria(config);
    let lookups = games.iter().filter(|g| criteria.matches(g)).count();

    let bar = ProgressBar::new(lookups as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})") {
        bar.set_style(style);
    }
    bar.set_message("finding profiles");

    let report = analyze(&games, &request, config, &client, |n| bar.inc(n as u64)).await;
    bar.finish_and_clear();
    let report = report?;

    report.write_summary(&mut io::stdout().lock())?;
    let written = report.render_charts(&config.chart_dir)?;
    println!("\n{} charts written to {}", written.len(), config.chart_dir.display());

    Ok(())
}
