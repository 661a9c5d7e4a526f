//! The fetch-independent part of a run: filter, aggregate, classify, rank.

use chess_core::game_data::GameRecord;

use crate::config::Config;
use crate::error::InsightsError;
use crate::filter::{filter_games, FilterCriteria, TimeClass};
use crate::opponents::{aggregate_countries, BatchPolicy, ProfileSource};
use crate::outcomes::classify_games;
use crate::report::Report;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub username: String,
    pub year: i32,
    pub month: u32,
    pub time_class: TimeClass,
}

impl AnalysisRequest {
    pub fn criteria(&self, config: &Config) -> FilterCriteria {
        FilterCriteria {
            game_type: config.game_type,
            time_class: Some(self.time_class.as_str().to_string()),
            minimum_moves: Some(config.min_moves),
        }
    }
}

/// Build the report for one month of `games`.
/// `on_batch` is told how many profiles each finished lookup batch resolved.
pub async fn analyze<P: ProfileSource>(
    games: &[GameRecord],
    request: &AnalysisRequest,
    config: &Config,
    profiles: &P,
    on_batch: impl FnMut(usize),
) -> Result<Report, InsightsError> {
    let filtered = filter_games(games, &request.criteria(config));
    tracing::info!(
        fetched = games.len(),
        analyzed = filtered.len(),
        time_class = %request.time_class,
        "Selected games"
    );

    let policy = BatchPolicy::from(config);
    let countries = aggregate_countries(profiles, &filtered, &request.username, &policy, on_batch).await?;
    let outcomes = classify_games(&filtered, &request.username);

    Ok(Report::new(
        &request.username,
        (request.year, request.month),
        request.time_class.as_str(),
        filtered.len(),
        countries,
        outcomes,
        config.min_opening_games,
    ))
}
