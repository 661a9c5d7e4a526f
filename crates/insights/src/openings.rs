//! Opening performance ranking.

use chess_core::opening::prettify_opening;
use shakmaty::Color;

use crate::error::InsightsError;
use crate::outcomes::OutcomeTally;

/// How many openings a ranking shows.
pub const TOP_OPENINGS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct OpeningScore {
    pub slug: String,
    pub win_fraction: f64,
    pub games: u32,
}

impl OpeningScore {
    /// Chart label with line breaks for long names.
    pub fn label(&self) -> String {
        prettify_opening(&self.slug)
    }
}

/// Best openings for `color` by wins / (wins + losses + draws), among
/// openings played at least `minimum_games` times.
///
/// Ties keep first-seen order. Fewer than [`TOP_OPENINGS`] qualifying
/// openings is reported as [`InsightsError::NotEnoughOpenings`].
pub fn top_openings(
    tally: &OutcomeTally,
    color: Color,
    minimum_games: u32,
) -> Result<Vec<OpeningScore>, InsightsError> {
    let mut scores: Vec<OpeningScore> = tally
        .openings(color)
        .iter()
        .filter(|(_, counts)| counts.total() >= minimum_games && counts.total() > 0)
        .map(|(slug, counts)| OpeningScore {
            slug: slug.to_string(),
            win_fraction: counts.win_fraction(),
            games: counts.total(),
        })
        .collect();

    if scores.len() < TOP_OPENINGS {
        return Err(InsightsError::NotEnoughOpenings {
            found: scores.len(),
            required: TOP_OPENINGS,
        });
    }

    // sort_by is stable
    scores.sort_by(|a, b| b.win_fraction.total_cmp(&a.win_fraction));
    scores.truncate(TOP_OPENINGS);
    Ok(scores)
}
