//! Outcome classification from Chess.com termination text.
//!
//! Termination headers read like `"hikaru won by checkmate"`,
//! `"Game drawn by repetition"` or `"MagnusCarlsen won on time"`. The
//! classifier works on substrings of that text, first match wins.

use std::collections::HashMap;

use chess_core::game_data::GameRecord;
use chess_core::opening::opening_slug;
use shakmaty::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Won,
    Lost,
    Drawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    FiftyMove,
    Repetition,
    InsufficientMaterial,
    Agreement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisiveReason {
    Resignation,
    Checkmate,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won(Option<DecisiveReason>),
    Lost(Option<DecisiveReason>),
    Drawn(Option<DrawReason>),
}

impl Outcome {
    pub fn result(&self) -> GameResult {
        match self {
            Outcome::Won(_) => GameResult::Won,
            Outcome::Lost(_) => GameResult::Lost,
            Outcome::Drawn(_) => GameResult::Drawn,
        }
    }
}

const DRAW_PATTERNS: &[(&str, DrawReason)] = &[
    ("stalemate", DrawReason::Stalemate),
    ("50-move", DrawReason::FiftyMove),
    ("repetition", DrawReason::Repetition),
    ("3-fold", DrawReason::Repetition),
    ("insufficient", DrawReason::InsufficientMaterial),
    ("agreement", DrawReason::Agreement),
];

const DECISIVE_PATTERNS: &[(&str, DecisiveReason)] = &[
    ("resignation", DecisiveReason::Resignation),
    ("checkmate", DecisiveReason::Checkmate),
    ("time", DecisiveReason::Timeout),
];

/// Classify a termination line from the point of view of `username`.
/// Returns `None` for text that is neither a draw nor a win.
pub fn classify_termination(termination: &str, username: &str) -> Option<Outcome> {
    let lower = termination.to_lowercase();

    if lower.contains("drawn") {
        let reason = DRAW_PATTERNS
            .iter()
            .find(|(pat, _)| lower.contains(pat))
            .map(|(_, reason)| *reason);
        return Some(Outcome::Drawn(reason));
    }

    if lower.contains("won") {
        let reason = DECISIVE_PATTERNS
            .iter()
            .find(|(pat, _)| lower.contains(pat))
            .map(|(_, reason)| *reason);
        // Termination text leads with the winner: "<name> won ...".
        let winner_is_subject =
            !username.is_empty() && lower.starts_with(&format!("{} won", username.to_lowercase()));
        return Some(if winner_is_subject {
            Outcome::Won(reason)
        } else {
            Outcome::Lost(reason)
        });
    }

    None
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCounts {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl ResultCounts {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn win_fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.wins) / f64::from(total),
        }
    }

    fn add(&mut self, result: GameResult) {
        match result {
            GameResult::Won => self.wins += 1,
            GameResult::Lost => self.losses += 1,
            GameResult::Drawn => self.draws += 1,
        }
    }
}

/// Opening slug → results, remembering the order openings were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpeningTally {
    order: Vec<String>,
    counts: HashMap<String, ResultCounts>,
}

impl OpeningTally {
    fn record(&mut self, slug: &str, result: GameResult) {
        if !self.counts.contains_key(slug) {
            self.order.push(slug.to_string());
        }
        self.counts.entry(slug.to_string()).or_default().add(result);
    }

    pub fn get(&self, slug: &str) -> Option<&ResultCounts> {
        self.counts.get(slug)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Openings in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultCounts)> + '_ {
        self.order
            .iter()
            .filter_map(|slug| self.counts.get(slug).map(|c| (slug.as_str(), c)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawBreakdown {
    pub stalemate: u32,
    pub fifty_move: u32,
    pub repetition: u32,
    pub insufficient_material: u32,
    pub agreement: u32,
}

impl DrawBreakdown {
    fn add(&mut self, reason: DrawReason) {
        match reason {
            DrawReason::Stalemate => self.stalemate += 1,
            DrawReason::FiftyMove => self.fifty_move += 1,
            DrawReason::Repetition => self.repetition += 1,
            DrawReason::InsufficientMaterial => self.insufficient_material += 1,
            DrawReason::Agreement => self.agreement += 1,
        }
    }

    /// Label/count pairs in chart order.
    pub fn entries(&self) -> [(&'static str, u32); 5] {
        [
            ("stalemate", self.stalemate),
            ("50 moves", self.fifty_move),
            ("repetition", self.repetition),
            ("insufficient", self.insufficient_material),
            ("agreement", self.agreement),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisiveBreakdown {
    pub resignation: u32,
    pub checkmate: u32,
    pub timeout: u32,
}

impl DecisiveBreakdown {
    fn add(&mut self, reason: DecisiveReason) {
        match reason {
            DecisiveReason::Resignation => self.resignation += 1,
            DecisiveReason::Checkmate => self.checkmate += 1,
            DecisiveReason::Timeout => self.timeout += 1,
        }
    }

    pub fn entries(&self) -> [(&'static str, u32); 3] {
        [
            ("resignation", self.resignation),
            ("checkmate", self.checkmate),
            ("timeout", self.timeout),
        ]
    }
}

/// Everything the classifier learns from one month of games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeTally {
    pub won: u32,
    pub lost: u32,
    pub drawn: u32,
    /// Games whose termination text fit none of the buckets.
    pub unclassified: u32,
    pub won_by: DecisiveBreakdown,
    pub lost_by: DecisiveBreakdown,
    pub drawn_by: DrawBreakdown,
    pub white: OpeningTally,
    pub black: OpeningTally,
}

impl OutcomeTally {
    pub fn openings(&self, color: Color) -> &OpeningTally {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn classified(&self) -> u32 {
        self.won + self.lost + self.drawn
    }

    fn record(&mut self, outcome: Outcome, color: Color, opening: Option<&str>) {
        match outcome {
            Outcome::Won(reason) => {
                self.won += 1;
                if let Some(r) = reason {
                    self.won_by.add(r);
                }
            }
            Outcome::Lost(reason) => {
                self.lost += 1;
                if let Some(r) = reason {
                    self.lost_by.add(r);
                }
            }
            Outcome::Drawn(reason) => {
                self.drawn += 1;
                if let Some(r) = reason {
                    self.drawn_by.add(r);
                }
            }
        }

        if let Some(slug) = opening {
            let tally = match color {
                Color::White => &mut self.white,
                Color::Black => &mut self.black,
            };
            tally.record(slug, outcome.result());
        }
    }
}

/// Classify every game with move text from `username`'s point of view.
pub fn classify_games(games: &[GameRecord], username: &str) -> OutcomeTally {
    let mut tally = OutcomeTally::default();

    for game in games {
        if game.pgn.is_none() || game.ply_count.is_none() {
            continue;
        }

        let outcome = game
            .termination
            .as_deref()
            .and_then(|text| classify_termination(text, username));

        let Some(outcome) = outcome else {
            tracing::debug!(termination = ?game.termination, "Unrecognised termination");
            tally.unclassified += 1;
            continue;
        };

        let opening = game.opening_url.as_deref().and_then(opening_slug);
        tally.record(outcome, game.color_of(username), opening);
    }

    tracing::info!(
        won = tally.won,
        lost = tally.lost,
        drawn = tally.drawn,
        unclassified = tally.unclassified,
        "Classified game outcomes"
    );
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_reasons() {
        let cases = [
            ("Game drawn by stalemate", DrawReason::Stalemate),
            ("Game drawn by 50-move rule", DrawReason::FiftyMove),
            ("Game drawn by repetition", DrawReason::Repetition),
            ("Game drawn by insufficient material", DrawReason::InsufficientMaterial),
            ("Game drawn by timeout vs insufficient material", DrawReason::InsufficientMaterial),
            ("Game drawn by agreement", DrawReason::Agreement),
        ];
        for (text, reason) in cases {
            assert_eq!(classify_termination(text, "me"), Some(Outcome::Drawn(Some(reason))), "{text}");
        }
    }

    #[test]
    fn test_draw_without_known_reason() {
        assert_eq!(
            classify_termination("Game drawn somehow", "me"),
            Some(Outcome::Drawn(None))
        );
    }

    #[test]
    fn test_win_and_loss_use_username() {
        assert_eq!(
            classify_termination("Hikaru won by checkmate", "hikaru"),
            Some(Outcome::Won(Some(DecisiveReason::Checkmate)))
        );
        assert_eq!(
            classify_termination("someone won on time", "hikaru"),
            Some(Outcome::Lost(Some(DecisiveReason::Timeout)))
        );
        assert_eq!(
            classify_termination("hikaru won - game abandoned", "Hikaru"),
            Some(Outcome::Won(None))
        );
    }

    #[test]
    fn test_overlapping_usernames() {
        assert_eq!(
            classify_termination("Heroic won by checkmate", "Hero"),
            Some(Outcome::Lost(Some(DecisiveReason::Checkmate)))
        );
        assert_eq!(
            classify_termination("Hero won by resignation", "Heroic"),
            Some(Outcome::Lost(Some(DecisiveReason::Resignation)))
        );
        assert_eq!(
            classify_termination("Hero won by resignation", "hero"),
            Some(Outcome::Won(Some(DecisiveReason::Resignation)))
        );
    }

    #[test]
    fn test_unknown_termination() {
        assert_eq!(classify_termination("Game aborted", "me"), None);
    }

    #[test]
    fn test_opening_tally_keeps_first_seen_order() {
        let mut tally = OpeningTally::default();
        tally.record("Sicilian", GameResult::Won);
        tally.record("French", GameResult::Lost);
        tally.record("Sicilian", GameResult::Drawn);

        let order: Vec<&str> = tally.iter().map(|(slug, _)| slug).collect();
        assert_eq!(order, vec!["Sicilian", "French"]);
        assert_eq!(
            tally.get("Sicilian"),
            Some(&ResultCounts { wins: 1, losses: 0, draws: 1 })
        );
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_win_fraction_includes_draws() {
        let counts = ResultCounts { wins: 2, losses: 1, draws: 1 };
        assert_eq!(counts.win_fraction(), 0.5);
        assert_eq!(ResultCounts::default().win_fraction(), 0.0);
    }
}
