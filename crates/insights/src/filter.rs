//! Game selection by rules, time class and length.

use std::fmt;
use std::str::FromStr;

use chess_core::game_data::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    /// Regular chess (`rules == "chess"`).
    Standard,
    /// Anything else: chess960, crazyhouse, bughouse...
    Variant,
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(GameType::Standard),
            "variant" => Ok(GameType::Variant),
            other => Err(format!("unknown game type {other:?}")),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Standard => f.write_str("standard"),
            GameType::Variant => f.write_str("variant"),
        }
    }
}

/// Pacing categories offered for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeClass {
    Rapid,
    Blitz,
    Bullet,
}

impl TimeClass {
    pub const ALL: [TimeClass; 3] = [TimeClass::Rapid, TimeClass::Blitz, TimeClass::Bullet];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeClass::Rapid => "rapid",
            TimeClass::Blitz => "blitz",
            TimeClass::Bullet => "bullet",
        }
    }

    /// Menu index: 0 rapid, 1 blitz, 2 bullet.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for TimeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub game_type: GameType,
    pub time_class: Option<String>,
    pub minimum_moves: Option<u32>,
}

impl FilterCriteria {
    pub fn matches(&self, game: &GameRecord) -> bool {
        let Some(moves) = game.move_count() else {
            return false;
        };

        let type_ok = match self.game_type {
            GameType::Standard => game.is_standard(),
            GameType::Variant => !game.is_standard(),
        };
        if !type_ok {
            return false;
        }

        if let Some(ref time_class) = self.time_class {
            if *time_class != game.time_class {
                return false;
            }
        }

        match self.minimum_moves {
            Some(min) => moves >= min as usize,
            None => true,
        }
    }
}

/// Games satisfying `criteria`, in their original order.
pub fn filter_games(games: &[GameRecord], criteria: &FilterCriteria) -> Vec<GameRecord> {
    let filtered: Vec<GameRecord> = games
        .iter()
        .filter(|game| criteria.matches(game))
        .cloned()
        .collect();

    tracing::debug!(
        total = games.len(),
        kept = filtered.len(),
        game_type = %criteria.game_type,
        time_class = ?criteria.time_class,
        "Filtered games"
    );
    filtered
}
