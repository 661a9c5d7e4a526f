use serde::Deserialize;
use shakmaty::Color;

use crate::pgn;

/// Rules tag Chess.com uses for standard chess.
pub const STANDARD_RULES: &str = "chess";

#[derive(Debug, Clone, Deserialize)]
pub struct ArchivedPlayer {
    pub username: String,
}

/// A game as it appears in a Chess.com monthly archive.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchivedGame {
    pub white: ArchivedPlayer,
    pub black: ArchivedPlayer,
    #[serde(default = "default_rules")]
    pub rules: String,
    #[serde(default)]
    pub time_class: String,
    #[serde(default)]
    pub pgn: Option<String>,
}

fn default_rules() -> String {
    STANDARD_RULES.to_string()
}

/// One game of the analysed month. The PGN is parsed once on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub white_username: String,
    pub black_username: String,
    pub rules: String,
    pub time_class: String,
    pub pgn: Option<String>,
    pub termination: Option<String>,
    pub opening_url: Option<String>,
    /// Half-moves in the mainline; `None` when the move text is missing or unreadable.
    pub ply_count: Option<usize>,
}

impl GameRecord {
    pub fn new(
        white_username: impl Into<String>,
        black_username: impl Into<String>,
        rules: impl Into<String>,
        time_class: impl Into<String>,
        pgn_text: Option<String>,
    ) -> Self {
        let summary = pgn_text.as_deref().and_then(pgn::parse_pgn);
        let (termination, opening_url, ply_count) = match summary {
            Some(s) => (s.termination, s.eco_url, Some(s.ply_count)),
            None => (None, None, None),
        };

        Self {
            white_username: white_username.into(),
            black_username: black_username.into(),
            rules: rules.into(),
            time_class: time_class.into(),
            pgn: pgn_text,
            termination,
            opening_url,
            ply_count,
        }
    }

    pub fn is_standard(&self) -> bool {
        self.rules == STANDARD_RULES
    }

    /// Full moves played, rounding a trailing white move up.
    pub fn move_count(&self) -> Option<usize> {
        self.ply_count.map(|plies| plies.div_ceil(2))
    }

    /// Colour the given player had. Anyone who is not white is treated as black.
    pub fn color_of(&self, username: &str) -> Color {
        if self.white_username.eq_ignore_ascii_case(username) {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn opponent_of(&self, username: &str) -> &str {
        match self.color_of(username) {
            Color::White => &self.black_username,
            Color::Black => &self.white_username,
        }
    }
}

impl From<ArchivedGame> for GameRecord {
    fn from(game: ArchivedGame) -> Self {
        GameRecord::new(
            game.white.username,
            game.black.username,
            game.rules,
            game.time_class,
            game.pgn,
        )
    }
}
