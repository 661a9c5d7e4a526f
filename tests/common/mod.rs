#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chess_core::game_data::GameRecord;
use insights::opponents::{BatchPolicy, PlayerProfile, ProfileFetch, ProfileSource};

pub const HERO: &str = "Hero";

/// A 12-move Ruy Lopez, long enough for the default 10-move minimum.
pub const RUY_LOPEZ: &str = "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 5. O-O Be7 6. Re1 b5 \
7. Bb3 d6 8. c3 O-O 9. h3 Nb8 10. d4 Nbd7 11. c4 c6 12. cxb5 axb5 *";

/// Four moves only.
pub const SHORT_GAME: &str = "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. c3 Nf6 *";

/// Build a PGN with the headers the pipeline reads.
pub fn pgn(white: &str, black: &str, termination: &str, opening: Option<&str>, moves: &str) -> String {
    let mut text = format!("[White \"{white}\"]\n[Black \"{black}\"]\n[Termination \"{termination}\"]\n");
    if let Some(slug) = opening {
        text.push_str(&format!("[ECOUrl \"https://www.chess.com/openings/{slug}\"]\n"));
    }
    text.push('\n');
    text.push_str(moves);
    text
}

/// A standard blitz game between `white` and `black`.
pub fn game(white: &str, black: &str, termination: &str, opening: Option<&str>) -> GameRecord {
    GameRecord::new(
        white,
        black,
        "chess",
        "blitz",
        Some(pgn(white, black, termination, opening, RUY_LOPEZ)),
    )
}

/// A game between Hero and `opponent`, Hero playing white when `as_white`.
pub fn hero_game(as_white: bool, opponent: &str, termination: &str, opening: Option<&str>) -> GameRecord {
    if as_white {
        game(HERO, opponent, termination, opening)
    } else {
        game(opponent, HERO, termination, opening)
    }
}

pub fn instant_policy(batch_size: usize, max_retries: u32) -> BatchPolicy {
    BatchPolicy {
        batch_size,
        batch_delay: Duration::ZERO,
        retry_after_fallback: Duration::from_millis(1),
        max_retries,
    }
}

/// In-memory profile source. Answers "rate limited" for the first
/// `rate_limits` requests, then serves the configured countries.
pub struct FakeProfiles {
    countries: HashMap<String, String>,
    rate_limits: Mutex<u32>,
    retry_after: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FakeProfiles {
    pub fn new(countries: &[(&str, &str)]) -> Self {
        Self {
            countries: countries
                .iter()
                .map(|(name, code)| (name.to_lowercase(), code.to_string()))
                .collect(),
            rate_limits: Mutex::new(0),
            retry_after: Some(Duration::from_millis(1)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rate_limited_for(self, requests: u32) -> Self {
        *self.rate_limits.lock().unwrap() = requests;
        self
    }

    /// Refuse without a `Retry-After` value.
    pub fn without_retry_after(mut self) -> Self {
        self.retry_after = None;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProfileSource for FakeProfiles {
    async fn lookup(&self, username: &str) -> ProfileFetch {
        self.calls.fetch_add(1, Ordering::SeqCst);

        {
            let mut remaining = self.rate_limits.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return ProfileFetch::RateLimited {
                    retry_after: self.retry_after,
                };
            }
        }

        match self.countries.get(&username.to_lowercase()) {
            Some(code) => ProfileFetch::Found(PlayerProfile {
                username: Some(username.to_string()),
                country: Some(format!("https://api.chess.com/pub/country/{code}")),
            }),
            None => ProfileFetch::Failed("HTTP 404 Not Found".to_string()),
        }
    }
}
