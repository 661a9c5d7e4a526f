use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::filter::GameType;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub user_agent: String,
    pub http_timeout: Duration,
    pub profile_batch_size: usize,
    pub batch_delay: Duration,
    pub retry_after_fallback: Duration,
    pub max_rate_limit_retries: u32,
    pub game_type: GameType,
    pub min_moves: u32,
    pub min_opening_games: u32,
    pub chart_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://api.chess.com/pub".to_string(),
            user_agent: "ChessInsights/1.0".to_string(),
            http_timeout: Duration::from_secs(30),
            profile_batch_size: 1,
            batch_delay: Duration::from_millis(70),
            retry_after_fallback: Duration::from_millis(3000),
            max_rate_limit_retries: 5,
            game_type: GameType::Standard,
            min_moves: 10,
            min_opening_games: 5,
            chart_dir: PathBuf::from("charts"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: env::var("CHESS_COM_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            user_agent: env::var("INSIGHTS_USER_AGENT").unwrap_or(defaults.user_agent),
            http_timeout: parsed("HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            profile_batch_size: parsed("PROFILE_BATCH_SIZE")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.profile_batch_size),
            batch_delay: parsed("BATCH_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.batch_delay),
            retry_after_fallback: parsed("RETRY_AFTER_FALLBACK_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_after_fallback),
            max_rate_limit_retries: parsed("MAX_RATE_LIMIT_RETRIES")
                .unwrap_or(defaults.max_rate_limit_retries),
            game_type: env::var("GAME_TYPE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.game_type),
            min_moves: parsed("MIN_MOVES").unwrap_or(defaults.min_moves),
            min_opening_games: parsed("MIN_OPENING_GAMES").unwrap_or(defaults.min_opening_games),
            chart_dir: env::var("CHART_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.chart_dir),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
