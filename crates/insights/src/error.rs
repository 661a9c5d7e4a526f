use chess_core::country::CountryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("archive not found")]
    ArchiveNotFound { year: i32, month: u32 },

    #[error("Chess.com request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chess.com API error: {0}")]
    Api(String),

    #[error("Profile lookup for {username} failed: {message}")]
    Profile { username: String, message: String },

    #[error("Still rate limited after {retries} retries")]
    RateLimitExhausted { retries: u32 },

    #[error(transparent)]
    Country(#[from] CountryError),

    #[error("Not enough data for openings ({found} of {required} needed)")]
    NotEnoughOpenings { found: usize, required: usize },

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
