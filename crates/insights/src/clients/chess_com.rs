use std::time::Duration;

use chess_core::game_data::{ArchivedGame, GameRecord};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::Config;
use crate::error::InsightsError;
use crate::opponents::{PlayerProfile, ProfileFetch, ProfileSource};

/// One monthly archive listed for a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub year: i32,
    pub month: u32,
    pub url: String,
}

#[derive(Deserialize)]
struct ArchivesResponse {
    #[serde(default)]
    archives: Vec<String>,
}

#[derive(Deserialize)]
struct MonthGamesResponse {
    #[serde(default)]
    games: Vec<ArchivedGame>,
}

pub struct ChessComClient {
    client: Client,
    api_base: String,
}

impl ChessComClient {
    pub fn new(config: &Config) -> Result<Self, InsightsError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    /// Fetch the monthly archives that contain games, oldest first.
    pub async fn fetch_archives(&self, username: &str) -> Result<Vec<Archive>, InsightsError> {
        let url = format!("{}/player/{}/games/archives", self.api_base, username);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(InsightsError::Api(format!("Archives HTTP {}", resp.status())));
        }

        let data: ArchivesResponse = resp.json().await?;
        let mut archives: Vec<Archive> = data
            .archives
            .iter()
            .filter_map(|url| parse_archive_url(url))
            .collect();

        archives.sort_by_key(|a| (a.year, a.month));
        tracing::debug!(username, count = archives.len(), "Fetched archive list");
        Ok(archives)
    }

    /// Fetch every game of one monthly archive.
    pub async fn fetch_month_games(&self, archive: &Archive) -> Result<Vec<GameRecord>, InsightsError> {
        let resp = self.client.get(&archive.url).send().await?;
        if !resp.status().is_success() {
            return Err(InsightsError::Api(format!(
                "{}/{:02} HTTP {}",
                archive.year,
                archive.month,
                resp.status()
            )));
        }

        let data: MonthGamesResponse = resp.json().await?;
        Ok(data.games.into_iter().map(GameRecord::from).collect())
    }

    /// Look up one player's profile.
    pub async fn fetch_profile(&self, username: &str) -> ProfileFetch {
        let url = format!("{}/player/{}", self.api_base, username.to_lowercase());

        let resp = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => return ProfileFetch::Failed(format!("Request error: {e}")),
        };

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return ProfileFetch::RateLimited {
                retry_after: retry_after(resp.headers()),
            };
        }

        if !resp.status().is_success() {
            return ProfileFetch::Failed(format!("HTTP {}", resp.status()));
        }

        match resp.json::<PlayerProfile>().await {
            Ok(profile) => ProfileFetch::Found(profile),
            Err(e) => ProfileFetch::Failed(format!("JSON parse error: {e}")),
        }
    }
}

impl ProfileSource for ChessComClient {
    async fn lookup(&self, username: &str) -> ProfileFetch {
        self.fetch_profile(username).await
    }
}

/// Parse `https://api.chess.com/pub/player/<name>/games/2024/03` into an archive.
pub fn parse_archive_url(url: &str) -> Option<Archive> {
    let parts: Vec<&str> = url.trim_end_matches('/').rsplit('/').collect();
    let month: u32 = parts.first()?.parse().ok()?;
    let year: i32 = parts.get(1)?.parse().ok()?;
    if parts.get(2) != Some(&"games") || !(1..=12).contains(&month) {
        return None;
    }
    Some(Archive {
        year,
        month,
        url: url.to_string(),
    })
}

/// The archive for `year`/`month`, if the player has one.
pub fn find_archive(archives: &[Archive], year: i32, month: u32) -> Result<&Archive, InsightsError> {
    archives
        .iter()
        .find(|a| a.year == year && a.month == month)
        .ok_or(InsightsError::ArchiveNotFound { year, month })
}

/// `Retry-After` in whole milliseconds.
/// Missing or unparsable values yield `None`, letting the caller fall back.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_millis)
}
