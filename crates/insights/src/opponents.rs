//! Opponent country statistics via batched profile lookups.

use std::future::Future;
use std::time::Duration;

use chess_core::country::{resolve_country, CountryError};
use chess_core::game_data::GameRecord;
use futures::future::join_all;
use serde::Deserialize;

use crate::config::Config;
use crate::error::InsightsError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub username: Option<String>,
    /// Country URL, e.g. `https://api.chess.com/pub/country/US`.
    #[serde(default)]
    pub country: Option<String>,
}

/// Result of a single profile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFetch {
    Found(PlayerProfile),
    RateLimited { retry_after: Option<Duration> },
    Failed(String),
}

/// Anything that can look up a player profile.
pub trait ProfileSource {
    fn lookup(&self, username: &str) -> impl Future<Output = ProfileFetch> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPolicy {
    pub batch_size: usize,
    /// Pause after every completed batch.
    pub batch_delay: Duration,
    /// Used when a rate-limited response carries no usable `Retry-After`.
    pub retry_after_fallback: Duration,
    pub max_retries: u32,
}

impl From<&Config> for BatchPolicy {
    fn from(config: &Config) -> Self {
        Self {
            batch_size: config.profile_batch_size.max(1),
            batch_delay: config.batch_delay,
            retry_after_fallback: config.retry_after_fallback,
            max_retries: config.max_rate_limit_retries,
        }
    }
}

/// Country display name → opponent occurrences, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTally {
    entries: Vec<(String, u32)>,
}

impl CountryTally {
    fn add(&mut self, country: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == country) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((country.to_string(), 1)),
        }
    }

    pub fn get(&self, country: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == country)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

/// The opponent of every game, duplicates kept.
pub fn opponents(games: &[GameRecord], username: &str) -> Vec<String> {
    games
        .iter()
        .map(|game| game.opponent_of(username).to_string())
        .collect()
}

enum BatchOutcome {
    Done(Vec<PlayerProfile>),
    RateLimited(Option<Duration>),
    Failed { username: String, message: String },
}

fn settle(batch: &[String], results: Vec<ProfileFetch>) -> BatchOutcome {
    let mut profiles = Vec::with_capacity(results.len());
    let mut rate_limited = false;
    let mut wait: Option<Duration> = None;

    for (username, result) in batch.iter().zip(results) {
        match result {
            ProfileFetch::Found(profile) => profiles.push(profile),
            ProfileFetch::RateLimited { retry_after } => {
                rate_limited = true;
                wait = wait.max(retry_after);
            }
            ProfileFetch::Failed(message) => {
                return BatchOutcome::Failed {
                    username: username.clone(),
                    message,
                }
            }
        }
    }

    if rate_limited {
        BatchOutcome::RateLimited(wait)
    } else {
        BatchOutcome::Done(profiles)
    }
}

/// Look up every username, `policy.batch_size` requests at a time.
///
/// Requests inside a batch run concurrently; batches run one after another.
/// A rate-limited batch is retried whole after the server's `Retry-After`
/// (or the fallback), at most `policy.max_retries` times in a row.
/// `on_batch` is called with the size of each completed batch.
pub async fn fetch_profiles<P: ProfileSource>(
    source: &P,
    usernames: &[String],
    policy: &BatchPolicy,
    mut on_batch: impl FnMut(usize),
) -> Result<Vec<PlayerProfile>, InsightsError> {
    let mut profiles = Vec::with_capacity(usernames.len());

    for batch in usernames.chunks(policy.batch_size.max(1)) {
        let mut retries = 0;
        loop {
            let results = join_all(batch.iter().map(|name| source.lookup(name))).await;

            match settle(batch, results) {
                BatchOutcome::Done(found) => {
                    profiles.extend(found);
                    on_batch(batch.len());
                    tokio::time::sleep(policy.batch_delay).await;
                    break;
                }
                BatchOutcome::RateLimited(retry_after) => {
                    if retries >= policy.max_retries {
                        return Err(InsightsError::RateLimitExhausted { retries });
                    }
                    retries += 1;
                    let wait = retry_after.unwrap_or(policy.retry_after_fallback);
                    tracing::warn!(
                        wait_ms = wait.as_millis() as u64,
                        attempt = retries,
                        "Rate limited by Chess.com, retrying batch"
                    );
                    tokio::time::sleep(wait).await;
                }
                BatchOutcome::Failed { username, message } => {
                    return Err(InsightsError::Profile { username, message });
                }
            }
        }
    }

    Ok(profiles)
}

/// Count profiles per country. Any profile without a resolvable country is an error.
pub fn tally_countries(profiles: &[PlayerProfile]) -> Result<CountryTally, InsightsError> {
    let mut tally = CountryTally::default();
    for profile in profiles {
        let field = profile.country.as_deref().ok_or_else(|| {
            CountryError::Malformed(profile.username.clone().unwrap_or_default())
        })?;
        tally.add(resolve_country(field)?);
    }
    Ok(tally)
}

/// Resolve the opponents of `games` to a country tally.
pub async fn aggregate_countries<P: ProfileSource>(
    source: &P,
    games: &[GameRecord],
    username: &str,
    policy: &BatchPolicy,
    on_batch: impl FnMut(usize),
) -> Result<CountryTally, InsightsError> {
    let names = opponents(games, username);
    tracing::info!(opponents = names.len(), batch_size = policy.batch_size, "Looking up opponent profiles");

    let profiles = fetch_profiles(source, &names, policy, on_batch).await?;
    let tally = tally_countries(&profiles)?;

    tracing::info!(countries = tally.len(), "Aggregated opponent countries");
    Ok(tally)
}
