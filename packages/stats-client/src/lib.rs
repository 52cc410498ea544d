//! HTTP client for the ventti stats store.
//!
//! The store keeps one `{wins, losses, draws}` record per player name. Names
//! travel as a single URL-encoded path segment and are used verbatim as the
//! record key; any trimming or case folding is the caller's business.

use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Timeout for every request to the store.
const TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for stats store operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed: {0}")]
    Failed(StatusCode),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("base URL cannot carry path segments")]
    BaseUrl,
}

/// Result type for stats store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Per-player counter record, as stored by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
}

impl Stats {
    pub fn games_played(&self) -> u64 {
        self.wins + self.losses + self.draws
    }

    /// Win percentage over all games played. Draws count as played games
    /// (wins / (wins + losses + draws) * 100), zero before the first game.
    pub fn win_rate(&self) -> f64 {
        let played = self.games_played();
        if played == 0 {
            return 0.0;
        }
        self.wins as f64 / played as f64 * 100.0
    }
}

/// The counter an increment targets. Serializes to the lowercase path
/// segment the wire protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Wins,
    Losses,
    Draws,
}

impl StatKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::Wins => "wins",
            StatKey::Losses => "losses",
            StatKey::Draws => "draws",
        }
    }
}

impl std::str::FromStr for StatKey {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "wins" => Ok(StatKey::Wins),
            "losses" => Ok(StatKey::Losses),
            "draws" => Ok(StatKey::Draws),
            _ => Err(()),
        }
    }
}

/// Stats store API client.
#[derive(Clone)]
pub struct StatsClient {
    base_url: Url,
    http_client: HttpClient,
}

impl StatsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let http_client = HttpClient::builder().timeout(TIMEOUT).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    fn player_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::BaseUrl)?
            .push("players")
            .push(name);
        Ok(url)
    }

    fn stat_url(&self, name: &str, key: StatKey) -> Result<Url> {
        let mut url = self.player_url(name)?;
        url.path_segments_mut()
            .map_err(|_| Error::BaseUrl)?
            .push(key.as_str());
        Ok(url)
    }

    /// Look up a player's record. `None` when the store has no record.
    pub async fn fetch(&self, name: &str) -> Result<Option<Stats>> {
        let response = self.http_client.get(self.player_url(name)?).send().await?;
        match response.status() {
            StatusCode::OK => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(Error::Failed(status)),
        }
    }

    /// Create a zeroed record. The store answers `200` with the existing
    /// record when one is already there, and never zeroes it.
    pub async fn create(&self, name: &str) -> Result<Stats> {
        let response = self.http_client.post(self.player_url(name)?).send().await?;
        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(response.json().await?),
            status => Err(Error::Failed(status)),
        }
    }

    /// Bump one counter and return the updated record.
    pub async fn increment(&self, name: &str, key: StatKey) -> Result<Stats> {
        let response = self
            .http_client
            .post(self.stat_url(name, key)?)
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => Err(Error::Failed(status)),
        }
    }

    /// Remove a player's record. Deletion is idempotent, so a missing record
    /// counts as success.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.player_url(name)?)
            .send()
            .await?;
        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK | StatusCode::NOT_FOUND => Ok(()),
            status => Err(Error::Failed(status)),
        }
    }

    /// Look up a player's record, creating a zeroed one when the store has
    /// none. The call every login goes through.
    pub async fn fetch_or_create(&self, name: &str) -> Result<Stats> {
        match self.fetch(name).await? {
            Some(stats) => Ok(stats),
            None => self.create(name).await,
        }
    }
}
