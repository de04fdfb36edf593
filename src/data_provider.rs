/// Trait for providing player data, abstracting over the real HTTP client and mock implementations
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;
use crate::types::PlayerRecord;

/// Request timeout for the bulk player endpoint
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for player data providers, implemented by both the real Client and MockClient
#[async_trait]
pub trait PlayerDataProvider: Send + Sync {
    /// Get every player with their current stat line
    async fn players(&self) -> Result<Vec<PlayerRecord>, ApiError>;
}

/// HTTP client for the game info service
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Build)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn players_url(&self) -> String {
        format!("{}/api/players", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PlayerDataProvider for Client {
    async fn players(&self) -> Result<Vec<PlayerRecord>, ApiError> {
        let url = self.players_url();
        debug!("Fetching players from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let players: Vec<PlayerRecord> = response.json().await.map_err(ApiError::Decode)?;
        debug!("Fetched {} players", players.len());
        Ok(players)
    }
}
