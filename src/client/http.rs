//! HTTP implementation of the game client

use async_trait::async_trait;
use std::time::Duration;

use super::wire::{self, NewGameRequest};
use super::{GameClient, validate_new_game};
use crate::config::PlaybackConfig;
use crate::error::ClientError;
use crate::types::{GameSnapshot, PhaseResult};

/// Client for the backend's `/api` endpoints
pub struct HttpGameClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGameClient {
    /// Build a client from the playback configuration
    pub fn new(config: &PlaybackConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.server_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Read the body as text whatever the status; the backend reports
    /// rejections as JSON `{error}` with a 4xx status.
    async fn read_body(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        log::trace!("backend responded {} ({} bytes)", status, body.len());
        Ok(body)
    }

    async fn fetch_state(&self) -> Result<Option<GameSnapshot>, ClientError> {
        let response = self.http.get(self.endpoint("state")).send().await?;
        let body = Self::read_body(response).await?;
        wire::decode_state(&body)
    }
}

#[async_trait]
impl GameClient for HttpGameClient {
    async fn get_state(&self) -> Option<GameSnapshot> {
        match self.fetch_state().await {
            Ok(game) => game,
            Err(e) => {
                log::warn!("Failed to fetch game state: {}", e);
                None
            }
        }
    }

    async fn new_game(
        &self,
        players: u32,
        wolves: u32,
        seed: i64,
    ) -> Result<GameSnapshot, ClientError> {
        validate_new_game(players, wolves)?;

        let request = NewGameRequest {
            n_players: players,
            n_wolves: wolves,
            seed,
        };
        let response = self
            .http
            .post(self.endpoint("new"))
            .json(&request)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        wire::decode_new_game(&body)
    }

    async fn advance(&self) -> Result<PhaseResult, ClientError> {
        let response = self.http.post(self.endpoint("advance")).send().await?;
        let body = Self::read_body(response).await?;
        wire::decode_advance(&body)
    }
}
