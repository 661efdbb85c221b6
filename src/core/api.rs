//! YouTube Data API transport
//!
//! The resolver and the aggregator only ever issue authenticated GETs that
//! return JSON, so the whole upstream surface is one trait method. Tests swap
//! in a canned implementation.

use crate::error::{FavtubeError, Result};
use crate::types::Config;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("favtube/", env!("CARGO_PKG_VERSION"));

/// Endpoints of the YouTube Data API v3 used by favtube
pub mod endpoint {
    pub const SEARCH: &str = "search";
    pub const CHANNELS: &str = "channels";
    pub const PLAYLIST_ITEMS: &str = "playlistItems";
    pub const VIDEOS: &str = "videos";
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `endpoint` with query `params` and return the decoded JSON body
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<serde_json::Value>;
}

/// Transport backed by reqwest, authenticated with a static API key
pub struct ApiTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiTransport {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FavtubeError::MissingApiKey);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.api_key,
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl Transport for ApiTransport {
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
        let url = self.build_url(endpoint);
        debug!(%url, ?params, "GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FavtubeError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            FavtubeError::YouTubeParse(format!("{} returned invalid JSON: {}", endpoint, e))
        })
    }
}
