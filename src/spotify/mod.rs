//! # Spotify Integration Module
//!
//! This module is the boundary between the collector and the Spotify Web API.
//! Everything the pipeline needs from the remote catalog goes through the
//! [`CatalogClient`] trait, which the HTTP client [`SpotifyClient`] implements
//! and which tests replace with an in-memory catalog.
//!
//! ## Architecture
//!
//! ```text
//! Collector (discovery, tracks, features)
//!          ↓
//! CatalogClient trait
//!          ↓
//! SpotifyClient
//!     ├── Authentication (client credentials)
//!     ├── Playlist Operations (featured, search, items)
//!     └── Audio Features (batch lookup)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Response Mapping
//!
//! Raw responses are deserialized into the wire types in [`crate::types`] and
//! mapped to typed records before they leave this module. Null playlist
//! entries and playlists without an id are dropped here, so the collector
//! never sees them.
//!
//! ## Error Handling
//!
//! Failures are reported as [`CatalogError`]. The client never retries: a
//! `429 Too Many Requests` is surfaced as [`CatalogError::RateLimited`] and
//! the collector decides what to skip. The only rate-limit measure is the
//! fixed pause the collector inserts between calls.
//!
//! ## API Coverage
//!
//! - `GET /browse/featured-playlists` - Featured playlists for a market
//! - `GET /search?type=playlist` - Keyword playlist search
//! - `GET /playlists/{id}/tracks` - Playlist entries with pagination
//! - `GET /audio-features?ids=` - Batch audio features (max 100 ids)
//! - `POST /api/token` - Client-credentials token request

pub mod auth;
pub mod features;
pub mod playlists;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    Res, config,
    management::TokenManager,
    types::{CountryCode, FeatureRecord, Page, Playlist, PlaylistItem},
};

/// Maximum number of ids the audio-features endpoint accepts per call.
pub const AUDIO_FEATURES_BATCH_LIMIT: usize = 100;

/// Errors reported by a [`CatalogClient`].
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Connection failures, timeouts and undecodable bodies.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The access token could not be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The service declines a feature for the requested market.
    #[error("{feature} not available for {country}")]
    Unsupported { feature: String, country: String },

    /// The service asked us to slow down.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Any other non-success response.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid request URL: {0}")]
    Url(String),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Remote catalog operations the collector depends on.
///
/// Pages carry the service's next-page cursor; following a cursor is a
/// separate call so the caller controls how far pagination goes.
#[async_trait(?Send)]
pub trait CatalogClient {
    /// First page of the featured playlists for a market.
    async fn featured_playlists(
        &self,
        country: &CountryCode,
        limit: u32,
    ) -> CatalogResult<Page<Playlist>>;

    /// First page of a keyword search restricted to playlists.
    async fn search_playlists(&self, query: &str, limit: u32) -> CatalogResult<Page<Playlist>>;

    /// Follows the cursor of a featured or search page.
    async fn next_playlist_page(&self, cursor: &str) -> CatalogResult<Page<Playlist>>;

    /// First page of a playlist's entries.
    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> CatalogResult<Page<PlaylistItem>>;

    /// Follows the cursor of a playlist entries page.
    async fn next_item_page(&self, cursor: &str) -> CatalogResult<Page<PlaylistItem>>;

    /// Audio features for at most [`AUDIO_FEATURES_BATCH_LIMIT`] ids. The
    /// result is positional; ids the service cannot resolve yield `None`.
    async fn audio_features(&self, ids: &[String]) -> CatalogResult<Vec<Option<FeatureRecord>>>;
}

/// HTTP implementation of [`CatalogClient`] against the Spotify Web API.
///
/// Constructed once per process and passed by reference to every component
/// that issues remote calls.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(api_url: String, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Builds a client from the configured credentials, reusing a cached
    /// token when it is still valid.
    pub async fn connect() -> Res<Self> {
        let credentials = auth::Credentials::from_env()?;
        let tokens = TokenManager::load_or_request(credentials).await?;
        Ok(Self::new(config::spotify_apiurl(), tokens))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> CatalogResult<Url> {
        let base = format!("{}/{}", self.api_url, path.trim_start_matches('/'));
        Url::parse_with_params(&base, params).map_err(|e| CatalogError::Url(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> CatalogResult<T> {
        let token = {
            let mut token_mgr = self.tokens.lock().await;
            token_mgr
                .get_valid_token()
                .await
                .map_err(|e| CatalogError::Auth(e.to_string()))?
        };

        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0);
            return Err(CatalogError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        Err(CatalogError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        })
    }
}

/// Extracts `error.message` from a Spotify error body, falling back to the
/// raw body.
pub fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v["error"]["message"]
                .as_str()
                .or_else(|| v["error_description"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait(?Send)]
impl CatalogClient for SpotifyClient {
    async fn featured_playlists(
        &self,
        country: &CountryCode,
        limit: u32,
    ) -> CatalogResult<Page<Playlist>> {
        playlists::get_featured(self, country, limit).await
    }

    async fn search_playlists(&self, query: &str, limit: u32) -> CatalogResult<Page<Playlist>> {
        playlists::search(self, query, limit).await
    }

    async fn next_playlist_page(&self, cursor: &str) -> CatalogResult<Page<Playlist>> {
        playlists::get_next_playlists(self, cursor).await
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> CatalogResult<Page<PlaylistItem>> {
        playlists::get_items(self, playlist_id, limit).await
    }

    async fn next_item_page(&self, cursor: &str) -> CatalogResult<Page<PlaylistItem>> {
        playlists::get_next_items(self, cursor).await
    }

    async fn audio_features(&self, ids: &[String]) -> CatalogResult<Vec<Option<FeatureRecord>>> {
        features::get_audio_features(self, ids).await
    }
}
