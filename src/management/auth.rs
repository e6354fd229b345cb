use std::path::PathBuf;

use chrono::Utc;

use crate::{
    Res, config,
    spotify::auth::{Credentials, request_token},
    types::Token,
};

/// Seconds before the real expiry at which a token is already treated as
/// expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    credentials: Credentials,
    token: Token,
}

impl TokenManager {
    pub fn new(credentials: Credentials, token: Token) -> Self {
        TokenManager { credentials, token }
    }

    pub async fn load(credentials: Credentials) -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { credentials, token })
    }

    /// Reuses the cached token while it is valid, otherwise requests and
    /// caches a fresh one.
    pub async fn load_or_request(credentials: Credentials) -> Res<Self> {
        if let Ok(manager) = Self::load(credentials.clone()).await {
            if !manager.is_expired() {
                return Ok(manager);
            }
        }

        let token = request_token(&credentials).await?;
        let manager = Self::new(credentials, token);
        manager.persist().await?;
        Ok(manager)
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn get_valid_token(&mut self) -> Res<String> {
        if self.is_expired() {
            self.token = request_token(&self.credentials).await?;
            // cache write failures are not fatal
            let _ = self.persist().await;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        is_expired_at(&self.token, now)
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

/// Whether `token` counts as expired at `now`, honoring the early-expiry
/// margin. Corrupt cache values saturate instead of overflowing.
pub fn is_expired_at(token: &Token, now: u64) -> bool {
    now >= token
        .obtained_at
        .saturating_add(token.expires_in.saturating_sub(EXPIRY_MARGIN_SECS))
}
