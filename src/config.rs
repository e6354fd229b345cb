//! Configuration management for the dataset collector.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{Res, types::CountryCode};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_REQUEST_PAUSE_MS: u64 = 1000;

/// Returns the application's directory inside the platform data dir.
///
/// - Linux: `~/.local/share/tunecensus`
/// - macOS: `~/Library/Application Support/tunecensus`
/// - Windows: `%LOCALAPPDATA%/tunecensus`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunecensus");
    path
}

/// Loads environment variables from `.env` in the local data directory.
///
/// Creates the directory if needed. A missing `.env` file is fine since every
/// value can also be supplied through the process environment; variables
/// already set in the environment are never overridden.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn required(key: &str) -> Res<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!(
            "{} must be set (environment or {})",
            key,
            data_dir().join(".env").display()
        )
        .into()),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Client ID of the registered Spotify application (`SPOTIFY_CLIENT_ID`).
pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_CLIENT_ID")
}

/// Client secret of the registered Spotify application
/// (`SPOTIFY_CLIENT_SECRET`). Never logged.
pub fn spotify_client_secret() -> Res<String> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Web API base URL (`SPOTIFY_API_URL`), without trailing slash.
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Token endpoint for the client-credentials grant (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Market to collect for when none is given on the command line
/// (`TARGET_COUNTRY`).
pub fn target_country() -> Res<CountryCode> {
    Ok(CountryCode::new(&optional("TARGET_COUNTRY", DEFAULT_COUNTRY))?)
}

/// Fixed pause between remote calls (`TUNECENSUS_REQUEST_PAUSE_MS`).
pub fn request_pause() -> Duration {
    let millis = env::var("TUNECENSUS_REQUEST_PAUSE_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_REQUEST_PAUSE_MS);
    Duration::from_millis(millis)
}

/// Directory the CSV dataset is written to (`TUNECENSUS_OUTPUT_DIR`).
pub fn output_dir() -> PathBuf {
    PathBuf::from(optional("TUNECENSUS_OUTPUT_DIR", "."))
}
