//! Country Track Dataset Collector
//!
//! This library gathers the tracks behind a country's popular Spotify
//! playlists, pairs every track with its audio features, and exports the result
//! as a flat CSV table for later analysis.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `collector` - Discovery, track collection, feature batching and aggregation
//! - `config` - Configuration management and environment variables
//! - `management` - Token cache and dataset persistence
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tunecensus::{collector::{CollectorSettings, Pipeline}, spotify::SpotifyClient, types::CountryCode};
//!
//! #[tokio::main]
//! async fn main() -> tunecensus::Res<()> {
//!     tunecensus::config::load_env().await?;
//!     let client = SpotifyClient::connect().await?;
//!     let settings = CollectorSettings::default();
//!     let mut pipeline = Pipeline::new(&client, &settings);
//!     let outcome = pipeline.run(&CountryCode::new("GB")?).await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod management;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used for everything outside the collection pipeline itself: credential
/// loading, token requests and dataset persistence.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Collecting music data for {}...", country);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the CLI layer uses this. Library code reports failures through
/// `Res` or `RunOutcome` instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for contained failures: a search query that failed, a featured list
/// that is unavailable for a market, a feature batch that could not be fetched.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
