//! # CLI Module
//!
//! User-facing commands. Each command loads what it needs from the
//! configuration, delegates to the collector, management and Spotify layers,
//! and turns their results into console output.
//!
//! ## Commands
//!
//! - [`auth`] - Requests an app token and checks it against the API
//! - [`collect`] - Runs the collection pipeline for one market and writes the CSV
//! - [`preview`] - Shows the most popular rows of an exported dataset
//!
//! ## Error Handling
//!
//! Failures inside the pipeline are reported as warnings and never stop the
//! command on their own. Missing credentials, token failures and unwritable
//! output end the process through [`crate::error!`].
//!
//! ## Usage Patterns
//!
//! ```bash
//! tunecensus auth                          # Check credentials
//! tunecensus collect --country GB          # Writes spotify_GB_tracks.csv
//! tunecensus preview spotify_GB_tracks.csv --limit 20
//! ```

mod auth;
mod collect;
mod preview;

pub use auth::auth;
pub use collect::collect;
pub use preview::preview;
pub use preview::preview_rows;
