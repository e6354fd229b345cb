use std::path::PathBuf;

use tabled::Table;

use crate::{
    collector::{self, CollectorSettings, Dataset},
    config, error, info,
    management::CsvDatasetManager,
    spotify::SpotifyClient,
    success,
    types::{CountryCode, PlaylistTableRow},
    warning,
};

/// Collects the dataset for one market and writes it as CSV.
///
/// Falls back to `TARGET_COUNTRY` and `TUNECENSUS_OUTPUT_DIR` when the
/// country or output directory are not given.
pub async fn collect(
    country: Option<CountryCode>,
    output_dir: Option<PathBuf>,
    max_playlists: Option<usize>,
) {
    let country = match country {
        Some(c) => c,
        None => match config::target_country() {
            Ok(c) => c,
            Err(e) => error!("{}", e),
        },
    };

    let mut settings = CollectorSettings::from_env();
    if let Some(max) = max_playlists {
        settings.max_playlists = max;
    }

    let client = match SpotifyClient::connect().await {
        Ok(client) => client,
        Err(e) => error!(
            "Cannot connect to Spotify API. Run tunecensus auth to check your credentials.\n Error: {}",
            e
        ),
    };

    let sink = CsvDatasetManager::new(output_dir.unwrap_or_else(config::output_dir));
    match collector::collect_country(&client, &sink, &settings, &country).await {
        Ok(Some(export)) => {
            print_summary(&export.dataset);
            success!("Data collection complete!");
        }
        Ok(None) => warning!("Nothing written for {}.", country),
        Err(e) => error!("Cannot write dataset for {}. Err: {}", country, e),
    }
}

fn print_summary(dataset: &Dataset) {
    let rows: Vec<PlaylistTableRow> = dataset
        .playlists
        .iter()
        .map(|s| PlaylistTableRow {
            playlist: s.playlist.name.clone(),
            id: s.playlist.id.clone(),
            tracks: s.tracks,
        })
        .collect();

    println!("{}", Table::new(rows));
    info!(
        "{} unique tracks, {} with audio features",
        dataset.unique_tracks,
        dataset.rows.len()
    );
}
