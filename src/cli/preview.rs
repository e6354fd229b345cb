use std::path::PathBuf;

use tabled::Table;

use crate::{
    error,
    management::{CsvDatasetManager, DatasetTable},
    types::TrackPreviewRow,
    utils, warning,
};

/// Prints the most popular rows of an exported dataset.
pub async fn preview(path: PathBuf, limit: usize) {
    let table = match CsvDatasetManager::load(&path).await {
        Ok(table) => table,
        Err(e) => error!("Cannot read dataset {}. Err: {}", path.display(), e),
    };

    let rows = preview_rows(&table, limit);
    if rows.is_empty() {
        warning!("Dataset {} has no rows.", path.display());
        return;
    }

    println!("{}", Table::new(rows));
}

/// Top `limit` rows by popularity, highest first; ties keep file order.
pub fn preview_rows(table: &DatasetTable, limit: usize) -> Vec<TrackPreviewRow> {
    let popularity = |row: &[String]| {
        table
            .value(row, "popularity")
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(0)
    };

    let mut rows: Vec<&Vec<String>> = table.rows.iter().collect();
    rows.sort_by(|a, b| popularity(b.as_slice()).cmp(&popularity(a.as_slice())));

    rows.into_iter()
        .take(limit)
        .map(|row| {
            let col = |name: &str| table.value(row, name).unwrap_or_default().to_string();
            TrackPreviewRow {
                name: col("name"),
                artist: col("artist"),
                popularity: col("popularity"),
                duration: table
                    .value(row, "duration_ms")
                    .and_then(|d| d.parse::<u64>().ok())
                    .map(utils::format_duration_ms)
                    .unwrap_or_default(),
                tempo: col("tempo"),
                energy: col("energy"),
                valence: col("valence"),
            }
        })
        .collect()
}
