mod common;

use common::*;
use tunecensus::cli::preview_rows;
use tunecensus::management::{CsvDatasetManager, DatasetSink, DatasetTable};
use tunecensus::types::MergedRecord;

fn merged(id: &str, name: &str, popularity: u32) -> MergedRecord {
    let mut track = track(Some(id), name);
    track.popularity = popularity;
    MergedRecord {
        track,
        features: features(id, 120.5),
    }
}

#[test]
fn test_csv_has_header_and_rows_in_order() {
    let rows = vec![merged("a", "First", 10), merged("b", "Second, with comma", 20)];

    let csv = String::from_utf8(CsvDatasetManager::to_csv(&rows).unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,name,artist,artist_id,album,popularity,duration_ms,explicit,danceability"));
    assert!(lines[1].starts_with("a,First,Artist,artist_id,Album,10,200000,false,"));

    // Fields containing the delimiter are quoted
    assert!(lines[2].starts_with("b,\"Second, with comma\","));
}

#[test]
fn test_record_matches_headers() {
    let row = merged("a", "First", 10);
    assert_eq!(row.to_record().len(), MergedRecord::HEADERS.len());
}

#[tokio::test]
async fn test_sink_writes_and_loads_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvDatasetManager::new(dir.path().join("out"));
    let rows = vec![merged("a", "First", 10), merged("b", "Second", 20)];

    let path = sink.write(&rows, "spotify_GB_tracks").await.unwrap();
    assert_eq!(path, dir.path().join("out").join("spotify_GB_tracks.csv"));
    assert!(path.is_file());

    let table = CsvDatasetManager::load(&path).await.unwrap();
    assert_eq!(table.headers.len(), MergedRecord::HEADERS.len());
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.value(&table.rows[1], "name"), Some("Second"));
    assert_eq!(table.value(&table.rows[1], "tempo"), Some("120.5"));
    assert_eq!(table.value(&table.rows[1], "missing"), None);
}

#[test]
fn test_preview_rows_sorted_by_popularity() {
    let table = DatasetTable {
        headers: vec![
            "name".to_string(),
            "artist".to_string(),
            "popularity".to_string(),
            "duration_ms".to_string(),
            "tempo".to_string(),
        ],
        rows: vec![
            vec!["Low".into(), "A".into(), "5".into(), "61000".into(), "90".into()],
            vec!["High".into(), "B".into(), "80".into(), "200000".into(), "128".into()],
            vec!["Mid".into(), "C".into(), "40".into(), "bad".into(), "100".into()],
        ],
    };

    let rows = preview_rows(&table, 2);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "High");
    assert_eq!(rows[0].duration, "3:20");
    assert_eq!(rows[1].name, "Mid");
    assert_eq!(rows[1].duration, "");

    // Columns absent from the file render empty
    assert_eq!(rows[0].energy, "");
}
