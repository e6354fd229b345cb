use tunecensus::spotify::{
    CatalogError, api_error_message,
    playlists::{into_item_page, into_playlist_page},
};
use tunecensus::types::{AudioFeaturesResponse, PagingObject, PlaylistItem, PlaylistsEnvelope};

#[test]
fn test_playlist_page_filters_null_entries() {
    let body = r#"{
        "message": "Editor's picks",
        "playlists": {
            "items": [
                {"id": "37i9dQZF1DXcBWIGoYBM5M", "name": "Today's Top Hits"},
                null,
                {"id": null, "name": "Broken"},
                {"id": "37i9dQZEVXbLRQDuF5jeBp", "name": "Top 50 - USA"}
            ],
            "next": "https://api.spotify.com/v1/browse/featured-playlists?offset=4&limit=4",
            "total": 12
        }
    }"#;

    let envelope: PlaylistsEnvelope = serde_json::from_str(body).unwrap();
    let page = into_playlist_page(envelope);

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name, "Today's Top Hits");
    assert_eq!(page.items[1].id, "37i9dQZEVXbLRQDuF5jeBp");
    assert!(page.next.unwrap().contains("offset=4"));
}

#[test]
fn test_search_envelope_without_message() {
    let body = r#"{"playlists": {"items": [], "next": null, "total": 0}}"#;

    let page = into_playlist_page(serde_json::from_str(body).unwrap());

    assert!(page.items.is_empty());
    assert!(page.next.is_none());
}

#[test]
fn test_playlist_items_deserialize_with_missing_tracks() {
    let body = r#"{
        "items": [
            {
                "added_at": "2024-01-05T10:00:00Z",
                "track": {
                    "id": "4uLU6hMCjMI75M1A2tKUQC",
                    "name": "Never Gonna Give You Up",
                    "artists": [{"id": "0gxyHStUsqpMadRV0Di1Qt", "name": "Rick Astley"}],
                    "album": {"name": "Whenever You Need Somebody"},
                    "popularity": 77,
                    "duration_ms": 213573,
                    "explicit": false
                }
            },
            {"added_at": "2024-01-05T10:00:00Z", "track": null},
            {
                "track": {
                    "id": null,
                    "name": "local demo.mp3",
                    "artists": [{"id": null, "name": ""}],
                    "album": {"name": ""},
                    "popularity": 0,
                    "duration_ms": 1000,
                    "explicit": false
                }
            }
        ],
        "next": null,
        "total": 3
    }"#;

    let page: PagingObject<PlaylistItem> = serde_json::from_str(body).unwrap();

    let page = into_item_page(page);

    assert_eq!(page.items.len(), 3);
    let track = page.items[0].track.as_ref().unwrap();
    assert_eq!(track.popularity, 77);
    assert_eq!(track.artists[0].name, "Rick Astley");
    assert!(page.items[1].track.is_none());
    assert!(page.items[2].track.as_ref().unwrap().id.is_none());
}

#[test]
fn test_playlist_items_tolerate_null_fields_and_bad_entries() {
    let body = r#"{
        "items": [
            {"track": {"id": "a", "name": null, "artists": [{"id": "x", "name": null}],
                       "album": {"name": null}, "popularity": null, "duration_ms": 1000,
                       "explicit": null}},
            {"track": {"id": "b", "name": "Good", "artists": [], "album": null,
                       "popularity": 10, "duration_ms": 2000, "explicit": true}},
            {"track": {"id": 42, "name": "Wrong id type"}},
            "not an object"
        ],
        "next": "https://api.spotify.com/v1/playlists/p/tracks?offset=4&limit=4",
        "total": 4
    }"#;

    let raw: PagingObject<PlaylistItem> = serde_json::from_str(body).unwrap();

    // Malformed entries are kept as empty slots in the raw page
    assert_eq!(raw.items.len(), 4);
    assert!(raw.items[2].is_none());
    assert!(raw.items[3].is_none());

    let page = into_item_page(raw);
    assert_eq!(page.items.len(), 2);

    let first = page.items[0].track.as_ref().unwrap();
    assert_eq!(first.name, "");
    assert_eq!(first.artists[0].name, "");
    assert_eq!(first.popularity, 0);
    assert!(!first.explicit);

    assert_eq!(page.items[1].track.as_ref().unwrap().name, "Good");
    assert!(page.next.is_some());
}

#[test]
fn test_playlist_page_tolerates_null_name_and_bad_entries() {
    let body = r#"{
        "playlists": {
            "items": [
                {"id": "p1", "name": null},
                {"id": ["not", "a", "string"], "name": "Broken"},
                {"id": "p2", "name": "Two"}
            ],
            "next": null,
            "total": 3
        }
    }"#;

    let page = into_playlist_page(serde_json::from_str(body).unwrap());

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "p1");
    assert_eq!(page.items[0].name, "");
    assert_eq!(page.items[1].id, "p2");
}

#[test]
fn test_audio_features_keep_null_placeholders() {
    let body = r#"{
        "audio_features": [
            {
                "danceability": 0.727, "energy": 0.939, "key": 8, "loudness": -6.038,
                "mode": 1, "speechiness": 0.0355, "acousticness": 0.114,
                "instrumentalness": 0.0, "liveness": 0.163, "valence": 0.915,
                "tempo": 113.3, "type": "audio_features",
                "id": "4uLU6hMCjMI75M1A2tKUQC",
                "uri": "spotify:track:4uLU6hMCjMI75M1A2tKUQC",
                "track_href": "https://api.spotify.com/v1/tracks/4uLU6hMCjMI75M1A2tKUQC",
                "analysis_url": "https://api.spotify.com/v1/audio-analysis/4uLU6hMCjMI75M1A2tKUQC",
                "duration_ms": 213573, "time_signature": 4
            },
            null
        ]
    }"#;

    let response: AudioFeaturesResponse = serde_json::from_str(body).unwrap();

    assert_eq!(response.audio_features.len(), 2);
    let first = response.audio_features[0].as_ref().unwrap();
    assert_eq!(first.key, 8);
    assert_eq!(first.tempo, 113.3);
    assert!(response.audio_features[1].is_none());
}

fn feature_entry(id: &str, tempo: &str) -> String {
    format!(
        r#"{{"danceability": 0.5, "energy": 0.6, "key": 1, "loudness": -5.0, "mode": 0,
            "speechiness": 0.05, "acousticness": 0.2, "instrumentalness": 0.0,
            "liveness": 0.1, "valence": 0.4, "tempo": {}, "id": "{}",
            "uri": "spotify:track:{}", "duration_ms": 180000, "time_signature": 4}}"#,
        tempo, id, id
    )
}

#[test]
fn test_bad_audio_features_entry_only_loses_its_own_slot() {
    let body = format!(
        r#"{{"audio_features": [{}, {}, null, {}]}}"#,
        feature_entry("a", "120.0"),
        feature_entry("b", "null"),
        feature_entry("c", "98.5"),
    );

    let response: AudioFeaturesResponse = serde_json::from_str(&body).unwrap();

    // Positions stay aligned with the requested ids
    assert_eq!(response.audio_features.len(), 4);
    assert_eq!(response.audio_features[0].as_ref().unwrap().id, "a");
    assert!(response.audio_features[1].is_none());
    assert!(response.audio_features[2].is_none());
    assert_eq!(response.audio_features[3].as_ref().unwrap().tempo, 98.5);
}

#[test]
fn test_api_error_message() {
    let body = r#"{"error": {"status": 404, "message": "Resource not found"}}"#;
    assert_eq!(api_error_message(body), "Resource not found");

    let token_body = r#"{"error": "invalid_client", "error_description": "Invalid client secret"}"#;
    assert_eq!(api_error_message(token_body), "Invalid client secret");

    assert_eq!(api_error_message("  upstream timeout \n"), "upstream timeout");
}

#[test]
fn test_catalog_error_display() {
    let unsupported = CatalogError::Unsupported {
        feature: "Featured playlists".to_string(),
        country: "KP".to_string(),
    };
    assert_eq!(unsupported.to_string(), "Featured playlists not available for KP");

    let limited = CatalogError::RateLimited { retry_after: 7 };
    assert_eq!(limited.to_string(), "Rate limited, retry after 7 seconds");
}
