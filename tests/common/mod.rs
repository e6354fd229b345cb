#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    path::PathBuf,
    time::Duration,
};

use async_trait::async_trait;
use tunecensus::{
    Res,
    collector::CollectorSettings,
    management::DatasetSink,
    spotify::{CatalogClient, CatalogError, CatalogResult},
    types::{
        AlbumObject, ArtistObject, CountryCode, FeatureRecord, MergedRecord, Page, Playlist,
        PlaylistItem, TrackObject, TrackRecord,
    },
};

/// In-memory catalog. Listings are served in pages of the requested size
/// with cursors of the form `<kind>:<key>:<offset>:<limit>`.
#[derive(Default)]
pub struct FakeCatalog {
    pub featured: Vec<Playlist>,
    pub featured_unsupported: bool,
    pub failing_featured_offsets: HashSet<usize>,
    pub search_results: HashMap<String, Vec<Playlist>>,
    pub failing_queries: HashSet<String>,
    pub playlist_items: HashMap<String, Vec<PlaylistItem>>,
    pub failing_playlists: HashSet<String>,
    pub failing_item_offsets: HashSet<(String, usize)>,
    pub features: HashMap<String, FeatureRecord>,
    pub failing_feature_call: Option<usize>,

    pub featured_calls: Cell<usize>,
    pub search_calls: RefCell<Vec<String>>,
    pub item_calls: RefCell<Vec<String>>,
    pub feature_calls: RefCell<Vec<Vec<String>>>,
}

fn paginate<T: Clone>(items: &[T], kind: &str, key: &str, offset: usize, limit: usize) -> Page<T> {
    let end = (offset + limit).min(items.len());
    let page_items = items.get(offset..end).unwrap_or_default().to_vec();
    let next = if end < items.len() {
        Some(format!("{}:{}:{}:{}", kind, key, end, limit))
    } else {
        None
    };
    Page::new(page_items, next)
}

fn parse_cursor(cursor: &str) -> (String, String, usize, usize) {
    let parts: Vec<&str> = cursor.split(':').collect();
    (
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2].parse().unwrap(),
        parts[3].parse().unwrap(),
    )
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, playlists: Vec<Playlist>) -> Self {
        self.search_results.insert(query.to_string(), playlists);
        self
    }

    pub fn with_playlist(mut self, id: &str, items: Vec<PlaylistItem>) -> Self {
        self.playlist_items.insert(id.to_string(), items);
        self
    }

    pub fn with_features(mut self, features: Vec<FeatureRecord>) -> Self {
        for f in features {
            self.features.insert(f.id.clone(), f);
        }
        self
    }

    fn items_page(&self, playlist_id: &str, offset: usize, limit: usize) -> CatalogResult<Page<PlaylistItem>> {
        self.item_calls.borrow_mut().push(playlist_id.to_string());
        let failing_page = self
            .failing_item_offsets
            .contains(&(playlist_id.to_string(), offset));
        if self.failing_playlists.contains(playlist_id) || failing_page {
            return Err(CatalogError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }

        match self.playlist_items.get(playlist_id) {
            Some(items) => Ok(paginate(items, "items", playlist_id, offset, limit)),
            None => Err(CatalogError::Api {
                status: 404,
                message: "Not found".to_string(),
            }),
        }
    }
}

#[async_trait(?Send)]
impl CatalogClient for FakeCatalog {
    async fn featured_playlists(
        &self,
        _country: &CountryCode,
        limit: u32,
    ) -> CatalogResult<Page<Playlist>> {
        self.featured_calls.set(self.featured_calls.get() + 1);
        if self.featured_unsupported {
            return Err(CatalogError::Unsupported {
                feature: "Featured playlists".to_string(),
                country: "XX".to_string(),
            });
        }
        Ok(paginate(&self.featured, "featured", "-", 0, limit as usize))
    }

    async fn search_playlists(&self, query: &str, limit: u32) -> CatalogResult<Page<Playlist>> {
        self.search_calls.borrow_mut().push(query.to_string());
        if self.failing_queries.contains(query) {
            return Err(CatalogError::RateLimited { retry_after: 30 });
        }

        let results = self.search_results.get(query).cloned().unwrap_or_default();
        let items = results.into_iter().take(limit as usize).collect();
        Ok(Page::new(items, None))
    }

    async fn next_playlist_page(&self, cursor: &str) -> CatalogResult<Page<Playlist>> {
        self.featured_calls.set(self.featured_calls.get() + 1);
        let (_, _, offset, limit) = parse_cursor(cursor);
        if self.failing_featured_offsets.contains(&offset) {
            return Err(CatalogError::Api {
                status: 502,
                message: "Bad gateway".to_string(),
            });
        }
        Ok(paginate(&self.featured, "featured", "-", offset, limit))
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> CatalogResult<Page<PlaylistItem>> {
        self.items_page(playlist_id, 0, limit as usize)
    }

    async fn next_item_page(&self, cursor: &str) -> CatalogResult<Page<PlaylistItem>> {
        let (_, playlist_id, offset, limit) = parse_cursor(cursor);
        self.items_page(&playlist_id, offset, limit)
    }

    async fn audio_features(&self, ids: &[String]) -> CatalogResult<Vec<Option<FeatureRecord>>> {
        let call = self.feature_calls.borrow().len();
        self.feature_calls.borrow_mut().push(ids.to_vec());
        if self.failing_feature_call == Some(call) {
            return Err(CatalogError::Api {
                status: 502,
                message: "Bad gateway".to_string(),
            });
        }

        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }
}

/// Sink that remembers what it was asked to write.
#[derive(Default)]
pub struct MemorySink {
    pub writes: RefCell<Vec<(String, Vec<MergedRecord>)>>,
}

#[async_trait(?Send)]
impl DatasetSink for MemorySink {
    async fn write(&self, rows: &[MergedRecord], destination: &str) -> Res<PathBuf> {
        self.writes
            .borrow_mut()
            .push((destination.to_string(), rows.to_vec()));
        Ok(PathBuf::from(format!("memory://{}", destination)))
    }
}

pub fn quiet_settings() -> CollectorSettings {
    CollectorSettings {
        pause: Duration::ZERO,
        show_progress: false,
        ..CollectorSettings::default()
    }
}

pub fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn playlists(prefix: &str, count: usize) -> Vec<Playlist> {
    (0..count)
        .map(|i| playlist(&format!("{}{}", prefix, i), &format!("Playlist {}", i)))
        .collect()
}

pub fn track_object(id: Option<&str>, name: &str) -> TrackObject {
    TrackObject {
        id: id.map(str::to_string),
        name: name.to_string(),
        artists: vec![
            ArtistObject {
                id: Some(format!("{}_artist", name)),
                name: format!("{} Artist", name),
            },
            ArtistObject {
                id: Some("featured_artist".to_string()),
                name: "Featured Artist".to_string(),
            },
        ],
        album: Some(AlbumObject {
            name: format!("{} Album", name),
        }),
        popularity: 50,
        duration_ms: 180_000,
        explicit: false,
    }
}

pub fn item(id: &str) -> PlaylistItem {
    PlaylistItem {
        track: Some(track_object(Some(id), &format!("Track {}", id))),
    }
}

pub fn items(prefix: &str, count: usize) -> Vec<PlaylistItem> {
    (0..count).map(|i| item(&format!("{}{}", prefix, i))).collect()
}

pub fn track(id: Option<&str>, name: &str) -> TrackRecord {
    TrackRecord {
        id: id.map(str::to_string),
        name: name.to_string(),
        artist: Some("Artist".to_string()),
        artist_id: Some("artist_id".to_string()),
        album: "Album".to_string(),
        popularity: 42,
        duration_ms: 200_000,
        explicit: false,
    }
}

pub fn features(id: &str, tempo: f64) -> FeatureRecord {
    FeatureRecord {
        id: id.to_string(),
        danceability: 0.5,
        energy: 0.7,
        key: 5,
        loudness: -6.2,
        mode: 1,
        speechiness: 0.04,
        acousticness: 0.1,
        instrumentalness: 0.0,
        liveness: 0.12,
        valence: 0.6,
        tempo,
        time_signature: 4,
        duration_ms: 200_000,
        uri: format!("spotify:track:{}", id),
        track_href: format!("https://api.spotify.com/v1/tracks/{}", id),
        analysis_url: format!("https://api.spotify.com/v1/audio-analysis/{}", id),
    }
}
