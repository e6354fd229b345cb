use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use tabled::Tabled;

/// Decodes a JSON array entry by entry. Null entries and entries that do not
/// match `T` become `None` in their own slot instead of failing the array.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Vec::<Option<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|entry| entry.and_then(|value| serde_json::from_value(value).ok()))
        .collect())
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Access token as cached on disk. `obtained_at` is a Unix timestamp in
/// seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Two-letter ISO 3166-1 market code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Validates and normalizes a market code.
    ///
    /// # Errors
    ///
    /// Anything other than two ASCII letters after trimming.
    pub fn new(code: &str) -> Result<Self, String> {
        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!(
                "Invalid country code '{}'. Expected two letters, e.g. US or GB.",
                code
            ));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discovered playlist. The id is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

/// One page of a paginated listing. `next` is the absolute URL of the
/// following page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Option<String>) -> Self {
        Self { items, next }
    }
}

/// Raw paginated listing as returned by the service.
///
/// Items are decoded one by one: an entry that is `null` or malformed is kept
/// as `None` in its slot, so one bad entry never rejects the whole page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct PagingObject<T> {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub items: Vec<Option<T>>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// Wrapper the service uses for featured playlists and playlist search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistsEnvelope {
    /// Editorial headline, only present on featured playlists.
    pub message: Option<String>,
    pub playlists: PagingObject<SimplifiedPlaylist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// One entry of a playlist. `track` is `null` for removed or unavailable
/// tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackObject {
    /// `None` for local files, which have no catalog id.
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artists: Vec<ArtistObject>,
    pub album: Option<AlbumObject>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_ms: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explicit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistObject {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumObject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Response of the batch audio-features endpoint. Positional: entry `i`
/// belongs to the `i`-th requested id, and unresolvable or malformed entries
/// are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub audio_features: Vec<Option<FeatureRecord>>,
}

/// Per-track metadata taken from a playlist entry.
///
/// `id` is `None` for local files; such records are dropped during
/// deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: Option<String>,
    pub name: String,
    pub artist: Option<String>,
    pub artist_id: Option<String>,
    pub album: String,
    pub popularity: u32,
    pub duration_ms: u64,
    pub explicit: bool,
}

/// Audio features of one track as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: String,
    pub danceability: f64,
    pub energy: f64,
    pub key: i32,
    pub loudness: f64,
    pub mode: i32,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub time_signature: i32,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub track_href: String,
    #[serde(default)]
    pub analysis_url: String,
}

/// A track joined with its audio features. Both sides share `track.id`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub track: TrackRecord,
    pub features: FeatureRecord,
}

impl MergedRecord {
    /// CSV column names, in the order of [`MergedRecord::to_record`].
    pub const HEADERS: [&'static str; 24] = [
        "id",
        "name",
        "artist",
        "artist_id",
        "album",
        "popularity",
        "duration_ms",
        "explicit",
        "danceability",
        "energy",
        "key",
        "loudness",
        "mode",
        "speechiness",
        "acousticness",
        "instrumentalness",
        "liveness",
        "valence",
        "tempo",
        "time_signature",
        "analysis_duration_ms",
        "uri",
        "track_href",
        "analysis_url",
    ];

    pub fn id(&self) -> &str {
        &self.features.id
    }

    pub fn to_record(&self) -> Vec<String> {
        let t = &self.track;
        let f = &self.features;
        vec![
            f.id.clone(),
            t.name.clone(),
            t.artist.clone().unwrap_or_default(),
            t.artist_id.clone().unwrap_or_default(),
            t.album.clone(),
            t.popularity.to_string(),
            t.duration_ms.to_string(),
            t.explicit.to_string(),
            f.danceability.to_string(),
            f.energy.to_string(),
            f.key.to_string(),
            f.loudness.to_string(),
            f.mode.to_string(),
            f.speechiness.to_string(),
            f.acousticness.to_string(),
            f.instrumentalness.to_string(),
            f.liveness.to_string(),
            f.valence.to_string(),
            f.tempo.to_string(),
            f.time_signature.to_string(),
            f.duration_ms.to_string(),
            f.uri.clone(),
            f.track_href.clone(),
            f.analysis_url.clone(),
        ]
    }
}

/// How many track records one playlist contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistSummary {
    pub playlist: Playlist,
    pub tracks: usize,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub playlist: String,
    pub id: String,
    pub tracks: usize,
}

#[derive(Tabled)]
pub struct TrackPreviewRow {
    pub name: String,
    pub artist: String,
    pub popularity: String,
    pub duration: String,
    pub tempo: String,
    pub energy: String,
    pub valence: String,
}
