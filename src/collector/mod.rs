//! # Collector Module
//!
//! The collection-and-aggregation pipeline that turns a country code into a
//! joined track/audio-feature table.
//!
//! ```text
//! PlaylistDiscovery ─→ TrackCollector ─→ dedupe_tracks
//!                                            ↓
//!            DatasetSink ←─ join_on_id ←─ FeatureBatchFetcher
//! ```
//!
//! Every remote call is awaited before the next one starts, with a fixed
//! pause between calls. Remote failures are contained at the smallest scope
//! (one query, one page, one batch); only an empty stage result ends a run,
//! and it does so through [`RunOutcome::Aborted`] rather than an error.

pub mod aggregate;
pub mod discovery;
pub mod features;
pub mod tracks;

use std::{fmt, path::PathBuf, time::Duration};

use crate::{
    Res, config, info,
    management::DatasetSink,
    spotify::{AUDIO_FEATURES_BATCH_LIMIT, CatalogClient},
    success,
    types::{CountryCode, MergedRecord, PlaylistSummary},
    utils, warning,
};

pub use aggregate::{TrackTable, dedupe_tracks, join_on_id};
pub use discovery::{PlaylistDiscovery, merge_playlists};
pub use features::FeatureBatchFetcher;
pub use tracks::{TrackCollector, extract};

/// Result of a stage that may legitimately find nothing.
///
/// Finding nothing is an expected outcome of discovery and joining, not an
/// error, so it is kept apart from [`crate::spotify::CatalogError`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The stage produced at least one item.
    Found(T),
    /// The stage completed but had nothing to hand on.
    Empty,
}

impl<T> Outcome<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Empty => None,
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// `Empty` for an empty vector, `Found` otherwise.
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Found(items)
        }
    }
}

/// Limits and pacing for one collection run.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Page size of the featured-playlists request.
    pub featured_page_size: u32,
    /// Stop following featured pages once this many playlists are gathered.
    pub featured_cap: usize,
    /// Keyword query templates; `{country}` is replaced by the market code.
    pub search_templates: Vec<String>,
    /// Result count per keyword query.
    pub search_limit: u32,
    /// Only the first N discovered playlists are walked.
    pub max_playlists: usize,
    pub item_page_size: u32,
    /// Stop following playlist pages once this many entries are gathered.
    pub item_cap: usize,
    /// Ids per audio-features call, never above the endpoint limit.
    pub feature_batch_size: usize,
    /// Fixed pause between remote calls.
    pub pause: Duration,
    pub show_progress: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            featured_page_size: 50,
            featured_cap: 100,
            search_templates: ["top {country}", "charts {country}", "hits {country}", "popular {country}"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            search_limit: 10,
            max_playlists: 20,
            item_page_size: 100,
            item_cap: 200,
            feature_batch_size: AUDIO_FEATURES_BATCH_LIMIT,
            pause: Duration::from_millis(config::DEFAULT_REQUEST_PAUSE_MS),
            show_progress: true,
        }
    }
}

impl CollectorSettings {
    /// Defaults with the pause taken from the environment.
    pub fn from_env() -> Self {
        Self {
            pause: config::request_pause(),
            ..Self::default()
        }
    }
}

/// Position of a [`Pipeline`] in its run.
///
/// Stages only move forward:
///
/// ```text
/// Idle → Discovering → CollectingTracks → Deduplicating
///      → FetchingFeatures → Joining → Done
/// ```
///
/// Any of the working stages can instead end in `Aborted` when it has
/// nothing to hand on. `Done` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Created, not yet run.
    Idle,
    /// Featured lists and keyword search.
    Discovering,
    /// Paging through the selected playlists.
    CollectingTracks,
    /// One record per track id.
    Deduplicating,
    /// Batched audio-features lookups.
    FetchingFeatures,
    /// Inner join of tracks and features.
    Joining,
    /// A dataset was produced.
    Done,
    /// The run stopped early, see [`AbortReason`].
    Aborted,
}

/// Why a run stopped before producing a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Neither discovery strategy found a playlist.
    NoPlaylists,
    /// The playlists yielded no track with a catalog id.
    NoTracks,
    /// No track had audio features, so the join was empty.
    NoData,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoPlaylists => write!(f, "No playlists found"),
            AbortReason::NoTracks => write!(f, "No tracks found in the playlists"),
            AbortReason::NoData => write!(f, "No data collected"),
        }
    }
}

/// The joined table of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub country: CountryCode,
    /// One row per track that has audio features, in first-seen track order.
    pub rows: Vec<MergedRecord>,
    /// Track counts for every playlist that was walked.
    pub playlists: Vec<PlaylistSummary>,
    /// Distinct track ids before the join.
    pub unique_tracks: usize,
}

impl Dataset {
    /// Sink destination name, e.g. `spotify_GB_tracks`.
    pub fn destination(&self) -> String {
        utils::dataset_name(&self.country)
    }
}

/// How a [`Pipeline::run`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(Dataset),
    Aborted(AbortReason),
}

/// Drives one run through the stages and tracks where it is.
pub struct Pipeline<'a, C: CatalogClient> {
    client: &'a C,
    settings: &'a CollectorSettings,
    stage: Stage,
}

impl<'a, C: CatalogClient> Pipeline<'a, C> {
    pub fn new(client: &'a C, settings: &'a CollectorSettings) -> Self {
        Self {
            client,
            settings,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs every stage for `country` in order.
    ///
    /// Remote failures never surface here: they are contained inside the
    /// stages. A stage that ends up with nothing moves the pipeline to
    /// [`Stage::Aborted`] and the reason is returned.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let settings = CollectorSettings::from_env();
    /// let mut pipeline = Pipeline::new(&client, &settings);
    /// match pipeline.run(&country).await {
    ///     RunOutcome::Completed(dataset) => println!("{} rows", dataset.rows.len()),
    ///     RunOutcome::Aborted(reason) => println!("{}", reason),
    /// }
    /// ```
    pub async fn run(&mut self, country: &CountryCode) -> RunOutcome {
        info!("Collecting music data for {}...", country);

        self.stage = Stage::Discovering;
        let discovery = PlaylistDiscovery::new(self.client, self.settings);
        let playlists = match discovery.discover(country).await {
            Outcome::Found(playlists) => playlists,
            Outcome::Empty => return self.abort(AbortReason::NoPlaylists),
        };

        self.stage = Stage::CollectingTracks;
        let collector = TrackCollector::new(self.client, self.settings);
        let (tracks, summaries) = collector.collect_from(&playlists).await;
        if tracks.is_empty() {
            return self.abort(AbortReason::NoTracks);
        }

        self.stage = Stage::Deduplicating;
        let table = dedupe_tracks(tracks);
        if table.is_empty() {
            return self.abort(AbortReason::NoTracks);
        }

        info!("Getting audio features for {} tracks", table.len());
        self.stage = Stage::FetchingFeatures;
        let fetcher = FeatureBatchFetcher::new(self.client, self.settings);
        let features = fetcher.fetch_features(&table.ids()).await;

        self.stage = Stage::Joining;
        match join_on_id(&table, features) {
            Outcome::Found(rows) => {
                success!("Successfully collected data for {} tracks", rows.len());
                self.stage = Stage::Done;
                RunOutcome::Completed(Dataset {
                    country: country.clone(),
                    rows,
                    playlists: summaries,
                    unique_tracks: table.len(),
                })
            }
            Outcome::Empty => self.abort(AbortReason::NoData),
        }
    }

    fn abort(&mut self, reason: AbortReason) -> RunOutcome {
        warning!("{}. Stopped while {:?}.", reason, self.stage);
        self.stage = Stage::Aborted;
        RunOutcome::Aborted(reason)
    }
}

/// A completed run together with where it was persisted.
#[derive(Debug, Clone)]
pub struct Export {
    pub dataset: Dataset,
    pub path: PathBuf,
}

/// Runs the pipeline for `country` and hands the finished table to `sink`.
///
/// Returns `Ok(None)` when the run was aborted; the sink is not called in
/// that case.
///
/// # Errors
///
/// Only the sink can fail the call, e.g. when the output directory cannot be
/// created or the file cannot be written.
pub async fn collect_country<C, S>(
    client: &C,
    sink: &S,
    settings: &CollectorSettings,
    country: &CountryCode,
) -> Res<Option<Export>>
where
    C: CatalogClient,
    S: DatasetSink + ?Sized,
{
    let mut pipeline = Pipeline::new(client, settings);
    let dataset = match pipeline.run(country).await {
        RunOutcome::Completed(dataset) => dataset,
        RunOutcome::Aborted(_) => return Ok(None),
    };

    let path = sink.write(&dataset.rows, &dataset.destination()).await?;
    success!("Data saved to {}", path.display());
    Ok(Some(Export { dataset, path }))
}
