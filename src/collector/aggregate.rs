use std::collections::HashMap;

use crate::{
    collector::Outcome,
    types::{FeatureRecord, MergedRecord, TrackRecord},
    utils,
};

/// Tracks keyed by id, in order of first appearance. Every record has an id
/// and no id appears twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackTable {
    records: Vec<TrackRecord>,
}

impl TrackTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.iter().filter_map(|t| t.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&TrackRecord> {
        self.records.iter().find(|t| t.id.as_deref() == Some(id))
    }

    pub fn records(&self) -> &[TrackRecord] {
        &self.records
    }
}

/// Builds the id → track table. Records without an id are dropped; for a
/// repeated id the last record processed wins.
pub fn dedupe_tracks(tracks: impl IntoIterator<Item = TrackRecord>) -> TrackTable {
    TrackTable {
        records: utils::dedupe_last_wins(tracks, |t| t.id.clone()),
    }
}

/// Inner join of tracks and features on id, in track-table order.
///
/// Absent feature entries are dropped first. [`Outcome::Empty`] when either
/// side is empty after that, or when no id is on both sides.
pub fn join_on_id(
    table: &TrackTable,
    features: Vec<Option<FeatureRecord>>,
) -> Outcome<Vec<MergedRecord>> {
    let by_id: HashMap<String, FeatureRecord> = features
        .into_iter()
        .flatten()
        .map(|f| (f.id.clone(), f))
        .collect();

    if table.is_empty() || by_id.is_empty() {
        return Outcome::Empty;
    }

    let rows: Vec<MergedRecord> = table
        .records()
        .iter()
        .filter_map(|track| {
            let id = track.id.as_deref()?;
            by_id.get(id).map(|features| MergedRecord {
                track: track.clone(),
                features: features.clone(),
            })
        })
        .collect();

    Outcome::from_vec(rows)
}
