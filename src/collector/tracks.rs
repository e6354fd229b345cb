use tokio::time::sleep;

use crate::{
    collector::CollectorSettings,
    spotify::CatalogClient,
    types::{Playlist, PlaylistItem, PlaylistSummary, TrackRecord},
    utils, warning,
};

/// Walks playlists and pages through their entries.
pub struct TrackCollector<'a, C: CatalogClient> {
    client: &'a C,
    settings: &'a CollectorSettings,
}

impl<'a, C: CatalogClient> TrackCollector<'a, C> {
    pub fn new(client: &'a C, settings: &'a CollectorSettings) -> Self {
        Self { client, settings }
    }

    /// Raw entries of one playlist.
    ///
    /// Follows next pages while they exist and fewer than `item_cap` entries
    /// are gathered. A failing first page yields nothing for this playlist; a
    /// failing later page keeps the entries gathered so far.
    pub async fn collect_tracks(&self, playlist_id: &str) -> Vec<PlaylistItem> {
        let cap = self.settings.item_cap;
        let first = match self
            .client
            .playlist_items(playlist_id, self.settings.item_page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warning!("Failed to fetch playlist {}: {}", playlist_id, e);
                return Vec::new();
            }
        };

        let mut items = first.items;
        let mut next = first.next;
        while items.len() < cap {
            let Some(cursor) = next.take() else {
                break;
            };

            match self.client.next_item_page(&cursor).await {
                Ok(page) => {
                    items.extend(page.items);
                    next = page.next;
                }
                Err(e) => {
                    warning!("Failed to fetch next page of playlist {}: {}", playlist_id, e);
                    break;
                }
            }
        }

        items.truncate(cap);
        items
    }

    /// Collects track records from the first `max_playlists` playlists,
    /// pausing after each one.
    pub async fn collect_from(
        &self,
        playlists: &[Playlist],
    ) -> (Vec<TrackRecord>, Vec<PlaylistSummary>) {
        let selected = &playlists[..playlists.len().min(self.settings.max_playlists)];
        let pb = utils::progress_bar(selected.len() as u64, self.settings.show_progress);

        let mut tracks = Vec::new();
        let mut summaries = Vec::with_capacity(selected.len());
        for playlist in selected {
            pb.set_message(format!("Processing playlist: {}", playlist.name));

            let records = extract(self.collect_tracks(&playlist.id).await);
            summaries.push(PlaylistSummary {
                playlist: playlist.clone(),
                tracks: records.len(),
            });
            tracks.extend(records);

            pb.inc(1);
            sleep(self.settings.pause).await;
        }

        pb.finish_and_clear();
        (tracks, summaries)
    }
}

/// Projects playlist entries onto track records.
///
/// Entries without a track (removed or region-blocked) are skipped. The first
/// listed artist is taken as the track's artist.
pub fn extract(items: Vec<PlaylistItem>) -> Vec<TrackRecord> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .map(|track| {
            let first_artist = track.artists.into_iter().next();
            TrackRecord {
                id: track.id,
                name: track.name,
                artist: first_artist.as_ref().map(|a| a.name.clone()),
                artist_id: first_artist.and_then(|a| a.id),
                album: track.album.map(|a| a.name).unwrap_or_default(),
                popularity: track.popularity,
                duration_ms: track.duration_ms,
                explicit: track.explicit,
            }
        })
        .collect()
}
