use tokio::time::sleep;

use crate::{
    collector::{CollectorSettings, Outcome},
    info,
    spotify::{CatalogClient, CatalogError},
    types::{CountryCode, Playlist},
    utils, warning,
};

/// Finds candidate playlists for a market through featured lists and keyword
/// search.
pub struct PlaylistDiscovery<'a, C: CatalogClient> {
    client: &'a C,
    settings: &'a CollectorSettings,
}

impl<'a, C: CatalogClient> PlaylistDiscovery<'a, C> {
    pub fn new(client: &'a C, settings: &'a CollectorSettings) -> Self {
        Self { client, settings }
    }

    /// Runs both strategies and merges their results, featured first.
    ///
    /// Neither strategy can fail the discovery; when both come back empty the
    /// result is [`Outcome::Empty`].
    pub async fn discover(&self, country: &CountryCode) -> Outcome<Vec<Playlist>> {
        let featured = self.featured(country).await;
        info!("Found {} featured playlists", featured.len());

        let charts = self.keyword_search(country).await;
        info!("Found {} chart playlists", charts.len());

        let playlists = merge_playlists(featured, charts);
        if playlists.is_empty() {
            warning!(
                "No playlists found for {}. Please try a different country code.",
                country
            );
            return Outcome::Empty;
        }

        Outcome::Found(playlists)
    }

    /// Featured playlists for the market, following pages until there is no
    /// next page or the cap is reached.
    ///
    /// An unsupported market, like any other client failure, is logged and
    /// yields no playlists. A failure on a later page keeps what was already
    /// gathered.
    pub async fn featured(&self, country: &CountryCode) -> Vec<Playlist> {
        let cap = self.settings.featured_cap;
        let first = match self
            .client
            .featured_playlists(country, self.settings.featured_page_size)
            .await
        {
            Ok(page) => page,
            Err(CatalogError::Unsupported { feature, .. }) => {
                warning!("{} not available for {}", feature, country);
                return Vec::new();
            }
            Err(e) => {
                warning!("Featured playlists not available for {}: {}", country, e);
                return Vec::new();
            }
        };

        let mut playlists = first.items;
        let mut next = first.next;
        while playlists.len() < cap {
            let Some(cursor) = next.take() else {
                break;
            };

            match self.client.next_playlist_page(&cursor).await {
                Ok(page) => {
                    playlists.extend(page.items);
                    next = page.next;
                }
                Err(e) => {
                    warning!("Failed to fetch next featured page: {}", e);
                    break;
                }
            }
        }

        playlists.truncate(cap);
        playlists
    }

    /// Playlists matching the keyword queries for the market.
    ///
    /// Each query is independent: a failing query is logged and skipped. The
    /// fixed pause follows every query, failed or not.
    pub async fn keyword_search(&self, country: &CountryCode) -> Vec<Playlist> {
        let mut playlists = Vec::new();

        for query in utils::search_queries(&self.settings.search_templates, country) {
            match self
                .client
                .search_playlists(&query, self.settings.search_limit)
                .await
            {
                Ok(page) => playlists.extend(page.items),
                Err(e) => warning!("Error with query '{}': {}", query, e),
            }
            sleep(self.settings.pause).await;
        }

        if playlists.is_empty() {
            info!("No chart playlists found for country code: {}", country);
        }

        playlists
    }
}

/// Concatenates both strategy results and keeps one playlist per id.
///
/// A repeated id keeps the slot of its first appearance and the record of its
/// last.
pub fn merge_playlists(featured: Vec<Playlist>, searched: Vec<Playlist>) -> Vec<Playlist> {
    utils::dedupe_last_wins(featured.into_iter().chain(searched), |p| {
        Some(p.id.clone())
    })
}
