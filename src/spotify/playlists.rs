use crate::{
    spotify::{CatalogError, CatalogResult, SpotifyClient},
    types::{CountryCode, Page, PagingObject, Playlist, PlaylistItem, PlaylistsEnvelope},
};

/// Retrieves the first page of featured playlists for a market.
///
/// The service answers `404` (and for some apps `403`) when featured
/// playlists are not offered for the market or the application. Both are
/// reported as [`CatalogError::Unsupported`] so the caller can treat them as
/// an empty result.
///
/// # API Endpoint
///
/// `GET /browse/featured-playlists?country={country}&limit={limit}`
pub async fn get_featured(
    client: &SpotifyClient,
    country: &CountryCode,
    limit: u32,
) -> CatalogResult<Page<Playlist>> {
    let url = client.endpoint(
        "browse/featured-playlists",
        &[
            ("country", country.to_string()),
            ("limit", limit.to_string()),
        ],
    )?;

    match client.get_json::<PlaylistsEnvelope>(url.as_str()).await {
        Ok(envelope) => Ok(into_playlist_page(envelope)),
        Err(CatalogError::Api { status, message }) if status == 404 || status == 403 => {
            Err(CatalogError::Unsupported {
                feature: format!("Featured playlists ({})", message),
                country: country.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Searches playlists by keyword.
///
/// # API Endpoint
///
/// `GET /search?q={query}&type=playlist&limit={limit}`
pub async fn search(
    client: &SpotifyClient,
    query: &str,
    limit: u32,
) -> CatalogResult<Page<Playlist>> {
    let url = client.endpoint(
        "search",
        &[
            ("q", query.to_string()),
            ("type", "playlist".to_string()),
            ("limit", limit.to_string()),
        ],
    )?;

    let envelope = client.get_json::<PlaylistsEnvelope>(url.as_str()).await?;
    Ok(into_playlist_page(envelope))
}

/// Follows a `next` URL of a featured or search page. Both endpoints wrap
/// their pages in the same `playlists` envelope.
pub async fn get_next_playlists(
    client: &SpotifyClient,
    cursor: &str,
) -> CatalogResult<Page<Playlist>> {
    let envelope = client.get_json::<PlaylistsEnvelope>(cursor).await?;
    Ok(into_playlist_page(envelope))
}

/// Retrieves the first page of a playlist's entries.
///
/// # API Endpoint
///
/// `GET /playlists/{id}/tracks?limit={limit}`
pub async fn get_items(
    client: &SpotifyClient,
    playlist_id: &str,
    limit: u32,
) -> CatalogResult<Page<PlaylistItem>> {
    let url = client.endpoint(
        &format!("playlists/{}/tracks", playlist_id),
        &[("limit", limit.to_string())],
    )?;

    let page = client
        .get_json::<PagingObject<PlaylistItem>>(url.as_str())
        .await?;
    Ok(into_item_page(page))
}

pub async fn get_next_items(
    client: &SpotifyClient,
    cursor: &str,
) -> CatalogResult<Page<PlaylistItem>> {
    let page = client.get_json::<PagingObject<PlaylistItem>>(cursor).await?;
    Ok(into_item_page(page))
}

/// Maps a raw playlists envelope to a typed page.
///
/// Null or malformed entries and entries without an id are dropped; the
/// service returns them for playlists that were deleted or are unavailable.
pub fn into_playlist_page(envelope: PlaylistsEnvelope) -> Page<Playlist> {
    let items = envelope
        .playlists
        .items
        .into_iter()
        .flatten()
        .filter_map(|p| match p.id {
            Some(id) if !id.is_empty() => Some(Playlist { id, name: p.name }),
            _ => None,
        })
        .collect();

    Page::new(items, envelope.playlists.next)
}

/// Maps a raw page of playlist entries to a typed page, dropping entries that
/// could not be decoded.
pub fn into_item_page(page: PagingObject<PlaylistItem>) -> Page<PlaylistItem> {
    Page::new(page.items.into_iter().flatten().collect(), page.next)
}
