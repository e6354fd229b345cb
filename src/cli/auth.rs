use crate::{
    error,
    spotify::{CatalogClient, SpotifyClient},
    success, utils,
};

/// Obtains (or reuses) an app token and checks it against the API with a
/// one-result playlist search.
pub async fn auth() {
    let pb = utils::spinner("Requesting access token...", true);

    let client = match SpotifyClient::connect().await {
        Ok(client) => client,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot authenticate with Spotify API. Err: {}", e);
        }
    };

    pb.set_message("Checking connection...");
    let result = client.search_playlists("top hits", 1).await;
    pb.finish_and_clear();

    match result {
        Ok(page) => success!(
            "Successfully connected to {}! Found {} playlist(s) for a test search.",
            client.api_url(),
            page.items.len()
        ),
        Err(e) => error!("Token obtained but the API check failed. Err: {}", e),
    }
}
