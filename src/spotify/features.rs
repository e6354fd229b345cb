use crate::{
    spotify::{AUDIO_FEATURES_BATCH_LIMIT, CatalogError, CatalogResult, SpotifyClient},
    types::{AudioFeaturesResponse, FeatureRecord},
};

/// Retrieves audio features for a batch of tracks in a single API request.
///
/// The response is positional: entry `i` belongs to `ids[i]`, and ids the
/// service could not resolve come back as `null`, which is kept as `None`.
///
/// # Batch Limit
///
/// At most [`AUDIO_FEATURES_BATCH_LIMIT`] ids per call. Larger batches are
/// rejected before any request is sent; splitting is the caller's job.
///
/// # API Endpoint
///
/// `GET /audio-features?ids={comma separated ids}`
pub async fn get_audio_features(
    client: &SpotifyClient,
    ids: &[String],
) -> CatalogResult<Vec<Option<FeatureRecord>>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    if ids.len() > AUDIO_FEATURES_BATCH_LIMIT {
        return Err(CatalogError::Api {
            status: 400,
            message: format!(
                "{} ids requested, the endpoint accepts at most {}",
                ids.len(),
                AUDIO_FEATURES_BATCH_LIMIT
            ),
        });
    }

    let url = client.endpoint("audio-features", &[("ids", ids.join(","))])?;
    let response = client
        .get_json::<AudioFeaturesResponse>(url.as_str())
        .await?;

    Ok(response.audio_features)
}
