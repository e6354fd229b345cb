use tokio::time::sleep;

use crate::{
    collector::CollectorSettings,
    spotify::{AUDIO_FEATURES_BATCH_LIMIT, CatalogClient},
    types::FeatureRecord,
    utils, warning,
};

/// Fetches audio features in batches bounded by the endpoint limit.
pub struct FeatureBatchFetcher<'a, C: CatalogClient> {
    client: &'a C,
    settings: &'a CollectorSettings,
}

impl<'a, C: CatalogClient> FeatureBatchFetcher<'a, C> {
    pub fn new(client: &'a C, settings: &'a CollectorSettings) -> Self {
        Self { client, settings }
    }

    pub fn batch_size(&self) -> usize {
        self.settings
            .feature_batch_size
            .clamp(1, AUDIO_FEATURES_BATCH_LIMIT)
    }

    /// One entry per requested id, in request order.
    ///
    /// Each consecutive chunk is one call followed by the fixed pause. A chunk
    /// answer shorter or longer than the chunk is padded or cut so positions
    /// stay aligned, and a failed chunk contributes `None` for each of its ids.
    pub async fn fetch_features(&self, track_ids: &[String]) -> Vec<Option<FeatureRecord>> {
        let batch_size = self.batch_size();
        let batches = utils::batch_count(track_ids.len(), batch_size);
        let pb = utils::progress_bar(batches as u64, self.settings.show_progress);
        pb.set_message("Fetching audio features...");

        let mut features = Vec::with_capacity(track_ids.len());
        for (idx, chunk) in track_ids.chunks(batch_size).enumerate() {
            match self.client.audio_features(chunk).await {
                Ok(mut batch) => {
                    batch.resize(chunk.len(), None);
                    features.extend(batch);
                }
                Err(e) => {
                    warning!(
                        "Failed to fetch audio features for batch {}/{}: {}",
                        idx + 1,
                        batches,
                        e
                    );
                    features.extend(chunk.iter().map(|_| None));
                }
            }

            pb.inc(1);
            sleep(self.settings.pause).await;
        }

        pb.finish_and_clear();
        features
    }
}
