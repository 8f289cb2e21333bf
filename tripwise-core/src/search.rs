use async_trait::async_trait;

use crate::TripwiseError;

/// Returns the text of the `k` passages closest to `query`, best match first.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, TripwiseError>;
}

#[async_trait]
impl<S: SimilaritySearch + ?Sized> SimilaritySearch for std::sync::Arc<S> {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, TripwiseError> {
        (**self).search(query, k).await
    }
}
