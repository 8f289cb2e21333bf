use async_trait::async_trait;
use tripwise_core::{Embedding, SearchResult, SimilaritySearch, TripwiseError, VectorStore};

use crate::RetrievalError;

/// Embeds the query and searches the store with it.
pub struct Retriever<E, S> {
    embedder: E,
    store: S,
}

impl<E, S> Retriever<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        let embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&embedding, top_k).await?;
        Ok(results)
    }
}

#[async_trait]
impl<E, S> SimilaritySearch for Retriever<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, TripwiseError> {
        let results = self.retrieve(query, k).await?;
        tracing::debug!(
            query,
            k,
            hits = results.len(),
            best = results.first().map(|r| r.score),
            "similarity search"
        );
        Ok(results
            .into_iter()
            .map(|result| result.document.content)
            .collect())
    }
}
