use tripwise_core::{Document, Embedding, VectorStore};

use crate::RetrievalError;

/// Embeds documents in one batch and writes them to a store.
pub struct Indexer<E, S> {
    embedder: E,
    store: S,
}

impl<E, S> Indexer<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    pub async fn add_documents(&self, docs: Vec<Document>) -> Result<usize, RetrievalError> {
        for doc in &docs {
            if doc.id.trim().is_empty() {
                return Err(RetrievalError::InvalidId(doc.id.clone()));
            }
        }
        if docs.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = docs.iter().map(|doc| doc.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        let docs_with_embeddings: Vec<Document> = docs
            .into_iter()
            .zip(embeddings)
            .map(|(mut doc, embedding)| {
                doc.embedding = Some(embedding);
                doc
            })
            .collect();

        let added = docs_with_embeddings.len();
        self.store.add(docs_with_embeddings).await?;
        tracing::debug!(added, "indexed documents");
        Ok(added)
    }

    pub fn into_parts(self) -> (E, S) {
        (self.embedder, self.store)
    }
}
