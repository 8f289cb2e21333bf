use std::path::Path;

use tripwise_core::Embedding;
use tripwise_retrieval::{
    load_and_split, InMemoryVectorStore, Indexer, RecursiveCharacterTextSplitter, Retriever,
};

use crate::{PlannerConfig, PlannerError};

/// Loads the brochure, chunks it and embeds every chunk into a fresh
/// in-memory store. Run once per process; the returned retriever serves
/// every destination lookup.
pub async fn index_corpus<E>(
    path: impl AsRef<Path>,
    embedder: E,
    config: &PlannerConfig,
) -> Result<Retriever<E, InMemoryVectorStore>, PlannerError>
where
    E: Embedding,
{
    let path = path.as_ref();
    let splitter = RecursiveCharacterTextSplitter::builder()
        .chunk_size(config.chunk_size)
        .chunk_overlap(config.chunk_overlap)
        .build()?;

    let chunks = load_and_split(path, &splitter).await?;
    let indexer = Indexer::new(embedder, InMemoryVectorStore::new());
    let added = indexer.add_documents(chunks).await?;
    tracing::info!(path = %path.display(), chunks = added, "indexed corpus");

    let (embedder, store) = indexer.into_parts();
    Ok(Retriever::new(embedder, store))
}
