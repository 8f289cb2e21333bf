mod error;
mod hash_embedder;
mod in_memory;
mod indexer;
mod loader;
mod retriever;
mod splitter;

use std::path::Path;

use tripwise_core::Document;

pub use error::{IngestionError, RetrievalError};
pub use hash_embedder::HashEmbedder;
pub use in_memory::InMemoryVectorStore;
pub use indexer::Indexer;
pub use loader::{load_file, PdfLoader, TextLoader};
pub use retriever::Retriever;
pub use splitter::{
    RecursiveCharacterTextSplitter, RecursiveCharacterTextSplitterBuilder, SplitterConfigError,
};

/// Loads one file and splits it into chunks ready for indexing.
pub async fn load_and_split(
    path: impl AsRef<Path>,
    splitter: &RecursiveCharacterTextSplitter,
) -> Result<Vec<Document>, IngestionError> {
    let documents = load_file(path.as_ref()).await?;
    Ok(splitter.split_documents(&documents))
}
