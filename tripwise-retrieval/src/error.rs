use std::path::PathBuf;

use thiserror::Error;
use tripwise_core::{EmbeddingError, StoreError, TripwiseError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<RetrievalError> for TripwiseError {
    fn from(err: RetrievalError) -> Self {
        TripwiseError::Retrieval(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to extract text from {path}: {reason}")]
    Extract { path: PathBuf, reason: String },
    #[error("pdf support is not enabled; rebuild with the `pdf` feature to load {0}")]
    PdfDisabled(PathBuf),
}
