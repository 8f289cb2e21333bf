mod error;
mod google;

pub use error::EmbeddingProviderError;
pub use google::GoogleEmbedding;
