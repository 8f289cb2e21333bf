mod document;
mod embedding;
mod error;
mod llm;
mod output_parsers;
mod retry;
mod runnable;
mod search;
mod vector_store;

pub use document::Document;
pub use embedding::Embedding;
pub use error::{EmbeddingError, StoreError, TripwiseError};
pub use llm::{Llm, LlmRequest, LlmResponse, Message, ResponseFormat, Role};
pub use output_parsers::{StrOutputParser, StructuredOutput, StructuredOutputParser};
pub use retry::{is_retryable, RetryPolicy, Retrying};
pub use runnable::Runnable;
pub use search::SimilaritySearch;
pub use vector_store::{SearchResult, VectorStore};

pub type Value = serde_json::Value;
