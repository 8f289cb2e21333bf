use thiserror::Error;
use tripwise_core::TripwiseError;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("checkpoint failed: {0}")]
    Checkpoint(String),
    #[error("node '{node}' failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: TripwiseError,
    },
    #[error("missing node: {node}")]
    MissingNode { node: String },
    #[error("Max steps exceeded: reached {reached}, limit {max}")]
    MaxStepsExceeded { max: usize, reached: usize },
    #[error("thread '{thread_id}' has no pending interrupt")]
    NotInterrupted { thread_id: String },
}

