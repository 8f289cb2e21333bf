use thiserror::Error;
use tripwise_core::TripwiseError;
use tripwise_graph::GraphError;
use tripwise_retrieval::{IngestionError, RetrievalError, SplitterConfigError};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Workflow(#[from] GraphError),
    #[error(transparent)]
    Core(#[from] TripwiseError),
    #[error("failed to load corpus: {0}")]
    Corpus(#[from] IngestionError),
    #[error("failed to index corpus: {0}")]
    Index(#[from] RetrievalError),
    #[error("invalid splitter settings: {0}")]
    Splitter(#[from] SplitterConfigError),
    #[error("workflow finished without a reply for thread '{thread_id}'")]
    NoReply { thread_id: String },
}

impl PlannerError {
    /// The underlying failure of the node that aborted the turn, if any.
    pub fn node_error(&self) -> Option<(&str, &TripwiseError)> {
        match self {
            PlannerError::Workflow(GraphError::NodeFailed { node, source }) => {
                Some((node.as_str(), source))
            }
            _ => None,
        }
    }
}
