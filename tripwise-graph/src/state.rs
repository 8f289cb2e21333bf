use std::fmt::Debug;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Marker for workflow state that can be checkpointed and handed between nodes.
pub trait StateSchema:
    Serialize + DeserializeOwned + Clone + Default + Debug + Send + Sync + 'static
{
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct GraphState<S: StateSchema> {
    pub data: S,
}

impl<S: StateSchema> GraphState<S> {
    pub fn new(data: S) -> Self {
        Self { data }
    }
}

/// Full replacement state produced by a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct StateUpdate<S: StateSchema> {
    pub data: S,
}

impl<S: StateSchema> StateUpdate<S> {
    pub fn new(data: S) -> Self {
        Self { data }
    }
}
