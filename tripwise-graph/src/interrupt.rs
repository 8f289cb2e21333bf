use crate::{GraphState, StateSchema};

/// A run paused after `node`; `state` is what was checkpointed.
#[derive(Clone, Debug)]
pub struct GraphInterrupt<S: StateSchema> {
    pub node: String,
    pub state: GraphState<S>,
}
