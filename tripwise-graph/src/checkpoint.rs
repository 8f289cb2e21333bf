use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::{GraphError, GraphState, StateSchema};

/// State saved when a run pauses. `node` is the node that just ran and
/// `step` the number of node executions so far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct Checkpoint<S: StateSchema> {
    pub thread_id: String,
    pub state: GraphState<S>,
    pub step: u64,
    pub node: String,
    pub created_at: String,
}

impl<S: StateSchema> Checkpoint<S> {
    pub fn new(thread_id: String, state: GraphState<S>, step: u64, node: String) -> Self {
        Self {
            thread_id,
            state,
            step,
            node,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[async_trait::async_trait]
pub trait Checkpointer<S: StateSchema>: Send + Sync {
    async fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), GraphError>;
    /// Latest checkpoint for the thread, if any.
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, GraphError>;
    async fn clear(&self, thread_id: &str) -> Result<(), GraphError>;
}

#[async_trait::async_trait]
impl<S: StateSchema, C: Checkpointer<S> + ?Sized> Checkpointer<S> for Arc<C> {
    async fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), GraphError> {
        (**self).save(checkpoint).await
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, GraphError> {
        (**self).load(thread_id).await
    }

    async fn clear(&self, thread_id: &str) -> Result<(), GraphError> {
        (**self).clear(thread_id).await
    }
}

#[derive(Clone)]
pub struct InMemoryCheckpointer<S: StateSchema> {
    inner: Arc<RwLock<HashMap<String, Checkpoint<S>>>>,
}

impl<S: StateSchema> Default for InMemoryCheckpointer<S> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<S: StateSchema> InMemoryCheckpointer<S> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl<S: StateSchema> Checkpointer<S> for InMemoryCheckpointer<S> {
    async fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), GraphError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| GraphError::Checkpoint("lock".into()))?;
        guard.insert(checkpoint.thread_id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, GraphError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| GraphError::Checkpoint("lock".into()))?;
        Ok(guard.get(thread_id).cloned())
    }

    async fn clear(&self, thread_id: &str) -> Result<(), GraphError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| GraphError::Checkpoint("lock".into()))?;
        guard.remove(thread_id);
        Ok(())
    }
}
