use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::Instrument;
use tripwise_core::Runnable;

use crate::{
    Checkpoint, Checkpointer, ExecutionConfig, GraphError, GraphInterrupt, GraphState,
    InMemoryCheckpointer, StateSchema, StateUpdate,
};

/// Routing target that terminates a run.
pub const END: &str = "__end__";

type Node<S> = Box<dyn Runnable<GraphState<S>, StateUpdate<S>>>;
type Router<S> = Box<dyn Fn(&GraphState<S>) -> String + Send + Sync>;

enum Edge<S: StateSchema> {
    Direct(String),
    Conditional(Router<S>),
}

pub struct GraphBuilder<S: StateSchema> {
    nodes: HashMap<String, Node<S>>,
    edges: HashMap<String, Edge<S>>,
    entry: Option<String>,
    interrupt_after: HashSet<String>,
    checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    config: ExecutionConfig,
}

impl<S: StateSchema> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateSchema> GraphBuilder<S> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
            interrupt_after: HashSet::new(),
            checkpointer: None,
            config: ExecutionConfig::default(),
        }
    }

    pub fn add_node<R>(mut self, name: &str, node: R) -> Self
    where
        R: Runnable<GraphState<S>, StateUpdate<S>> + 'static,
    {
        self.nodes.insert(name.to_string(), Box::new(node));
        self
    }

    pub fn set_entry(mut self, name: &str) -> Self {
        self.entry = Some(name.to_string());
        self
    }

    pub fn add_edge(mut self, from: &str, to: &str) -> Self {
        self.edges
            .insert(from.to_string(), Edge::Direct(to.to_string()));
        self
    }

    /// Routes out of `from` by calling `router` on the state the node produced.
    pub fn add_conditional_edge<F>(mut self, from: &str, router: F) -> Self
    where
        F: Fn(&GraphState<S>) -> String + Send + Sync + 'static,
    {
        self.edges
            .insert(from.to_string(), Edge::Conditional(Box::new(router)));
        self
    }

    /// Pauses the run after each named node has executed.
    pub fn with_interrupt_after<I, T>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.interrupt_after
            .extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn with_checkpointer<C>(mut self, checkpointer: C) -> Self
    where
        C: Checkpointer<S> + 'static,
    {
        self.checkpointer = Some(Arc::new(checkpointer));
        self
    }

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ExecutableGraph<S>, GraphError> {
        let entry = self.entry.ok_or_else(|| GraphError::MissingNode {
            node: "<entry>".to_string(),
        })?;
        let known = |name: &str| name == END || self.nodes.contains_key(name);

        if !self.nodes.contains_key(&entry) {
            return Err(GraphError::MissingNode { node: entry });
        }
        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(GraphError::MissingNode { node: from.clone() });
            }
            if let Edge::Direct(to) = edge {
                if !known(to) {
                    return Err(GraphError::MissingNode { node: to.clone() });
                }
            }
        }
        if let Some(node) = self
            .interrupt_after
            .iter()
            .find(|node| !self.nodes.contains_key(*node))
        {
            return Err(GraphError::MissingNode { node: node.clone() });
        }

        let checkpointer: Arc<dyn Checkpointer<S>> = match self.checkpointer {
            Some(checkpointer) => checkpointer,
            None => Arc::new(InMemoryCheckpointer::<S>::new()),
        };

        Ok(ExecutableGraph {
            nodes: self.nodes,
            edges: self.edges,
            entry,
            interrupt_after: self.interrupt_after,
            checkpointer,
            config: self.config,
        })
    }
}

#[derive(Debug)]
pub enum GraphOutcome<S: StateSchema> {
    Completed(GraphState<S>),
    Interrupted(GraphInterrupt<S>),
}

pub struct ExecutableGraph<S: StateSchema> {
    nodes: HashMap<String, Node<S>>,
    edges: HashMap<String, Edge<S>>,
    entry: String,
    interrupt_after: HashSet<String>,
    checkpointer: Arc<dyn Checkpointer<S>>,
    config: ExecutionConfig,
}

impl<S: StateSchema> ExecutableGraph<S> {
    /// Starts a fresh run from the entry node, discarding any pause left on the thread.
    pub async fn invoke(
        &self,
        thread_id: &str,
        state: GraphState<S>,
    ) -> Result<GraphOutcome<S>, GraphError> {
        self.checkpointer.clear(thread_id).await?;
        self.run_from(thread_id, state, self.entry.clone(), 0).await
    }

    /// Continues a paused run. `update` edits the checkpointed state before
    /// routing out of the node that paused.
    pub async fn resume<F>(&self, thread_id: &str, update: F) -> Result<GraphOutcome<S>, GraphError>
    where
        F: FnOnce(&mut S) + Send,
    {
        let checkpoint = self
            .checkpointer
            .load(thread_id)
            .await?
            .ok_or_else(|| GraphError::NotInterrupted {
                thread_id: thread_id.to_string(),
            })?;

        let mut state = checkpoint.state;
        update(&mut state.data);
        let next = self.route(&checkpoint.node, &state);
        tracing::info!(thread_id, from = %checkpoint.node, to = %next, "resuming graph");
        let step = usize::try_from(checkpoint.step)
            .map_err(|_| GraphError::Checkpoint("checkpoint step out of range".to_string()))?;
        self.run_from(thread_id, state, next, step).await
    }

    /// The pause currently stored for `thread_id`, if any.
    pub async fn pending(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, GraphError> {
        self.checkpointer.load(thread_id).await
    }

    async fn run_from(
        &self,
        thread_id: &str,
        mut state: GraphState<S>,
        mut current: String,
        mut step: usize,
    ) -> Result<GraphOutcome<S>, GraphError> {
        loop {
            if current == END {
                self.checkpointer.clear(thread_id).await?;
                return Ok(GraphOutcome::Completed(state));
            }
            if let Some(max) = self.config.max_steps {
                if step >= max {
                    return Err(GraphError::MaxStepsExceeded { max, reached: step });
                }
            }

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::MissingNode {
                    node: current.clone(),
                })?;
            let span = tracing::info_span!("graph_node", node = %current, step);
            let update = node
                .invoke(state)
                .instrument(span)
                .await
                .map_err(|source| GraphError::NodeFailed {
                    node: current.clone(),
                    source,
                })?;
            state = GraphState::new(update.data);
            step += 1;

            if self.interrupt_after.contains(&current) {
                let checkpoint =
                    Checkpoint::new(thread_id.to_string(), state.clone(), step as u64, current.clone());
                self.checkpointer.save(&checkpoint).await?;
                tracing::info!(thread_id, node = %current, step, "graph interrupted");
                return Ok(GraphOutcome::Interrupted(GraphInterrupt {
                    node: current,
                    state,
                }));
            }

            current = self.route(&current, &state);
        }
    }

    fn route(&self, from: &str, state: &GraphState<S>) -> String {
        let next = match self.edges.get(from) {
            Some(Edge::Direct(to)) => to.clone(),
            Some(Edge::Conditional(router)) => router(state),
            None => END.to_string(),
        };
        tracing::debug!(from, to = %next, "route");
        next
    }
}
