mod checkpoint;
mod config;
mod error;
mod file_checkpointer;
mod graph;
mod interrupt;
mod state;

pub use checkpoint::{Checkpoint, Checkpointer, InMemoryCheckpointer};
pub use config::ExecutionConfig;
pub use error::GraphError;
pub use file_checkpointer::{CheckpointRecord, FileCheckpointer};
pub use graph::{ExecutableGraph, GraphBuilder, GraphOutcome, END};
pub use interrupt::GraphInterrupt;
pub use state::{GraphState, StateSchema, StateUpdate};
