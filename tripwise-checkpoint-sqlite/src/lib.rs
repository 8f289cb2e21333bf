//! SQLite-backed [`Checkpointer`] for paused workflow threads.
//!
//! Every save appends a row with a per-thread sequence number; `load` returns
//! the newest row and `clear` drops the thread's history.

mod error;
mod ops;
mod schema;

use std::convert::TryFrom;

use tripwise_graph::{Checkpoint, Checkpointer, GraphError, GraphState, StateSchema};

pub use error::CheckpointSqlError;

#[derive(Debug, Clone)]
pub struct SqliteCheckpointer {
    pool: sqlx::SqlitePool,
}

#[derive(Debug, Clone)]
pub struct SqliteCheckpointerBuilder {
    database_url: String,
    max_connections: u32,
}

impl SqliteCheckpointer {
    pub fn builder(database_url: impl Into<String>) -> SqliteCheckpointerBuilder {
        SqliteCheckpointerBuilder {
            database_url: database_url.into(),
            max_connections: 1,
        }
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}

impl SqliteCheckpointerBuilder {
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub async fn build(self) -> Result<SqliteCheckpointer, CheckpointSqlError> {
        let options = self
            .database_url
            .parse::<sqlx::sqlite::SqliteConnectOptions>()
            .map_err(CheckpointSqlError::Connection)?
            .create_if_missing(true);
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await
            .map_err(CheckpointSqlError::Connection)?;

        ops::run_migrations(&pool).await?;
        tracing::debug!(database_url = %self.database_url, "sqlite checkpointer ready");

        Ok(SqliteCheckpointer { pool })
    }
}

fn graph_checkpoint_error(message: impl Into<String>) -> GraphError {
    GraphError::Checkpoint(message.into())
}

fn map_sql_error(error: CheckpointSqlError) -> GraphError {
    graph_checkpoint_error(error.to_string())
}

#[async_trait::async_trait]
impl<S: StateSchema> Checkpointer<S> for SqliteCheckpointer {
    async fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), GraphError> {
        let step = i64::try_from(checkpoint.step)
            .map_err(|_| graph_checkpoint_error("checkpoint step does not fit into i64"))?;
        let state_json = serde_json::to_value(&checkpoint.state).map_err(|error| {
            graph_checkpoint_error(format!("failed to serialize checkpoint state: {error}"))
        })?;

        ops::save_checkpoint(
            &self.pool,
            &checkpoint.thread_id,
            &checkpoint.node,
            step,
            &checkpoint.created_at,
            &state_json,
        )
        .await
        .map_err(map_sql_error)?;

        Ok(())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, GraphError> {
        let stored = ops::load_latest_checkpoint(&self.pool, thread_id)
            .await
            .map_err(map_sql_error)?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        let step_i64 = stored.step.unwrap_or_default();
        let step = u64::try_from(step_i64)
            .map_err(|_| graph_checkpoint_error("checkpoint step is negative"))?;

        let state: GraphState<S> = serde_json::from_value(stored.state_json).map_err(|error| {
            graph_checkpoint_error(format!("failed to deserialize checkpoint state: {error}"))
        })?;

        Ok(Some(Checkpoint {
            thread_id: stored.thread_id,
            state,
            step,
            node: stored.node.unwrap_or_default(),
            created_at: stored.created_at,
        }))
    }

    async fn clear(&self, thread_id: &str) -> Result<(), GraphError> {
        ops::delete_checkpoints(&self.pool, thread_id)
            .await
            .map_err(map_sql_error)?;
        Ok(())
    }
}
