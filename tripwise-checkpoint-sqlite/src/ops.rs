use sqlx::{Row, SqlitePool};

use crate::error::CheckpointSqlError;
use crate::schema::MIGRATION_STATEMENTS_SQL;

#[derive(Debug, Clone)]
pub(crate) struct StoredCheckpoint {
    pub thread_id: String,
    pub node: Option<String>,
    pub step: Option<i64>,
    pub created_at: String,
    pub state_json: serde_json::Value,
}

pub(crate) async fn run_migrations(pool: &SqlitePool) -> Result<(), CheckpointSqlError> {
    for statement in MIGRATION_STATEMENTS_SQL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(CheckpointSqlError::Migration)?;
    }
    Ok(())
}

/// Appends a checkpoint row and returns its sequence number within the thread.
pub(crate) async fn save_checkpoint(
    pool: &SqlitePool,
    thread_id: &str,
    node: &str,
    step: i64,
    created_at: &str,
    state: &serde_json::Value,
) -> Result<i64, CheckpointSqlError> {
    let state_json = serde_json::to_string(state)?;
    let mut tx = pool.begin().await.map_err(CheckpointSqlError::Query)?;

    let seq: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(seq), 0) + 1 FROM checkpoints WHERE thread_id = ?")
            .bind(thread_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(CheckpointSqlError::Query)?;

    sqlx::query(
        "INSERT INTO checkpoints (thread_id, seq, created_at, node, step, state_json) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(thread_id)
    .bind(seq)
    .bind(created_at)
    .bind(node)
    .bind(step)
    .bind(state_json)
    .execute(&mut *tx)
    .await
    .map_err(CheckpointSqlError::Query)?;

    tx.commit().await.map_err(CheckpointSqlError::Query)?;
    Ok(seq)
}

pub(crate) async fn load_latest_checkpoint(
    pool: &SqlitePool,
    thread_id: &str,
) -> Result<Option<StoredCheckpoint>, CheckpointSqlError> {
    let row = sqlx::query(
        "SELECT thread_id, node, step, created_at, state_json FROM checkpoints \
         WHERE thread_id = ? ORDER BY seq DESC LIMIT 1",
    )
    .bind(thread_id)
    .fetch_optional(pool)
    .await
    .map_err(CheckpointSqlError::Query)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let state_text: String = row.try_get("state_json").map_err(CheckpointSqlError::Query)?;
    Ok(Some(StoredCheckpoint {
        thread_id: row.try_get("thread_id").map_err(CheckpointSqlError::Query)?,
        node: row.try_get("node").map_err(CheckpointSqlError::Query)?,
        step: row.try_get("step").map_err(CheckpointSqlError::Query)?,
        created_at: row.try_get("created_at").map_err(CheckpointSqlError::Query)?,
        state_json: serde_json::from_str(&state_text)?,
    }))
}

pub(crate) async fn delete_checkpoints(
    pool: &SqlitePool,
    thread_id: &str,
) -> Result<u64, CheckpointSqlError> {
    let result = sqlx::query("DELETE FROM checkpoints WHERE thread_id = ?")
        .bind(thread_id)
        .execute(pool)
        .await
        .map_err(CheckpointSqlError::Query)?;
    Ok(result.rows_affected())
}
