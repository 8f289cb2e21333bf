use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{Checkpoint, Checkpointer, GraphError, StateSchema};

/// One line of a thread's checkpoint log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "S: StateSchema")]
pub struct CheckpointRecord<S: StateSchema> {
    pub seq: u64,
    pub created_at: String,
    pub checkpoint: Checkpoint<S>,
}

/// Keeps paused threads on disk, one JSON-lines file per thread.
///
/// Each save appends a record; the last line is the live checkpoint. Clearing
/// a thread removes its file. File names carry a digest of the raw thread id,
/// so ids that sanitize alike still get separate logs.
#[derive(Clone, Debug)]
pub struct FileCheckpointer {
    dir: PathBuf,
}

fn io_failure(err: impl std::fmt::Display) -> GraphError {
    GraphError::Checkpoint(err.to_string())
}

fn file_stem(thread_id: &str) -> String {
    let cleaned: String = thread_id
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c == '_' || c.is_whitespace());
    let readable = if cleaned.is_empty() { "thread" } else { cleaned };

    let digest = Sha256::digest(thread_id.as_bytes());
    let suffix: String = digest[..6].iter().map(|b| format!("{b:02x}")).collect();
    format!("{readable}-{suffix}")
}

impl FileCheckpointer {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Log file for `thread_id`: the id with path separators and reserved
    /// characters replaced by `_`, then `-` and 12 hex digits of its SHA-256.
    pub fn thread_path(&self, thread_id: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", file_stem(thread_id)))
    }

    async fn latest<S: StateSchema>(
        &self,
        thread_id: &str,
    ) -> Result<Option<CheckpointRecord<S>>, GraphError> {
        let contents = match fs::read_to_string(self.thread_path(thread_id)).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_failure(err)),
        };
        let latest: Option<CheckpointRecord<S>> = contents
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(io_failure))
            .transpose()?;

        // Digest collisions must not hand one thread another's pause.
        Ok(latest.filter(|record| record.checkpoint.thread_id == thread_id))
    }
}

#[async_trait::async_trait]
impl<S: StateSchema> Checkpointer<S> for FileCheckpointer {
    async fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), GraphError> {
        fs::create_dir_all(&self.dir).await.map_err(io_failure)?;

        let seq = match self.latest::<S>(&checkpoint.thread_id).await? {
            Some(previous) => previous.seq + 1,
            None => 1,
        };
        let record = CheckpointRecord {
            seq,
            created_at: checkpoint.created_at.clone(),
            checkpoint: checkpoint.clone(),
        };
        let mut line = serde_json::to_string(&record).map_err(io_failure)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.thread_path(&checkpoint.thread_id))
            .await
            .map_err(io_failure)?;
        file.write_all(line.as_bytes()).await.map_err(io_failure)?;
        file.flush().await.map_err(io_failure)?;
        tracing::debug!(thread_id = %checkpoint.thread_id, seq, "checkpoint appended");
        Ok(())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, GraphError> {
        Ok(self
            .latest::<S>(thread_id)
            .await?
            .map(|record| record.checkpoint))
    }

    async fn clear(&self, thread_id: &str) -> Result<(), GraphError> {
        if self.latest::<S>(thread_id).await?.is_none() {
            return Ok(());
        }
        match fs::remove_file(self.thread_path(thread_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_failure(err)),
        }
    }
}
