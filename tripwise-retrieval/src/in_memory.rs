use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tripwise_core::{Document, SearchResult, StoreError, VectorStore};

struct Entry {
    document: Document,
    embedding: Vec<f32>,
    norm: f32,
}

#[derive(Default)]
struct Index {
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
    dimension: Option<usize>,
}

impl Index {
    fn upsert(&mut self, entry: Entry) {
        match self.positions.get(&entry.document.id) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.positions
                    .insert(entry.document.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    fn remove(&mut self, id: &str) {
        let Some(position) = self.positions.remove(id) else {
            return;
        };
        self.entries.swap_remove(position);
        if let Some(moved) = self.entries.get(position) {
            self.positions.insert(moved.document.id.clone(), position);
        }
    }
}

/// Brute-force cosine-similarity store for a single brochure.
///
/// Re-adding an id replaces the document. A batch is checked in full before
/// any of it is stored, so a bad document leaves the store untouched.
#[derive(Clone, Default)]
pub struct InMemoryVectorStore {
    index: Arc<RwLock<Index>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(&self, docs: Vec<Document>) -> Result<(), StoreError> {
        let mut index = self.index.write().await;
        let mut dimension = index.dimension;
        let mut staged = Vec::with_capacity(docs.len());

        for mut document in docs {
            if document.id.trim().is_empty() {
                return Err(StoreError::InvalidId(document.id));
            }
            let Some(embedding) = document.embedding.take() else {
                return Err(StoreError::MissingEmbedding(document.id));
            };
            let expected = *dimension.get_or_insert(embedding.len());
            if expected != embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    got: embedding.len(),
                });
            }
            staged.push(Entry {
                norm: norm(&embedding),
                document,
                embedding,
            });
        }

        index.dimension = dimension;
        for entry in staged {
            index.upsert(entry);
        }
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        let index = self.index.read().await;
        if let Some(expected) = index.dimension {
            if expected != query_embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    got: query_embedding.len(),
                });
            }
        }

        let query_norm = norm(query_embedding);
        let mut results: Vec<SearchResult> = index
            .entries
            .iter()
            .map(|entry| SearchResult {
                document: entry.document.clone(),
                score: cosine(query_embedding, query_norm, entry),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        Ok(results)
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut index = self.index.write().await;
        for id in ids {
            index.remove(id);
        }
        Ok(())
    }

    async fn count(&self) -> usize {
        self.index.read().await.entries.len()
    }
}

fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

// Zero vectors score 0; NaN sinks to the bottom.
fn cosine(query: &[f32], query_norm: f32, entry: &Entry) -> f32 {
    if query_norm == 0.0 || entry.norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = query.iter().zip(&entry.embedding).map(|(a, b)| a * b).sum();
    let score = dot / (query_norm * entry.norm);
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
