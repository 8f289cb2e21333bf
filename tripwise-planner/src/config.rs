use tripwise_core::RetryPolicy;

#[derive(Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Passages retrieved for destination lookup.
    pub retrieval_k: usize,
    /// User/assistant turns kept per thread for prompts.
    pub history_window: usize,
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retry: RetryPolicy,
    pub max_steps: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            retrieval_k: 3,
            history_window: 3,
            chat_model: "gemini-2.5-flash".to_string(),
            embedding_model: "gemini-embedding-001".to_string(),
            embedding_dimension: 768,
            chunk_size: 1000,
            chunk_overlap: 200,
            retry: RetryPolicy::default(),
            max_steps: 50,
        }
    }
}
