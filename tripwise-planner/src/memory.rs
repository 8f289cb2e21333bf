use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;

/// Keeps the last `window` user/assistant turns of each thread.
pub struct ConversationWindow {
    window: usize,
    turns: RwLock<HashMap<String, VecDeque<(String, String)>>>,
}

impl ConversationWindow {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            turns: RwLock::new(HashMap::new()),
        }
    }

    pub async fn record(&self, thread_id: &str, user: &str, assistant: &str) {
        if self.window == 0 {
            return;
        }
        let mut turns = self.turns.write().await;
        let thread = turns.entry(thread_id.to_string()).or_default();
        thread.push_back((user.to_string(), assistant.to_string()));
        while thread.len() > self.window {
            thread.pop_front();
        }
    }

    /// Renders the window as `User: …` / `Assistant: …` lines, oldest first.
    pub async fn render(&self, thread_id: &str) -> String {
        let turns = self.turns.read().await;
        let Some(thread) = turns.get(thread_id) else {
            return String::new();
        };
        thread
            .iter()
            .flat_map(|(user, assistant)| {
                [format!("User: {user}"), format!("Assistant: {assistant}")]
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub async fn clear(&self, thread_id: &str) {
        self.turns.write().await.remove(thread_id);
    }
}
