use std::collections::VecDeque;

use async_trait::async_trait;
use roster_application::MessageQueue;
use roster_core::AppResult;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory FIFO queue adapter.
pub struct InMemoryMessageQueue {
    name: String,
    messages: Mutex<VecDeque<String>>,
}

impl InMemoryMessageQueue {
    /// Creates an empty queue with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Mutex::default(),
        }
    }

    /// Returns the number of queued messages.
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Returns whether the queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait]
impl MessageQueue for InMemoryMessageQueue {
    fn queue_name(&self) -> &str {
        self.name.as_str()
    }

    async fn send_message(&self, body: &str) -> AppResult<String> {
        self.messages.lock().await.push_back(body.to_owned());
        Ok(Uuid::new_v4().to_string())
    }

    async fn receive_messages(&self, max_messages: usize) -> AppResult<Vec<String>> {
        let mut messages = self.messages.lock().await;
        let take = max_messages.min(messages.len());
        Ok(messages.drain(..take).collect())
    }
}
