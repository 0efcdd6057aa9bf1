use async_trait::async_trait;
use roster_core::AppResult;

/// Port for one named message queue.
///
/// Used both for pipeline hand-off and for dead-letter channels. Bodies are
/// opaque strings and are delivered without added metadata.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Returns the queue name used for addressing and logs.
    fn queue_name(&self) -> &str;

    /// Enqueues one message body and returns its message id.
    async fn send_message(&self, body: &str) -> AppResult<String>;

    /// Dequeues up to `max_messages` bodies in arrival order.
    async fn receive_messages(&self, max_messages: usize) -> AppResult<Vec<String>>;
}
