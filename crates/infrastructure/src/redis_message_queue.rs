//! Redis list-backed message queue.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use redis::AsyncCommands;
use roster_application::MessageQueue;
use roster_core::{AppError, AppResult};
use tracing::debug;
use uuid::Uuid;

/// Redis implementation of the message queue port.
///
/// Each queue is one list; producers `RPUSH`, consumers `LPOP` with a count.
#[derive(Clone)]
pub struct RedisMessageQueue {
    client: redis::Client,
    name: String,
    key: String,
}

impl RedisMessageQueue {
    /// Creates a queue adapter with a configured Redis client, key prefix and queue name.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            client,
            key: key_for(key_prefix, name.as_str()),
            name,
        }
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Queue(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl MessageQueue for RedisMessageQueue {
    fn queue_name(&self) -> &str {
        self.name.as_str()
    }

    async fn send_message(&self, body: &str) -> AppResult<String> {
        let mut connection = self.connection().await?;
        let depth: u64 = connection
            .rpush(self.key.as_str(), body)
            .await
            .map_err(|error| {
                AppError::Queue(format!(
                    "failed to send message to queue '{}': {error}",
                    self.name
                ))
            })?;

        let message_id = Uuid::new_v4().to_string();
        debug!(queue = %self.name, message_id = %message_id, depth, "message enqueued");
        Ok(message_id)
    }

    async fn receive_messages(&self, max_messages: usize) -> AppResult<Vec<String>> {
        let Some(count) = NonZeroUsize::new(max_messages) else {
            return Ok(Vec::new());
        };

        let mut connection = self.connection().await?;
        let bodies: Option<Vec<String>> = connection
            .lpop(self.key.as_str(), Some(count))
            .await
            .map_err(|error| {
                AppError::Queue(format!(
                    "failed to receive messages from queue '{}': {error}",
                    self.name
                ))
            })?;

        Ok(bodies.unwrap_or_default())
    }
}

fn key_for(key_prefix: &str, name: &str) -> String {
    if key_prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{key_prefix}:queue:{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::key_for;

    #[test]
    fn key_is_namespaced_by_prefix() {
        assert_eq!(key_for("roster", "user-services"), "roster:queue:user-services");
        assert_eq!(key_for("", "user-services"), "user-services");
    }
}
