use roster_core::AppError;
use tracing::{error, warn};

use super::MessageQueue;

/// Processing step at which an item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStage {
    /// Payload deserialization.
    Parse,
    /// Invariant checks.
    Validate,
    /// Store write.
    Store,
    /// Serialization or send to the downstream queue.
    Publish,
}

impl ItemStage {
    /// Returns stable stage value for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Validate => "validate",
            Self::Store => "store",
            Self::Publish => "publish",
        }
    }
}

/// Terminal state of one batch item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Item was fully processed.
    Completed,
    /// Item failed and its raw body was forwarded to the dead-letter queue.
    DeadLettered {
        /// Step that failed.
        stage: ItemStage,
    },
    /// Item failed and the dead-letter forward failed too.
    Lost {
        /// Step that failed.
        stage: ItemStage,
    },
}

/// Per-batch outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Items fully processed.
    pub completed: u32,
    /// Items forwarded to the dead-letter queue.
    pub dead_lettered: u32,
    /// Items that could not be dead-lettered.
    pub lost: u32,
}

impl BatchReport {
    /// Adds one item outcome to the counters.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Completed => self.completed = self.completed.saturating_add(1),
            ItemOutcome::DeadLettered { .. } => {
                self.dead_lettered = self.dead_lettered.saturating_add(1);
            }
            ItemOutcome::Lost { .. } => self.lost = self.lost.saturating_add(1),
        }
    }

    /// Returns the number of items seen.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.completed
            .saturating_add(self.dead_lettered)
            .saturating_add(self.lost)
    }
}

/// Logs a failed item and forwards its raw body, unchanged, to `dead_letter_queue`.
pub(crate) async fn forward_to_dead_letter(
    dead_letter_queue: &dyn MessageQueue,
    raw_item: &str,
    stage: ItemStage,
    failure: &AppError,
) -> ItemOutcome {
    warn!(
        stage = stage.as_str(),
        error_kind = failure.kind(),
        error = %failure,
        dead_letter_queue = dead_letter_queue.queue_name(),
        "item processing failed, forwarding to dead-letter queue"
    );

    match dead_letter_queue.send_message(raw_item).await {
        Ok(_) => ItemOutcome::DeadLettered { stage },
        Err(send_error) => {
            error!(
                stage = stage.as_str(),
                error = %send_error,
                dead_letter_queue = dead_letter_queue.queue_name(),
                "failed to forward item to dead-letter queue"
            );
            ItemOutcome::Lost { stage }
        }
    }
}
