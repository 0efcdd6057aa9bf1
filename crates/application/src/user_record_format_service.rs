use std::sync::Arc;

use roster_core::AppError;
use roster_domain::UserServices;
use tracing::{debug, info};

use crate::roster_ports::{
    BatchReport, ItemOutcome, ItemStage, MessageQueue, UserRecordEvent, forward_to_dead_letter,
};


/// Folds login events into user rosters and publishes them for storage.
#[derive(Clone)]
pub struct UserRecordFormatService {
    output_queue: Arc<dyn MessageQueue>,
    dead_letter_queue: Arc<dyn MessageQueue>,
}

impl UserRecordFormatService {
    /// Creates a format service publishing to `output_queue`.
    #[must_use]
    pub fn new(
        output_queue: Arc<dyn MessageQueue>,
        dead_letter_queue: Arc<dyn MessageQueue>,
    ) -> Self {
        Self {
            output_queue,
            dead_letter_queue,
        }
    }

    /// Reconciles one raw user record event and publishes the result.
    pub async fn process_one(&self, raw_item: &str) -> ItemOutcome {
        match self.try_process(raw_item).await {
            Ok((user_id, message_id)) => {
                debug!(
                    user_id = %user_id,
                    message_id = %message_id,
                    output_queue = self.output_queue.queue_name(),
                    "user services published"
                );
                ItemOutcome::Completed
            }
            Err((stage, error)) => {
                forward_to_dead_letter(self.dead_letter_queue.as_ref(), raw_item, stage, &error)
                    .await
            }
        }
    }

    /// Processes events one at a time; a failed event never stops the rest.
    pub async fn process_batch(&self, raw_items: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        for raw_item in raw_items {
            let outcome = self.process_one(raw_item.as_str()).await;
            report.record(&outcome);
        }

        info!(
            completed = report.completed,
            dead_lettered = report.dead_lettered,
            lost = report.lost,
            "user record batch processed"
        );

        report
    }

    async fn try_process(&self, raw_item: &str) -> Result<(String, String), (ItemStage, AppError)> {
        let record = serde_json::from_str::<UserRecordEvent>(raw_item).map_err(|error| {
            (
                ItemStage::Parse,
                AppError::Parse(format!("invalid user record event: {error}")),
            )
        })?;
        record
            .txma_event_body
            .validate()
            .map_err(|error| (ItemStage::Validate, error))?;

        let user_services =
            UserServices::reconcile(&record.txma_event_body, record.service_list);
        let body = serde_json::to_string(&user_services).map_err(|error| {
            (
                ItemStage::Publish,
                AppError::Internal(format!("failed to serialize user services: {error}")),
            )
        })?;

        let message_id = self
            .output_queue
            .send_message(body.as_str())
            .await
            .map_err(|error| (ItemStage::Publish, error))?;

        Ok((user_services.user_id, message_id))
    }
}
