use std::sync::Arc;

use roster_core::{AppError, AppResult};
use roster_domain::UserServices;
use tracing::{debug, info};

use crate::roster_ports::{
    BatchReport, ItemOutcome, ItemStage, MessageQueue, UserServicesPayload,
    UserServicesRepository, WriteAcknowledgement, forward_to_dead_letter,
};

mod validation;


pub use validation::{validate_service, validate_user_services};

/// Persistence gateway that validates reconciled rosters and stores them.
///
/// Failures never escape a batch: the raw item goes to the dead-letter queue.
#[derive(Clone)]
pub struct UserServicesWriteService {
    repository: Arc<dyn UserServicesRepository>,
    dead_letter_queue: Arc<dyn MessageQueue>,
}

impl UserServicesWriteService {
    /// Creates a write service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn UserServicesRepository>,
        dead_letter_queue: Arc<dyn MessageQueue>,
    ) -> Self {
        Self {
            repository,
            dead_letter_queue,
        }
    }

    /// Writes one aggregate to the store, overwriting any prior value.
    pub async fn store(&self, user_services: &UserServices) -> AppResult<WriteAcknowledgement> {
        self.repository.write_user_services(user_services).await
    }

    /// Parses, validates and stores one raw queue item.
    pub async fn process_one(&self, raw_item: &str) -> ItemOutcome {
        match self.try_process(raw_item).await {
            Ok(acknowledgement) => {
                debug!(
                    user_id = %acknowledgement.user_id,
                    created = acknowledgement.created,
                    "user services stored"
                );
                ItemOutcome::Completed
            }
            Err((stage, error)) => {
                forward_to_dead_letter(self.dead_letter_queue.as_ref(), raw_item, stage, &error)
                    .await
            }
        }
    }

    /// Processes items one at a time; a failed item never stops the rest.
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
            "user services batch processed"
        );

        report
    }

    async fn try_process(
        &self,
        raw_item: &str,
    ) -> Result<WriteAcknowledgement, (ItemStage, AppError)> {
        let payload = serde_json::from_str::<UserServicesPayload>(raw_item).map_err(|error| {
            (
                ItemStage::Parse,
                AppError::Parse(format!("invalid user services payload: {error}")),
            )
        })?;
        let user_services =
            validate_user_services(payload).map_err(|error| (ItemStage::Validate, error))?;

        self.store(&user_services)
            .await
            .map_err(|error| (ItemStage::Store, error))
    }
}
