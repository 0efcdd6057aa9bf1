use std::collections::HashMap;

use async_trait::async_trait;
use roster_application::{UserServicesRepository, WriteAcknowledgement};
use roster_core::AppResult;
use roster_domain::UserServices;
use tokio::sync::RwLock;

/// In-memory repository adapter for user services.
#[derive(Default)]
pub struct InMemoryUserServicesRepository {
    records: RwLock<HashMap<String, UserServices>>,
}

impl InMemoryUserServicesRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserServicesRepository for InMemoryUserServicesRepository {
    async fn write_user_services(
        &self,
        user_services: &UserServices,
    ) -> AppResult<WriteAcknowledgement> {
        let previous = self
            .records
            .write()
            .await
            .insert(user_services.user_id.clone(), user_services.clone());

        Ok(WriteAcknowledgement {
            user_id: user_services.user_id.clone(),
            created: previous.is_none(),
        })
    }

    async fn find_user_services(&self, user_id: &str) -> AppResult<Option<UserServices>> {
        Ok(self.records.read().await.get(user_id).cloned())
    }
}
