use std::collections::HashMap;

use async_trait::async_trait;
use roster_core::{AppError, AppResult};
use roster_domain::UserServices;
use tokio::sync::Mutex;

use crate::roster_ports::{MessageQueue, UserServicesRepository, WriteAcknowledgement};

#[derive(Default)]
pub(crate) struct FakeUserServicesRepository {
    pub(crate) records: Mutex<HashMap<String, UserServices>>,
    pub(crate) failing_user_ids: Vec<String>,
}

impl FakeUserServicesRepository {
    pub(crate) fn failing_for(user_id: &str) -> Self {
        Self {
            records: Mutex::default(),
            failing_user_ids: vec![user_id.to_owned()],
        }
    }
}

#[async_trait]
impl UserServicesRepository for FakeUserServicesRepository {
    async fn write_user_services(
        &self,
        user_services: &UserServices,
    ) -> AppResult<WriteAcknowledgement> {
        if self
            .failing_user_ids
            .iter()
            .any(|user_id| *user_id == user_services.user_id)
        {
            return Err(AppError::Store("conditional write rejected".to_owned()));
        }

        let previous = self
            .records
            .lock()
            .await
            .insert(user_services.user_id.clone(), user_services.clone());

        Ok(WriteAcknowledgement {
            user_id: user_services.user_id.clone(),
            created: previous.is_none(),
        })
    }

    async fn find_user_services(&self, user_id: &str) -> AppResult<Option<UserServices>> {
        Ok(self.records.lock().await.get(user_id).cloned())
    }
}

pub(crate) struct FakeMessageQueue {
    name: String,
    pub(crate) messages: Mutex<Vec<String>>,
    pub(crate) fail_sends: bool,
}

impl FakeMessageQueue {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            messages: Mutex::default(),
            fail_sends: false,
        }
    }

    pub(crate) fn unavailable(name: &str) -> Self {
        Self {
            fail_sends: true,
            ..Self::new(name)
        }
    }

    pub(crate) async fn sent(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl MessageQueue for FakeMessageQueue {
    fn queue_name(&self) -> &str {
        self.name.as_str()
    }

    async fn send_message(&self, body: &str) -> AppResult<String> {
        if self.fail_sends {
            return Err(AppError::Queue(format!("queue '{}' unavailable", self.name)));
        }

        let mut messages = self.messages.lock().await;
        messages.push(body.to_owned());
        Ok(format!("{}-{}", self.name, messages.len()))
    }

    async fn receive_messages(&self, max_messages: usize) -> AppResult<Vec<String>> {
        let mut messages = self.messages.lock().await;
        let take = max_messages.min(messages.len());
        Ok(messages.drain(..take).collect())
    }
}
