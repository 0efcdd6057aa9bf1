//! Per-user service roster and the rules that fold login events into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TxmaEvent;

/// One user's login history with a single client application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Client application identifier, unique within one roster.
    pub client_id: String,
    /// Number of successful logins observed for this client.
    pub count_successful_logins: i64,
    /// Timestamp of the most recent matching login.
    pub last_accessed: DateTime<Utc>,
}

impl Service {
    /// Derives the first service entry for a client from its first login.
    #[must_use]
    pub fn from_event(event: &TxmaEvent) -> Self {
        Self {
            client_id: event.client_id.clone(),
            count_successful_logins: 1,
            last_accessed: event.timestamp,
        }
    }

    /// Returns whether the event belongs to this service.
    ///
    /// Exact `client_id` equality; no normalization.
    #[must_use]
    pub fn matches(&self, event: &TxmaEvent) -> bool {
        self.client_id == event.client_id
    }

    /// Records one more login against this service.
    ///
    /// The counter saturates at `i64::MAX` instead of wrapping. Callers must
    /// only apply events for which [`Service::matches`] holds.
    pub fn apply_event(&mut self, event: &TxmaEvent) {
        debug_assert!(self.matches(event));
        self.count_successful_logins = self.count_successful_logins.saturating_add(1);
        self.last_accessed = event.timestamp;
    }
}

/// Aggregate roster of services a user has logged into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserServices {
    /// Owning user.
    pub user_id: String,
    /// Services in first-seen order.
    pub services: Vec<Service>,
}

impl UserServices {
    /// Builds the aggregate for the event's user over an existing service list.
    #[must_use]
    pub fn for_event(event: &TxmaEvent, services: Vec<Service>) -> Self {
        Self {
            user_id: event.user_id().to_owned(),
            services,
        }
    }

    /// Folds one login event into the roster.
    ///
    /// The first service matching the event is updated; otherwise a new entry
    /// is appended at the tail. Applying the same event twice counts twice.
    pub fn append_if_new(&mut self, event: &TxmaEvent) {
        match self
            .services
            .iter_mut()
            .find(|service| service.matches(event))
        {
            Some(service) => service.apply_event(event),
            None => self.services.push(Service::from_event(event)),
        }
    }

    /// Builds the aggregate for `event` over `existing` and folds the event in.
    #[must_use]
    pub fn reconcile(event: &TxmaEvent, existing: Vec<Service>) -> Self {
        let mut user_services = Self::for_event(event, existing);
        user_services.append_if_new(event);
        user_services
    }

    /// Returns the service tracked for a client, if any.
    #[must_use]
    pub fn find_service(&self, client_id: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|service| service.client_id == client_id)
    }
}
