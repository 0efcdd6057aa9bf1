use chrono::{DateTime, Utc};
use roster_domain::{Service, TxmaEvent};
use serde::{Deserialize, Serialize};

/// Inbound service entry as read from the user services queue.
///
/// Every field is optional so that absent values reach validation instead of
/// failing parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePayload {
    /// Client application identifier.
    pub client_id: Option<String>,
    /// Login count.
    pub count_successful_logins: Option<i64>,
    /// Last login timestamp.
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Inbound aggregate as read from the user services queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserServicesPayload {
    /// Owning user identifier.
    pub user_id: Option<String>,
    /// Service entries.
    pub services: Option<Vec<ServicePayload>>,
}

/// Message carrying one login event together with the user's current roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecordEvent {
    /// Login event to fold in.
    #[serde(rename = "TxmaEventBody")]
    pub txma_event_body: TxmaEvent,
    /// Services already stored for the event's user.
    #[serde(rename = "ServiceList", default)]
    pub service_list: Vec<Service>,
}
