//! Identity telemetry events describing one successful login.

use chrono::{DateTime, Utc};
use roster_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Subject block of a TXMA event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxmaUser {
    /// Identifier of the user that logged in.
    pub user_id: String,
}

/// One login occurrence reported by the identity platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxmaEvent {
    /// Event type identifier.
    pub event_name: String,
    /// When the login happened.
    pub timestamp: DateTime<Utc>,
    /// Client application the user authenticated into.
    pub client_id: String,
    /// Originating platform component, carried through untouched.
    pub component_id: String,
    /// Subject user.
    pub user: TxmaUser,
}

impl TxmaEvent {
    /// Returns the subject user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user.user_id.as_str()
    }

    /// Checks that the identifiers used for reconciliation are present.
    ///
    /// Reconciliation itself is total over any event, so an empty `client_id`
    /// would silently create a new blank-keyed service. Callers run this first.
    pub fn validate(&self) -> AppResult<()> {
        NonEmptyString::new(self.user.user_id.as_str()).map_err(|_| {
            AppError::Validation(format!(
                "event '{}' is missing user.user_id",
                self.event_name
            ))
        })?;
        NonEmptyString::new(self.client_id.as_str()).map_err(|_| {
            AppError::Validation(format!(
                "event '{}' for user '{}' is missing client_id",
                self.event_name, self.user.user_id
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{TxmaEvent, TxmaUser};

    fn event(user_id: &str, client_id: &str) -> TxmaEvent {
        TxmaEvent {
            event_name: "AUTH_AUTH_CODE_ISSUED".to_owned(),
            timestamp: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
                .single()
                .unwrap_or_else(|| unreachable!()),
            client_id: client_id.to_owned(),
            component_id: "https://oidc.example".to_owned(),
            user: TxmaUser {
                user_id: user_id.to_owned(),
            },
        }
    }

    #[test]
    fn validate_accepts_complete_event() {
        assert!(event("123456", "client_id_1").validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_identifiers() {
        assert!(event("", "client_id_1").validate().is_err());
        assert!(event("123456", "  ").validate().is_err());
    }

    #[test]
    fn deserializes_wire_shape() {
        let payload = json!({
            "event_name": "event_1",
            "timestamp": "2026-03-01T09:30:00Z",
            "client_id": "client_id_3",
            "component_id": "component_id",
            "user": { "user_id": "123456" }
        });

        let parsed = serde_json::from_value::<TxmaEvent>(payload);
        assert!(parsed.is_ok());
        let parsed = parsed.unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed.user_id(), "123456");
        assert_eq!(parsed.client_id, "client_id_3");
    }

    #[test]
    fn missing_client_id_fails_to_parse() {
        let payload = json!({
            "event_name": "event_1",
            "timestamp": "2026-03-01T09:30:00Z",
            "component_id": "component_id",
            "user": { "user_id": "123456" }
        });

        assert!(serde_json::from_value::<TxmaEvent>(payload).is_err());
    }
}
