use roster_core::{AppError, AppResult};
use roster_domain::{Service, UserServices};

use crate::roster_ports::{ServicePayload, UserServicesPayload};

/// Validates one inbound service entry.
///
/// A login count of zero is rejected along with negative counts, even though a
/// reconciled roster can never produce zero.
pub fn validate_service(service: ServicePayload) -> AppResult<Service> {
    let ServicePayload {
        client_id,
        count_successful_logins,
        last_accessed,
    } = service;

    let Some(client_id) = client_id else {
        return Err(AppError::Validation(
            "service is missing client_id".to_owned(),
        ));
    };

    let count_successful_logins = match count_successful_logins {
        Some(count) if count > 0 => count,
        Some(count) => {
            return Err(AppError::Validation(format!(
                "service '{client_id}' has invalid count_successful_logins {count}"
            )));
        }
        None => {
            return Err(AppError::Validation(format!(
                "service '{client_id}' is missing count_successful_logins"
            )));
        }
    };

    let Some(last_accessed) = last_accessed else {
        return Err(AppError::Validation(format!(
            "service '{client_id}' is missing last_accessed"
        )));
    };

    Ok(Service {
        client_id,
        count_successful_logins,
        last_accessed,
    })
}

/// Validates an inbound aggregate, failing on the first invalid service.
pub fn validate_user_services(payload: UserServicesPayload) -> AppResult<UserServices> {
    let (Some(user_id), Some(services)) = (payload.user_id, payload.services) else {
        return Err(AppError::Validation(
            "user services payload requires user_id and services".to_owned(),
        ));
    };

    let services = services
        .into_iter()
        .enumerate()
        .map(|(index, service)| {
            validate_service(service).map_err(|error| match error {
                AppError::Validation(message) => {
                    AppError::Validation(format!("user '{user_id}' service #{index}: {message}"))
                }
                other => other,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(UserServices { user_id, services })
}
