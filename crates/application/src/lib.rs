//! Application services and ports.

#![forbid(unsafe_code)]

mod roster_ports;
mod user_record_format_service;
mod user_services_write_service;

#[cfg(test)]
mod test_support;

pub use roster_ports::{
    BatchReport, ItemOutcome, ItemStage, MessageQueue, ServicePayload, UserRecordEvent,
    UserServicesPayload, UserServicesRepository, WriteAcknowledgement,
};
pub use user_record_format_service::UserRecordFormatService;
pub use user_services_write_service::{
    UserServicesWriteService, validate_service, validate_user_services,
};
