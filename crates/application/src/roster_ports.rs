mod outcome;
mod payload;
mod queue;
mod repository;

pub use outcome::{BatchReport, ItemOutcome, ItemStage};
pub(crate) use outcome::forward_to_dead_letter;
pub use payload::{ServicePayload, UserRecordEvent, UserServicesPayload};
pub use queue::MessageQueue;
pub use repository::{UserServicesRepository, WriteAcknowledgement};
