//! Domain entities and the login reconciliation rules.

#![forbid(unsafe_code)]

mod txma_event;
mod user_services;

pub use txma_event::{TxmaEvent, TxmaUser};
pub use user_services::{Service, UserServices};
