//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_message_queue;
mod in_memory_user_services_repository;
mod postgres_user_services_repository;
mod redis_message_queue;


pub use in_memory_message_queue::InMemoryMessageQueue;
pub use in_memory_user_services_repository::InMemoryUserServicesRepository;
pub use postgres_user_services_repository::{PostgresUserServicesRepository, run_migrations};
pub use redis_message_queue::RedisMessageQueue;
