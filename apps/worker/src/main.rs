//! User services roster worker runtime.

#![forbid(unsafe_code)]

mod worker_config;

use std::sync::Arc;
use std::time::Duration;

use roster_application::{
    BatchReport, MessageQueue, UserRecordFormatService, UserServicesWriteService,
};
use roster_core::{AppError, AppResult};
use roster_infrastructure::{PostgresUserServicesRepository, RedisMessageQueue, run_migrations};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::worker_config::{PipelineConfig, WorkerCommand, WorkerConfig};

enum Pipeline {
    Format(UserRecordFormatService),
    Write(UserServicesWriteService),
}

impl Pipeline {
    async fn process_batch(&self, raw_items: &[String]) -> BatchReport {
        match self {
            Self::Format(service) => service.process_batch(raw_items).await,
            Self::Write(service) => service.process_batch(raw_items).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match WorkerCommand::load()? {
        WorkerCommand::Migrate { database_url } => {
            let pool = connect_pool(database_url.as_str()).await?;
            run_migrations(&pool).await?;
            info!("migrations applied");
            return Ok(());
        }
        WorkerCommand::Run(config) => config,
    };

    let redis_client = redis::Client::open(config.redis_url.as_str())
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
    let input_queue = redis_queue(&redis_client, &config, config.pipeline.input_queue().as_str());
    let pipeline = build_pipeline(&redis_client, &config).await?;

    info!(
        pipeline = config.pipeline.name(),
        input_queue = input_queue.queue_name(),
        batch_size = config.batch_size,
        poll_interval_ms = config.poll_interval_ms,
        "roster-worker started"
    );

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    loop {
        match input_queue.receive_messages(config.batch_size).await {
            Ok(raw_items) if raw_items.is_empty() => tokio::time::sleep(poll_interval).await,
            Ok(raw_items) => {
                let report = pipeline.process_batch(raw_items.as_slice()).await;
                if report.lost > 0 {
                    warn!(
                        pipeline = config.pipeline.name(),
                        lost = report.lost,
                        "batch items could not be dead-lettered"
                    );
                }
            }
            Err(error) => {
                warn!(
                    pipeline = config.pipeline.name(),
                    error = %error,
                    "failed to receive batch"
                );
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

async fn build_pipeline(redis_client: &redis::Client, config: &WorkerConfig) -> AppResult<Pipeline> {
    match &config.pipeline {
        PipelineConfig::Format {
            output_queue,
            dead_letter_queue,
            ..
        } => Ok(Pipeline::Format(UserRecordFormatService::new(
            Arc::new(redis_queue(redis_client, config, output_queue.as_str())),
            Arc::new(redis_queue(redis_client, config, dead_letter_queue.as_str())),
        ))),
        PipelineConfig::Write {
            database_url,
            dead_letter_queue,
            ..
        } => {
            let pool = connect_pool(database_url.as_str()).await?;
            Ok(Pipeline::Write(UserServicesWriteService::new(
                Arc::new(PostgresUserServicesRepository::new(pool)),
                Arc::new(redis_queue(redis_client, config, dead_letter_queue.as_str())),
            )))
        }
    }
}

fn redis_queue(redis_client: &redis::Client, config: &WorkerConfig, name: &str) -> RedisMessageQueue {
    RedisMessageQueue::new(
        redis_client.clone(),
        config.redis_key_prefix.as_str(),
        name,
    )
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
