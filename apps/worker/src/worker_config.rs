use std::env;

use roster_core::{AppError, AppResult, NonEmptyString};

/// Which stage of the roster pipeline this process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineConfig {
    /// Folds user record events into rosters and publishes them.
    Format {
        input_queue: NonEmptyString,
        output_queue: NonEmptyString,
        dead_letter_queue: NonEmptyString,
    },
    /// Validates published rosters and writes them to Postgres.
    Write {
        database_url: String,
        input_queue: NonEmptyString,
        dead_letter_queue: NonEmptyString,
    },
}

impl PipelineConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Format { .. } => "format",
            Self::Write { .. } => "write",
        }
    }

    pub fn input_queue(&self) -> &NonEmptyString {
        match self {
            Self::Format { input_queue, .. } | Self::Write { input_queue, .. } => input_queue,
        }
    }
}

/// What the process was started to do.
#[derive(Debug, Clone)]
pub enum WorkerCommand {
    /// Apply database migrations and exit.
    Migrate { database_url: String },
    /// Poll the configured pipeline forever.
    Run(WorkerConfig),
}

impl WorkerCommand {
    pub fn load() -> AppResult<Self> {
        if env::args().nth(1).as_deref() == Some("migrate") {
            return Ok(Self::Migrate {
                database_url: required_env("DATABASE_URL")?,
            });
        }

        WorkerConfig::load().map(Self::Run)
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub redis_url: String,
    pub redis_key_prefix: String,
    pub pipeline: PipelineConfig,
    pub batch_size: usize,
    pub poll_interval_ms: u64,
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        let redis_url = required_env("REDIS_URL")?;
        let redis_key_prefix =
            env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "roster".to_owned());
        let pipeline_name = env::var("WORKER_PIPELINE").unwrap_or_else(|_| "write".to_owned());
        let pipeline = match parse_pipeline_name(pipeline_name.as_str())? {
            PipelineName::Format => PipelineConfig::Format {
                input_queue: queue_env("FORMAT_INPUT_QUEUE", "txma-user-records")?,
                output_queue: queue_env("USER_SERVICES_QUEUE", "user-services")?,
                dead_letter_queue: queue_env("FORMAT_DEAD_LETTER_QUEUE", "txma-user-records-dlq")?,
            },
            PipelineName::Write => PipelineConfig::Write {
                database_url: required_env("DATABASE_URL")?,
                input_queue: queue_env("USER_SERVICES_QUEUE", "user-services")?,
                dead_letter_queue: queue_env("WRITE_DEAD_LETTER_QUEUE", "user-services-dlq")?,
            },
        };
        let batch_size = parse_env_usize("WORKER_BATCH_SIZE", 10)?;
        let poll_interval_ms = parse_env_u64("WORKER_POLL_INTERVAL_MS", 1000)?;

        validate_positive("WORKER_BATCH_SIZE", batch_size as u64)?;
        validate_positive("WORKER_POLL_INTERVAL_MS", poll_interval_ms)?;

        Ok(Self {
            redis_url,
            redis_key_prefix,
            pipeline,
            batch_size,
            poll_interval_ms,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineName {
    Format,
    Write,
}

fn parse_pipeline_name(value: &str) -> AppResult<PipelineName> {
    match value.trim().to_ascii_lowercase().as_str() {
        "format" => Ok(PipelineName::Format),
        "write" => Ok(PipelineName::Write),
        other => Err(AppError::Validation(format!(
            "invalid WORKER_PIPELINE value '{other}', expected 'format' or 'write'"
        ))),
    }
}

fn validate_positive(name: &str, value: u64) -> AppResult<()> {
    if value == 0 {
        return Err(AppError::Validation(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(())
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn queue_env(name: &str, default: &str) -> AppResult<NonEmptyString> {
    let value = env::var(name).unwrap_or_else(|_| default.to_owned());
    NonEmptyString::new(value)
        .map_err(|_| AppError::Validation(format!("{name} must not be empty")))
}

fn parse_env_usize(name: &str, default: usize) -> AppResult<usize> {
    match env::var(name) {
        Ok(value) => value.parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{PipelineName, parse_pipeline_name, validate_positive};

    #[test]
    fn pipeline_name_is_case_insensitive() {
        assert!(matches!(
            parse_pipeline_name(" Format "),
            Ok(PipelineName::Format)
        ));
        assert!(matches!(parse_pipeline_name("write"), Ok(PipelineName::Write)));
        assert!(parse_pipeline_name("replay").is_err());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(validate_positive("WORKER_BATCH_SIZE", 0).is_err());
        assert!(validate_positive("WORKER_BATCH_SIZE", 10).is_ok());
    }
}
