use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

use crate::errors::GenerationError;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `taylor_generate=debug`.
    pub filter: String,
    pub with_target: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
            with_target: true,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(options: &LogOptions) -> Result<(), GenerationError> {
    let filter = EnvFilter::try_new(&options.filter)
        .map_err(|err| GenerationError::Logging(format!("invalid filter: {err}")))?;

    let result = match options.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(UtcTime::rfc_3339())
                    .with_target(options.with_target),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_target(options.with_target),
            )
            .try_init(),
    };

    result.map_err(|err| GenerationError::Logging(err.to_string()))
}
