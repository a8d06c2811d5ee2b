//! Logging initialization

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use usechain_config::{LogFormat, LoggingSettings};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {message}")]
    Filter { directive: String, message: String },

    #[error("logging already initialized: {0}")]
    Init(String),
}

/// Filter from `RUST_LOG` when set, otherwise from the configured level.
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level).map_err(|e| LoggingError::Filter {
        directive: settings.level.clone(),
        message: e.to_string(),
    })
}

/// Installs the global subscriber.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let filter = env_filter(settings)?;

    let result = match settings.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_ansi(settings.color)
                    .with_target(settings.include_target),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(settings.color)
                    .with_target(settings.include_target),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(settings.include_target))
            .try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!(level = %settings.level, format = ?settings.format, "logging initialized");
    Ok(())
}
