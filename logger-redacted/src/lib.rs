//! Logging for the claims recovery platform
//!
//! Installs the global `tracing` subscriber (pretty output in development,
//! JSON in production) and provides [`PhiRedactor`] so that patient names
//! and identifiers in claim data never reach log sinks in clear text.
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, LoggerConfig, PhiRedactor};
//!
//! init_tracing(&LoggerConfig::from_env(false)).ok();
//! let redactor = PhiRedactor::default();
//! tracing::info!(patient = %redactor.mask_name("John Doe"), "claim loaded");
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{fmt, fmt::time::ChronoUtc, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured directive.
///
/// # Errors
///
/// Returns an error if the filter directive does not parse or a global
/// subscriber was already set.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter_directive())
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init(),
    }
    .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
