//! Logging for the MedRecords perimeter
//!
//! Session credentials and CSRF tokens pass through every request this
//! workspace handles, so nothing here may write one to a log. Two tools make
//! that practical:
//!
//! - [`fingerprint`] turns a secret into a short hash that still lets two log
//!   lines be correlated to the same credential
//! - [`PiiRedactor`] masks JWT-shaped strings, bearer values and email
//!   addresses in free text (for example upstream error messages)
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, fingerprint, LoggerConfig};
//!
//! init_logging(&LoggerConfig::default()).expect("logging");
//! tracing::warn!(token_fp = %fingerprint("eyJ..."), "Rejected session credential");
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over [`LoggerConfig::level`] when set.
pub fn init_logging(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|_| LoggerError::InvalidFilter(config.level.clone()))?,
    };

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(ChronoUtc::rfc_3339()),
            )
            .try_init(),
    };

    result.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
