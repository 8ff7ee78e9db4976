use thiserror::Error;

use crate::codes;

/// Platform-level error used at the binary edge
#[derive(Error, Debug)]
pub enum MedRecordsError {
    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MedRecordsError {
    /// Stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            MedRecordsError::ConfigError(_) => codes::server::CONFIGURATION,
            MedRecordsError::NetworkError(_)
            | MedRecordsError::ServerError(_)
            | MedRecordsError::InternalError(_)
            | MedRecordsError::Other(_) => codes::server::INTERNAL,
        }
    }
}

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, MedRecordsError>;

/// Log an error with its code
pub fn log_error(context: &str, error: &MedRecordsError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error = %error,
        "MedRecords error occurred"
    );
}
