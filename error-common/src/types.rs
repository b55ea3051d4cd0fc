use thiserror::Error;

use crate::codes;

/// Process-level error returned by the server and CLI binaries
#[derive(Error, Debug)]
pub enum RecoveryError {
    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server start-up or runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// CSV import errors
    #[error("Import error: {0}")]
    ImportError(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

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

impl RecoveryError {
    /// Stable code for this error, see [`crate::codes`]
    pub fn code(&self) -> &'static str {
        match self {
            RecoveryError::NetworkError(_) => codes::system::NETWORK,
            RecoveryError::ServerError(_) | RecoveryError::InternalError(_) | RecoveryError::Other(_) => {
                codes::system::INTERNAL
            }
            RecoveryError::DatabaseError(_) => codes::database::QUERY_FAILED,
            RecoveryError::ImportError(_) => codes::import::ABORTED,
            RecoveryError::ValidationError(_) => codes::validation::INVALID_INPUT,
            RecoveryError::ConfigError(_) => codes::system::CONFIGURATION,
        }
    }

    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            RecoveryError::ValidationError(_) | RecoveryError::ConfigError(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for binary entry points
pub type Result<T> = std::result::Result<T, RecoveryError>;

/// Log an error with the context it occurred in
pub fn log_error(context: &str, error: &RecoveryError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error = %error,
        "Claims recovery error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_by_category() {
        assert_eq!(
            RecoveryError::ValidationError("bad".into()).code(),
            codes::validation::INVALID_INPUT
        );
        assert_eq!(
            RecoveryError::DatabaseError("down".into()).code(),
            codes::database::QUERY_FAILED
        );
        assert_eq!(
            RecoveryError::Other(anyhow::anyhow!("boom")).code(),
            codes::system::INTERNAL
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RecoveryError::ConfigError("x".into()).exit_code(), 2);
        assert_eq!(RecoveryError::ImportError("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_display_includes_category() {
        let err = RecoveryError::ImportError("row 3 failed".into());
        assert_eq!(err.to_string(), "Import error: row 3 failed");
    }
}
