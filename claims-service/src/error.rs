use database_layer::DatabaseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Error reading {file}: {reason}")]
    UnreadableFile { file: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Claim {0} not found")]
    ClaimNotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for ClaimsError {
    fn from(err: sqlx::Error) -> Self {
        ClaimsError::Database(DatabaseError::SqlxError(err))
    }
}

pub type ClaimsResult<T> = Result<T, ClaimsError>;
