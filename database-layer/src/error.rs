use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl DatabaseError {
    /// True when the failure is a foreign-key violation, i.e. the referenced
    /// claim does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            DatabaseError::SqlxError(sqlx::Error::Database(db)) => {
                db.code().as_deref() == Some("23503")
            }
            _ => false,
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
