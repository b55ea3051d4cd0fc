// Transaction management
use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{Postgres, Transaction};
use tracing::debug;

/// Hands out transactions on the shared pool. Dropping an uncommitted
/// transaction rolls it back.
pub struct TransactionManager {
    pool: DatabasePool,
}

impl TransactionManager {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Begin a new transaction
    pub async fn begin(&self) -> DatabaseResult<Transaction<'static, Postgres>> {
        debug!("Beginning transaction");

        self.pool
            .pool()
            .begin()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to begin transaction: {e}")))
    }

    pub async fn commit(tx: Transaction<'static, Postgres>) -> DatabaseResult<()> {
        debug!("Committing transaction");
        tx.commit()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to commit transaction: {e}")))
    }

    pub async fn rollback(tx: Transaction<'static, Postgres>) -> DatabaseResult<()> {
        debug!("Rolling back transaction");
        tx.rollback()
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to roll back transaction: {e}")))
    }
}
