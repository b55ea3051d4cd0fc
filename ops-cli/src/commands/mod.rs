pub mod load_claims;
pub mod migrate;

use std::time::Duration;

use config_engine::Settings;
use database_layer::{DatabasePool, PoolOptions};
use error_common::{RecoveryError, Result};
use tracing::info;

/// Connect using the `database` settings section.
pub async fn connect(settings: &Settings) -> Result<DatabasePool> {
    let options = PoolOptions {
        max_connections: settings.database.max_connections,
        acquire_timeout: Duration::from_secs(settings.database.acquire_timeout_secs),
    };
    let pool = DatabasePool::new(&settings.database.url, &options)
        .await
        .map_err(|e| RecoveryError::DatabaseError(e.to_string()))?;
    info!("Connected to database");
    Ok(pool)
}
