use colored::Colorize;
use config_engine::Settings;
use error_common::{RecoveryError, Result};

use super::connect;

pub async fn run(settings: &Settings) -> Result<()> {
    let pool = connect(settings).await?;
    pool.migrate()
        .await
        .map_err(|e| RecoveryError::DatabaseError(e.to_string()))?;
    pool.close().await;
    println!("{}", "Schema is up to date".green());
    Ok(())
}
