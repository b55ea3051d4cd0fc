//! `claims-ops`: command-line operations for the claims recovery platform.
//!
//! ```bash
//! claims-ops load-claims claim_list_data.csv claim_detail_data.csv --mode smart
//! claims-ops load-claims claims.csv details.csv --mode overwrite --force
//! claims-ops load-claims claims.csv details.csv --dry-run --verbose
//! claims-ops migrate --config claims.yaml
//! ```

pub mod cli;
pub mod commands;
pub mod output;

use config_engine::load_settings;
use error_common::{RecoveryError, Result};

use crate::cli::{Cli, Command};

/// Load settings and dispatch the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())
        .map_err(|e| RecoveryError::ConfigError(e.to_string()))?;

    match &cli.command {
        Command::LoadClaims(args) => commands::load_claims::run(args, &settings).await,
        Command::Migrate => commands::migrate::run(&settings).await,
    }
}
