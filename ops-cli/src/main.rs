use clap::Parser;
use colored::Colorize;

use error_common::log_error;
use logger_redacted::{init_tracing, LoggerConfig};
use ops_cli::cli::Cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let logger = LoggerConfig::from_env(cli.verbose).with_targets([
        "ops_cli",
        "claims_service",
        "database_layer",
        "config_engine",
    ]);
    if let Err(e) = init_tracing(&logger) {
        eprintln!("{} {e}", "warning:".yellow().bold());
    }

    if let Err(e) = ops_cli::run(cli).await {
        log_error("claims-ops", &e);
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}
