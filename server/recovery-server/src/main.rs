use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use config_engine::load_settings;
use error_common::{log_error, RecoveryError, Result};
use logger_redacted::{init_tracing, LoggerConfig};
use recovery_server::{create_app, RecoveryServer};

/// Claims recovery HTTP server
#[derive(Parser, Debug)]
#[command(name = "recovery-server")]
#[command(about = "Claims dashboard, annotation, upload and reporting API")]
struct Args {
    /// Server bind address (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, env = "CLAIMS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let logger = LoggerConfig::from_env(args.verbose).with_targets([
        "recovery_server",
        "claims_service",
        "database_layer",
        "config_engine",
        "tower_http",
    ]);
    if let Err(e) = init_tracing(&logger) {
        eprintln!("{} {e}", "warning:".yellow().bold());
    }

    if let Err(e) = run(args).await {
        log_error("recovery-server", &e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: Args) -> Result<()> {
    let mut settings = load_settings(args.config.as_deref())
        .map_err(|e| RecoveryError::ConfigError(e.to_string()))?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    let addr = settings.server.bind_address();

    info!("{}", "Starting claims recovery server".bright_cyan());
    info!("Version: {}", env!("CARGO_PKG_VERSION").bright_white());
    info!("Bind address: {}", addr.bright_yellow());

    let server = RecoveryServer::new(settings)
        .await
        .map_err(|e| RecoveryError::DatabaseError(format!("{e:#}")))?;
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RecoveryError::NetworkError(format!("Failed to bind to {addr}: {e}")))?;

    info!("{}", format!("Server running on http://{addr}").bright_green());
    info!("{}", format!("Health check available at: http://{addr}/health").bright_blue());
    info!("{}", format!("API docs available at: http://{addr}/docs").bright_blue());

    axum::serve(listener, app)
        .await
        .map_err(|e| RecoveryError::ServerError(format!("HTTP server error: {e}")))?;
    Ok(())
}
