use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use claims_service::{ClaimImporter, ClaimsError, ImportMode, ImportOptions};
use config_engine::Settings;
use error_common::{RecoveryError, Result};

use super::connect;
use crate::cli::LoadClaimsArgs;
use crate::output::{confirmation_prompt, import_banner, summary_lines};

/// `--mode` when given, otherwise the configured default.
pub fn resolve_mode(args: &LoadClaimsArgs, settings: &Settings) -> Result<ImportMode> {
    match args.mode {
        Some(mode) => Ok(mode.into()),
        None => settings
            .import
            .default_mode
            .parse()
            .map_err(|e: ClaimsError| RecoveryError::ConfigError(e.to_string())),
    }
}

/// Both input files must exist before anything touches the database.
pub fn check_files(claim_list: &Path, claim_detail: &Path) -> Result<()> {
    if !claim_list.exists() {
        return Err(RecoveryError::ValidationError(format!(
            "Claim list file not found: {}",
            claim_list.display()
        )));
    }
    if !claim_detail.exists() {
        return Err(RecoveryError::ValidationError(format!(
            "Claim detail file not found: {}",
            claim_detail.display()
        )));
    }
    Ok(())
}

fn confirm(mode: ImportMode) -> Result<bool> {
    Confirm::new()
        .with_prompt(confirmation_prompt(mode))
        .default(false)
        .interact()
        .map_err(|e| RecoveryError::InternalError(format!("Confirmation prompt failed: {e}")))
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn run(args: &LoadClaimsArgs, settings: &Settings) -> Result<()> {
    check_files(&args.claim_list_file, &args.claim_detail_file)?;
    let mode = resolve_mode(args, settings)?;

    println!();
    for line in import_banner(mode, &args.claim_list_file, &args.claim_detail_file, args.dry_run) {
        println!("{line}");
    }
    println!();

    if !args.force && !args.dry_run && !confirm(mode)? {
        println!("{}", "Import cancelled by user".yellow());
        return Ok(());
    }

    let pool = connect(settings).await?;
    if settings.database.run_migrations {
        pool.migrate()
            .await
            .map_err(|e| RecoveryError::DatabaseError(e.to_string()))?;
    }

    info!(%mode, dry_run = args.dry_run, "Starting to load claims data");
    let progress = spinner("Loading claims data...");
    let result = ClaimImporter::new(pool.clone())
        .import_files(
            &args.claim_list_file,
            &args.claim_detail_file,
            ImportOptions {
                mode,
                dry_run: args.dry_run,
            },
        )
        .await;
    progress.finish_and_clear();
    pool.close().await;

    let summary = result.map_err(|e| match e {
        ClaimsError::FileNotFound(_) | ClaimsError::UnreadableFile { .. } => {
            RecoveryError::ImportError(e.to_string())
        }
        other => RecoveryError::ImportError(format!("Error during import: {other}")),
    })?;

    for line in summary_lines(&summary) {
        println!("{line}");
    }
    Ok(())
}
