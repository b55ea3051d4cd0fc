use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use claims_service::ImportMode;

/// Claims recovery operations
#[derive(Parser, Debug)]
#[command(name = "claims-ops", version)]
#[command(about = "Load claim exports and manage the claims database")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CLAIMS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load claims and claim details from pipe-delimited CSV files
    LoadClaims(LoadClaimsArgs),
    /// Apply pending schema migrations
    Migrate,
}

#[derive(Args, Debug)]
pub struct LoadClaimsArgs {
    /// Path to the claim list CSV file
    pub claim_list_file: PathBuf,

    /// Path to the claim detail CSV file
    pub claim_detail_file: PathBuf,

    /// overwrite: replace existing claims, append: add new claims only,
    /// smart: update existing claims and add new ones
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Skip confirmation prompts
    #[arg(long)]
    pub force: bool,

    /// Show what would be imported without importing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Overwrite,
    Append,
    Smart,
}

impl From<ModeArg> for ImportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Overwrite => ImportMode::Overwrite,
            ModeArg::Append => ImportMode::Append,
            ModeArg::Smart => ImportMode::Smart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_claims() {
        let cli = Cli::try_parse_from([
            "claims-ops",
            "load-claims",
            "claims.csv",
            "details.csv",
            "--mode",
            "append",
            "--dry-run",
        ])
        .unwrap();
        let Command::LoadClaims(args) = cli.command else {
            panic!("expected load-claims");
        };
        assert_eq!(args.claim_list_file, PathBuf::from("claims.csv"));
        assert_eq!(args.claim_detail_file, PathBuf::from("details.csv"));
        assert_eq!(args.mode, Some(ModeArg::Append));
        assert!(args.dry_run);
        assert!(!args.force);
    }

    #[test]
    fn test_mode_is_optional() {
        let cli = Cli::try_parse_from(["claims-ops", "load-claims", "a.csv", "b.csv", "--force"])
            .unwrap();
        let Command::LoadClaims(args) = cli.command else {
            panic!("expected load-claims");
        };
        assert_eq!(args.mode, None);
        assert!(args.force);
    }

    #[test]
    fn test_rejects_unknown_mode_and_missing_files() {
        assert!(Cli::try_parse_from(["claims-ops", "load-claims", "a.csv", "b.csv", "--mode", "merge"]).is_err());
        assert!(Cli::try_parse_from(["claims-ops", "load-claims", "a.csv"]).is_err());
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(ImportMode::from(ModeArg::Overwrite), ImportMode::Overwrite);
        assert_eq!(ImportMode::from(ModeArg::Smart), ImportMode::Smart);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
