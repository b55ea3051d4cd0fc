//! Console rendering for import runs.

use std::path::Path;

use colored::Colorize;

use claims_service::{ImportFile, ImportMode, ImportStats, ImportSummary};

/// Pre-import summary shown before confirmation.
pub fn import_banner(mode: ImportMode, claim_list: &Path, claim_detail: &Path, dry_run: bool) -> Vec<String> {
    let mode_line = match mode {
        ImportMode::Overwrite => "  OVERWRITE MODE: existing claims in the file will be replaced, with their flags and notes"
            .yellow()
            .to_string(),
        ImportMode::Append => "  APPEND MODE: only new claims will be added".green().to_string(),
        ImportMode::Smart => "  SMART MODE: existing claims will be updated, new claims added"
            .green()
            .to_string(),
    };

    vec![
        "Import Summary:".bold().to_string(),
        format!("  Mode: {}", mode.as_str().to_uppercase()),
        format!("  Claim List: {}", claim_list.display()),
        format!("  Claim Details: {}", claim_detail.display()),
        format!("  Dry Run: {}", if dry_run { "Yes" } else { "No" }),
        mode_line,
    ]
}

/// Confirmation question for `mode`.
pub fn confirmation_prompt(mode: ImportMode) -> String {
    match mode {
        ImportMode::Overwrite => {
            "This will OVERWRITE existing claims and drop their flags and notes. Are you sure?".to_string()
        }
        other => format!("Proceed with {} import?", other.as_str().to_uppercase()),
    }
}

fn stats_line(label: &str, stats: &ImportStats) -> String {
    format!(
        "  {label}: {} total, {} created, {} updated, {} replaced, {} skipped",
        stats.total, stats.created, stats.updated, stats.replaced, stats.skipped
    )
}

/// Result lines printed after the import.
pub fn summary_lines(summary: &ImportSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.dry_run {
        lines.push("DRY RUN - No data was actually imported:".yellow().bold().to_string());
        lines.push(format!("  Claims: {} would be processed", summary.claims.total));
        lines.push(format!("  Details: {} would be processed", summary.details.total));
        lines.push(stats_line("Claims (planned)", &summary.claims));
        lines.push(stats_line("Details (planned)", &summary.details));
    } else {
        lines.push("Successfully processed claims data:".green().bold().to_string());
        lines.push(stats_line("Claims", &summary.claims));
        lines.push(stats_line("Details", &summary.details));
    }

    if !summary.issues.is_empty() {
        lines.push(format!("{} rows not imported:", summary.issues.len()).yellow().to_string());
        for issue in &summary.issues {
            let file = match issue.file {
                ImportFile::ClaimList => "claim list",
                ImportFile::ClaimDetail => "claim detail",
            };
            lines.push(format!("  [{file} row {}] {}", issue.row, issue.message));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_service::RowIssue;

    fn summary(dry_run: bool) -> ImportSummary {
        ImportSummary {
            mode: ImportMode::Smart,
            dry_run,
            claims: ImportStats { total: 3, created: 2, updated: 1, replaced: 0, skipped: 1 },
            details: ImportStats { total: 2, created: 2, updated: 0, replaced: 0, skipped: 0 },
            issues: vec![RowIssue::new(ImportFile::ClaimList, 4, "Error processing claim at row 4: bad id")],
        }
    }

    #[test]
    fn test_banner_mentions_mode_and_files() {
        let lines = import_banner(ImportMode::Overwrite, Path::new("c.csv"), Path::new("d.csv"), false);
        assert!(lines.iter().any(|l| l.contains("Mode: OVERWRITE")));
        assert!(lines.iter().any(|l| l.contains("Claim List: c.csv")));
        assert!(lines.iter().any(|l| l.contains("Dry Run: No")));
        assert!(lines.iter().any(|l| l.contains("OVERWRITE MODE")));
    }

    #[test]
    fn test_confirmation_prompt() {
        assert!(confirmation_prompt(ImportMode::Overwrite).contains("OVERWRITE"));
        assert_eq!(confirmation_prompt(ImportMode::Append), "Proceed with APPEND import?");
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&summary(false));
        assert!(lines.iter().any(|l| l.contains("Claims: 3 total, 2 created, 1 updated, 0 replaced, 1 skipped")));
        assert!(lines.iter().any(|l| l.contains("[claim list row 4]")));
    }

    #[test]
    fn test_dry_run_summary() {
        let lines = summary_lines(&summary(true));
        assert!(lines.iter().any(|l| l.contains("DRY RUN")));
        assert!(lines.iter().any(|l| l.contains("Claims: 3 would be processed")));
    }
}
