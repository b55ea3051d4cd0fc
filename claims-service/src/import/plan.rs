//! Classifies every parsed row as create, update, replace or skip.
//!
//! Planning is pure: it works off an [`ExistingState`] snapshot taken inside
//! the import transaction, and the importer applies the resulting actions in
//! order. Rows are classified in file order and earlier rows of the same batch
//! count as "existing" for later ones.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::parser::{ImportFile, ParsedFile, RowIssue};
use crate::models::{ImportMode, NewClaim, NewClaimDetail};

/// What the importer will do with one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Create,
    Update,
    /// Delete the stored row, cascading to its dependents, then insert
    Replace,
    Skip,
}

/// Per-file counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportStats {
    /// Rows that parsed
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub replaced: usize,
    /// Parse failures, append-mode skips and orphan details
    pub skipped: usize,
}

impl ImportStats {
    fn record(&mut self, action: RowAction) {
        match action {
            RowAction::Create => self.created += 1,
            RowAction::Update => self.updated += 1,
            RowAction::Replace => self.replaced += 1,
            RowAction::Skip => self.skipped += 1,
        }
    }
}

/// Stored state relevant to a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingState {
    /// Claim ids already stored
    pub claim_ids: HashSet<i32>,
    /// Claim ids that already have a detail row
    pub claims_with_detail: HashSet<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedClaim {
    pub row: usize,
    pub action: RowAction,
    pub claim: NewClaim,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDetail {
    pub row: usize,
    pub action: RowAction,
    pub detail: NewClaimDetail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub mode: ImportMode,
    pub claims: Vec<PlannedClaim>,
    pub details: Vec<PlannedDetail>,
    pub claim_stats: ImportStats,
    pub detail_stats: ImportStats,
    /// Parse failures first, then planning issues, each in file order
    pub issues: Vec<RowIssue>,
}

/// Action for a row under `mode`, given whether its key is already present.
pub fn action_for(mode: ImportMode, exists: bool) -> RowAction {
    match (mode, exists) {
        (_, false) => RowAction::Create,
        (ImportMode::Smart, true) => RowAction::Update,
        (ImportMode::Append, true) => RowAction::Skip,
        (ImportMode::Overwrite, true) => RowAction::Replace,
    }
}

/// Every claim and detail id the batch refers to, for the existing-state
/// lookup.
pub fn referenced_claim_ids(
    claims: &ParsedFile<NewClaim>,
    details: &ParsedFile<NewClaimDetail>,
) -> Vec<i32> {
    let mut ids: Vec<i32> = claims
        .rows
        .iter()
        .map(|r| r.value.id)
        .chain(details.rows.iter().map(|r| r.value.claim_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub fn plan_import(
    mode: ImportMode,
    claims: ParsedFile<NewClaim>,
    details: ParsedFile<NewClaimDetail>,
    existing: &ExistingState,
) -> ImportPlan {
    let mut claim_stats = ImportStats {
        skipped: claims.issues.len(),
        ..ImportStats::default()
    };
    let mut detail_stats = ImportStats {
        skipped: details.issues.len(),
        ..ImportStats::default()
    };
    let mut issues = claims.issues;
    issues.extend(details.issues);

    let mut known_claims = existing.claim_ids.clone();
    let mut with_detail = existing.claims_with_detail.clone();

    let mut planned_claims = Vec::with_capacity(claims.rows.len());
    for parsed in claims.rows {
        let claim = parsed.value;
        let action = action_for(mode, known_claims.contains(&claim.id));
        match action {
            RowAction::Create => {
                known_claims.insert(claim.id);
            }
            RowAction::Replace => {
                // The cascade takes the stored detail with it.
                with_detail.remove(&claim.id);
            }
            RowAction::Update | RowAction::Skip => {}
        }
        if action == RowAction::Skip {
            issues.push(RowIssue::new(
                ImportFile::ClaimList,
                parsed.row,
                format!("Skipping existing claim {} (append mode)", claim.id),
            ));
        }
        claim_stats.total += 1;
        claim_stats.record(action);
        planned_claims.push(PlannedClaim {
            row: parsed.row,
            action,
            claim,
        });
    }

    let mut planned_details = Vec::with_capacity(details.rows.len());
    for parsed in details.rows {
        let detail = parsed.value;
        detail_stats.total += 1;

        let action = if known_claims.contains(&detail.claim_id) {
            let action = action_for(mode, with_detail.contains(&detail.claim_id));
            if action == RowAction::Skip {
                issues.push(RowIssue::new(
                    ImportFile::ClaimDetail,
                    parsed.row,
                    format!(
                        "Skipping existing detail for claim {} (append mode)",
                        detail.claim_id
                    ),
                ));
            } else {
                with_detail.insert(detail.claim_id);
            }
            action
        } else {
            issues.push(RowIssue::new(
                ImportFile::ClaimDetail,
                parsed.row,
                format!(
                    "Claim {} not found for detail at row {}",
                    detail.claim_id, parsed.row
                ),
            ));
            RowAction::Skip
        };

        detail_stats.record(action);
        planned_details.push(PlannedDetail {
            row: parsed.row,
            action,
            detail,
        });
    }

    ImportPlan {
        mode,
        claims: planned_claims,
        details: planned_details,
        claim_stats,
        detail_stats,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedRow;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn claim(id: i32) -> NewClaim {
        NewClaim {
            id,
            patient_name: format!("Patient {id}"),
            billed_amount: Decimal::new(100_000, 2),
            paid_amount: Decimal::new(80_000, 2),
            status: "Pending".to_string(),
            insurer_name: "Aetna".to_string(),
            discharge_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        }
    }

    fn detail(claim_id: i32) -> NewClaimDetail {
        NewClaimDetail {
            claim_id,
            denial_reason: None,
            cpt_codes: "99213".to_string(),
        }
    }

    fn claims_file(ids: &[i32]) -> ParsedFile<NewClaim> {
        ParsedFile {
            rows: ids
                .iter()
                .enumerate()
                .map(|(i, id)| ParsedRow {
                    row: i + 2,
                    value: claim(*id),
                })
                .collect(),
            issues: Vec::new(),
        }
    }

    fn details_file(claim_ids: &[i32]) -> ParsedFile<NewClaimDetail> {
        ParsedFile {
            rows: claim_ids
                .iter()
                .enumerate()
                .map(|(i, id)| ParsedRow {
                    row: i + 1,
                    value: detail(*id),
                })
                .collect(),
            issues: Vec::new(),
        }
    }

    fn existing(claims: &[i32], with_detail: &[i32]) -> ExistingState {
        ExistingState {
            claim_ids: claims.iter().copied().collect(),
            claims_with_detail: with_detail.iter().copied().collect(),
        }
    }

    fn claim_actions(plan: &ImportPlan) -> Vec<RowAction> {
        plan.claims.iter().map(|c| c.action).collect()
    }

    fn detail_actions(plan: &ImportPlan) -> Vec<RowAction> {
        plan.details.iter().map(|d| d.action).collect()
    }

    #[test]
    fn test_action_table() {
        assert_eq!(action_for(ImportMode::Smart, false), RowAction::Create);
        assert_eq!(action_for(ImportMode::Smart, true), RowAction::Update);
        assert_eq!(action_for(ImportMode::Append, false), RowAction::Create);
        assert_eq!(action_for(ImportMode::Append, true), RowAction::Skip);
        assert_eq!(action_for(ImportMode::Overwrite, false), RowAction::Create);
        assert_eq!(action_for(ImportMode::Overwrite, true), RowAction::Replace);
    }

    #[test]
    fn test_smart_updates_existing_and_creates_new() {
        let plan = plan_import(
            ImportMode::Smart,
            claims_file(&[1, 2]),
            details_file(&[1, 2]),
            &existing(&[1], &[1]),
        );
        assert_eq!(claim_actions(&plan), vec![RowAction::Update, RowAction::Create]);
        assert_eq!(detail_actions(&plan), vec![RowAction::Update, RowAction::Create]);
        assert_eq!(
            plan.claim_stats,
            ImportStats { total: 2, created: 1, updated: 1, replaced: 0, skipped: 0 }
        );
        assert!(plan.issues.is_empty());
    }

    #[test]
    fn test_append_skips_existing() {
        let plan = plan_import(
            ImportMode::Append,
            claims_file(&[1, 2]),
            details_file(&[1, 2]),
            &existing(&[1], &[1]),
        );
        assert_eq!(claim_actions(&plan), vec![RowAction::Skip, RowAction::Create]);
        assert_eq!(detail_actions(&plan), vec![RowAction::Skip, RowAction::Create]);
        assert_eq!(plan.claim_stats.total, 2);
        assert_eq!(plan.claim_stats.skipped, 1);
        assert_eq!(plan.detail_stats.skipped, 1);
        assert_eq!(plan.issues.len(), 2);
        assert!(plan.issues[0].message.contains("append mode"));
    }

    #[test]
    fn test_append_adds_missing_detail_to_existing_claim() {
        let plan = plan_import(
            ImportMode::Append,
            claims_file(&[1]),
            details_file(&[1]),
            &existing(&[1], &[]),
        );
        assert_eq!(claim_actions(&plan), vec![RowAction::Skip]);
        assert_eq!(detail_actions(&plan), vec![RowAction::Create]);
    }

    #[test]
    fn test_overwrite_replaces_and_recreates_detail() {
        let plan = plan_import(
            ImportMode::Overwrite,
            claims_file(&[1, 2]),
            details_file(&[1, 2]),
            &existing(&[1], &[1]),
        );
        assert_eq!(claim_actions(&plan), vec![RowAction::Replace, RowAction::Create]);
        // Replacing claim 1 cascaded its stored detail away.
        assert_eq!(detail_actions(&plan), vec![RowAction::Create, RowAction::Create]);
        assert_eq!(plan.claim_stats.replaced, 1);
        assert_eq!(plan.detail_stats.created, 2);
    }

    #[test]
    fn test_overwrite_replaces_detail_of_untouched_claim() {
        let plan = plan_import(
            ImportMode::Overwrite,
            claims_file(&[]),
            details_file(&[5]),
            &existing(&[5], &[5]),
        );
        assert_eq!(detail_actions(&plan), vec![RowAction::Replace]);
    }

    #[test]
    fn test_duplicate_ids_count_as_existing() {
        let plan = plan_import(
            ImportMode::Smart,
            claims_file(&[7, 7]),
            details_file(&[7, 7]),
            &ExistingState::default(),
        );
        assert_eq!(claim_actions(&plan), vec![RowAction::Create, RowAction::Update]);
        assert_eq!(detail_actions(&plan), vec![RowAction::Create, RowAction::Update]);

        let plan = plan_import(
            ImportMode::Append,
            claims_file(&[7, 7]),
            details_file(&[]),
            &ExistingState::default(),
        );
        assert_eq!(claim_actions(&plan), vec![RowAction::Create, RowAction::Skip]);
    }

    #[test]
    fn test_orphan_details_are_skipped() {
        let plan = plan_import(
            ImportMode::Smart,
            claims_file(&[1]),
            details_file(&[1, 99]),
            &ExistingState::default(),
        );
        assert_eq!(detail_actions(&plan), vec![RowAction::Create, RowAction::Skip]);
        assert_eq!(
            plan.detail_stats,
            ImportStats { total: 2, created: 1, updated: 0, replaced: 0, skipped: 1 }
        );
        assert_eq!(plan.issues.len(), 1);
        assert_eq!(plan.issues[0].file, ImportFile::ClaimDetail);
        assert_eq!(plan.issues[0].row, 2);
        assert!(plan.issues[0].message.contains("Claim 99 not found"));
    }

    #[test]
    fn test_parse_issues_count_as_skipped_not_total() {
        let mut claims = claims_file(&[1]);
        claims
            .issues
            .push(RowIssue::new(ImportFile::ClaimList, 3, "bad row"));
        let plan = plan_import(
            ImportMode::Smart,
            claims,
            details_file(&[]),
            &ExistingState::default(),
        );
        assert_eq!(
            plan.claim_stats,
            ImportStats { total: 1, created: 1, updated: 0, replaced: 0, skipped: 1 }
        );
        assert_eq!(plan.issues[0].message, "bad row");
    }

    #[test]
    fn test_referenced_claim_ids() {
        let ids = referenced_claim_ids(&claims_file(&[3, 1, 3]), &details_file(&[2, 1]));
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
