use std::path::Path;

use database_layer::{ClaimRepository, DatabasePool, TransactionManager};
use logger_redacted::PhiRedactor;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use super::plan::{plan_import, referenced_claim_ids, ExistingState, ImportPlan, ImportStats, RowAction};
use crate::parser::{read_claims_file, read_details_file, ParsedFile, RowIssue};
use crate::error::ClaimsResult;
use crate::models::{ImportMode, NewClaim, NewClaimDetail};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    pub mode: ImportMode,
    /// Plan only; the transaction is rolled back
    pub dry_run: bool,
}

/// Outcome of one import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub dry_run: bool,
    pub claims: ImportStats,
    pub details: ImportStats,
    pub issues: Vec<RowIssue>,
}

impl ImportSummary {
    fn from_plan(plan: ImportPlan, dry_run: bool) -> Self {
        Self {
            mode: plan.mode,
            dry_run,
            claims: plan.claim_stats,
            details: plan.detail_stats,
            issues: plan.issues,
        }
    }
}

/// Loads parsed claim files into the database as one all-or-nothing
/// transaction.
#[derive(Clone)]
pub struct ClaimImporter {
    pool: DatabasePool,
    redactor: PhiRedactor,
}

impl ClaimImporter {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            redactor: PhiRedactor::default(),
        }
    }

    pub fn with_redactor(mut self, redactor: PhiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Parse both files from disk and import them.
    pub async fn import_files(
        &self,
        claim_list: &Path,
        claim_detail: &Path,
        options: ImportOptions,
    ) -> ClaimsResult<ImportSummary> {
        let claims = read_claims_file(claim_list)?;
        let details = read_details_file(claim_detail)?;
        info!(
            claim_list = %claim_list.display(),
            claim_detail = %claim_detail.display(),
            claim_rows = claims.len(),
            detail_rows = details.len(),
            "Parsed import files"
        );
        self.import(claims, details, options).await
    }

    /// Plan and apply an import. Claims are written before details. Any
    /// store error rolls the whole batch back.
    pub async fn import(
        &self,
        claims: ParsedFile<NewClaim>,
        details: ParsedFile<NewClaimDetail>,
        options: ImportOptions,
    ) -> ClaimsResult<ImportSummary> {
        let tx_manager = TransactionManager::new(self.pool.clone());
        let mut tx = tx_manager.begin().await?;

        let ids = referenced_claim_ids(&claims, &details);
        let existing = ExistingState {
            claim_ids: ClaimRepository::existing_ids(&mut tx, &ids).await?,
            claims_with_detail: ClaimRepository::ids_with_detail(&mut tx, &ids).await?,
        };

        let plan = plan_import(options.mode, claims, details, &existing);
        self.log_plan(&plan);

        if options.dry_run {
            TransactionManager::rollback(tx).await?;
            info!(
                mode = %plan.mode,
                claims = plan.claim_stats.total,
                details = plan.detail_stats.total,
                "Dry run finished, nothing written"
            );
            return Ok(ImportSummary::from_plan(plan, true));
        }

        if let Err(e) = self.apply(&mut tx, &plan).await {
            error!(mode = %plan.mode, error = %e, "Import failed, rolling back");
            TransactionManager::rollback(tx).await?;
            return Err(e);
        }
        TransactionManager::commit(tx).await?;

        info!(
            mode = %plan.mode,
            claims_created = plan.claim_stats.created,
            claims_updated = plan.claim_stats.updated,
            claims_replaced = plan.claim_stats.replaced,
            claims_skipped = plan.claim_stats.skipped,
            details_created = plan.detail_stats.created,
            details_updated = plan.detail_stats.updated,
            details_replaced = plan.detail_stats.replaced,
            details_skipped = plan.detail_stats.skipped,
            "Import committed"
        );
        Ok(ImportSummary::from_plan(plan, false))
    }

    async fn apply(&self, conn: &mut PgConnection, plan: &ImportPlan) -> ClaimsResult<()> {
        for planned in &plan.claims {
            let claim = &planned.claim;
            match planned.action {
                RowAction::Create => ClaimRepository::insert_claim(conn, claim).await?,
                RowAction::Update => {
                    ClaimRepository::update_claim(conn, claim).await?;
                }
                RowAction::Replace => {
                    ClaimRepository::delete_claim(conn, claim.id).await?;
                    ClaimRepository::insert_claim(conn, claim).await?;
                }
                RowAction::Skip => {}
            }
        }

        for planned in &plan.details {
            let detail = &planned.detail;
            match planned.action {
                RowAction::Create => ClaimRepository::insert_detail(conn, detail).await?,
                RowAction::Update => {
                    ClaimRepository::update_detail(conn, detail).await?;
                }
                RowAction::Replace => {
                    ClaimRepository::delete_detail(conn, detail.claim_id).await?;
                    ClaimRepository::insert_detail(conn, detail).await?;
                }
                RowAction::Skip => {}
            }
        }
        Ok(())
    }

    fn log_plan(&self, plan: &ImportPlan) {
        for planned in &plan.claims {
            debug!(
                row = planned.row,
                claim_id = planned.claim.id,
                patient = %self.redactor.mask_name(&planned.claim.patient_name),
                action = ?planned.action,
                "Planned claim"
            );
        }
        for planned in &plan.details {
            debug!(
                row = planned.row,
                claim_id = planned.detail.claim_id,
                action = ?planned.action,
                "Planned claim detail"
            );
        }
        for issue in &plan.issues {
            warn!(
                file = ?issue.file,
                row = issue.row,
                issue = %self.redactor.redact(&issue.message),
                "Row not imported"
            );
        }
    }
}
