//! CSV import: pure planning plus a transactional apply step.

pub mod importer;
pub mod plan;

pub use importer::{ClaimImporter, ImportOptions, ImportSummary};
pub use plan::{
    action_for, plan_import, referenced_claim_ids, ExistingState, ImportPlan, ImportStats,
    PlannedClaim, PlannedDetail, RowAction,
};
