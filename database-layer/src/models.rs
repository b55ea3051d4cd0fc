// Database models
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// `max(billed - paid, 0)`
pub fn underpayment(billed: Decimal, paid: Decimal) -> Decimal {
    (billed - paid).max(Decimal::ZERO)
}

/// A claim as exported by the billing system. The id is assigned upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Claim {
    pub id: i32,
    pub patient_name: String,
    pub billed_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: String,
    pub insurer_name: String,
    pub discharge_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    pub fn underpayment(&self) -> Decimal {
        underpayment(self.billed_amount, self.paid_amount)
    }
}

/// Incoming claim values, written by the importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    pub id: i32,
    pub patient_name: String,
    pub billed_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: String,
    pub insurer_name: String,
    pub discharge_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClaimDetail {
    pub id: i64,
    pub claim_id: i32,
    pub denial_reason: Option<String>,
    pub cpt_codes: String,
}

impl ClaimDetail {
    /// CPT codes split on commas, blanks dropped.
    pub fn cpt_code_list(&self) -> Vec<String> {
        split_cpt_codes(&self.cpt_codes)
    }
}

pub fn split_cpt_codes(codes: &str) -> Vec<String> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Incoming detail values keyed by the owning claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaimDetail {
    pub claim_id: i32,
    pub denial_reason: Option<String>,
    pub cpt_codes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Flag {
    pub id: i64,
    pub claim_id: i32,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Note {
    pub id: i64,
    pub claim_id: i32,
    pub text: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One dashboard row: the claim, its detail columns and annotation counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClaimListItem {
    pub id: i32,
    pub patient_name: String,
    pub billed_amount: Decimal,
    pub paid_amount: Decimal,
    pub underpayment: Decimal,
    pub status: String,
    pub insurer_name: String,
    pub discharge_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub denial_reason: Option<String>,
    pub cpt_codes: Option<String>,
    pub flag_count: i64,
    pub note_count: i64,
}

/// Dashboard listing filters. Values are matched as sent; an empty value
/// means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClaimFilter {
    pub status: Option<String>,
    pub insurer: Option<String>,
}

impl ClaimFilter {
    pub fn new(status: Option<String>, insurer: Option<String>) -> Self {
        let clean = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            status: clean(status),
            insurer: clean(insurer),
        }
    }
}

/// Row counts used for before/after import comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TableCounts {
    pub claims: i64,
    pub flags: i64,
    pub notes: i64,
}

/// Counts of claims whose status contains each well-known label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusCounts {
    pub pending: i64,
    pub under_review: i64,
    pub paid: i64,
    pub denied: i64,
    pub underpaid: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Money totals over a set of claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AmountTotals {
    pub claim_count: i64,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_underpayment: Decimal,
}

/// `AmountTotals` grouped by insurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InsurerTotals {
    pub insurer_name: String,
    pub claim_count: i64,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_underpayment: Decimal,
}
