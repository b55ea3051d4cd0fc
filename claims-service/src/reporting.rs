use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use database_layer::{AmountTotals, DatabasePool, InsurerTotals, ReportRepository};

use crate::error::ClaimsResult;
use crate::models::StatusCount;

/// Insurers included in the per-insurer charts
pub const REPORT_INSURER_LIMIT: i64 = 5;
/// Rows in the top-underpayment table
pub const TOP_UNDERPAYMENT_LIMIT: i64 = 5;
/// Number of 30-day windows in the monthly series
pub const MONTHLY_WINDOWS: u32 = 6;
const WINDOW_DAYS: i64 = 30;

/// `total / count` to two places, zero for an empty set.
pub fn average(total: Decimal, count: i64) -> Decimal {
    if count <= 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsurerComparison {
    pub insurer_name: String,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsurerUnderpayment {
    pub insurer_name: String,
    pub total_underpayment: Decimal,
    pub average_underpayment: Decimal,
    pub claim_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FinancialSummary {
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub average_billed: Decimal,
    pub average_paid: Decimal,
    pub total_underpayment: Decimal,
    pub average_underpayment: Decimal,
}

impl From<&AmountTotals> for FinancialSummary {
    fn from(totals: &AmountTotals) -> Self {
        Self {
            total_billed: totals.total_billed,
            total_paid: totals.total_paid,
            average_billed: average(totals.total_billed, totals.claim_count),
            average_paid: average(totals.total_paid, totals.claim_count),
            total_underpayment: totals.total_underpayment,
            average_underpayment: average(totals.total_underpayment, totals.claim_count),
        }
    }
}

/// A 30-day slice of claim creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `Mon YYYY` of the window start
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyTotals {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub claim_count: i64,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_underpayment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopUnderpayment {
    pub id: i32,
    pub patient_name: String,
    pub insurer_name: String,
    pub status: String,
    pub billed_amount: Decimal,
    pub paid_amount: Decimal,
    pub underpayment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnnotationSummary {
    pub flagged_claims: i64,
    pub flagged_status_distribution: Vec<StatusCount>,
    pub claims_with_notes: i64,
    pub total_claims: i64,
}

/// Everything the report view shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClaimsReport {
    pub generated_at: DateTime<Utc>,
    pub status_distribution: Vec<StatusCount>,
    pub insurer_comparison: Vec<InsurerComparison>,
    pub insurer_underpayment: Vec<InsurerUnderpayment>,
    pub financial_summary: FinancialSummary,
    pub monthly: Vec<MonthlyTotals>,
    pub top_underpayments: Vec<TopUnderpayment>,
    pub annotations: AnnotationSummary,
}

/// Totals shown next to the upload form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadStats {
    pub total_claims: i64,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub total_underpayment: Decimal,
    pub average_underpayment: Decimal,
}

impl From<&AmountTotals> for UploadStats {
    fn from(totals: &AmountTotals) -> Self {
        Self {
            total_claims: totals.claim_count,
            total_billed: totals.total_billed,
            total_paid: totals.total_paid,
            total_underpayment: totals.total_underpayment,
            average_underpayment: average(totals.total_underpayment, totals.claim_count),
        }
    }
}

/// `count` consecutive 30-day windows ending at `now`, oldest first.
pub fn monthly_windows(now: DateTime<Utc>, count: u32) -> Vec<ReportWindow> {
    (0..i64::from(count))
        .rev()
        .map(|i| {
            let end = now - Duration::days(WINDOW_DAYS * i);
            let start = end - Duration::days(WINDOW_DAYS);
            ReportWindow {
                start,
                end,
                label: start.format("%b %Y").to_string(),
            }
        })
        .collect()
}

pub fn insurer_comparison(totals: &[InsurerTotals]) -> Vec<InsurerComparison> {
    totals
        .iter()
        .map(|t| InsurerComparison {
            insurer_name: t.insurer_name.clone(),
            total_billed: t.total_billed,
            total_paid: t.total_paid,
        })
        .collect()
}

/// Per-insurer underpayment, highest average first.
pub fn insurer_underpayment(totals: &[InsurerTotals]) -> Vec<InsurerUnderpayment> {
    let mut rows: Vec<InsurerUnderpayment> = totals
        .iter()
        .map(|t| InsurerUnderpayment {
            insurer_name: t.insurer_name.clone(),
            total_underpayment: t.total_underpayment,
            average_underpayment: average(t.total_underpayment, t.claim_count),
            claim_count: t.claim_count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.average_underpayment
            .cmp(&a.average_underpayment)
            .then_with(|| a.insurer_name.cmp(&b.insurer_name))
    });
    rows
}

#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
}

impl ReportService {
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            reports: ReportRepository::new(pool.pool().clone()),
        }
    }

    pub async fn report(&self, now: DateTime<Utc>) -> ClaimsResult<ClaimsReport> {
        let status_distribution = self.reports.status_distribution().await?;
        let insurers = self.reports.insurer_totals(REPORT_INSURER_LIMIT).await?;
        let totals = self.reports.totals().await?;

        let mut monthly = Vec::with_capacity(MONTHLY_WINDOWS as usize);
        for window in monthly_windows(now, MONTHLY_WINDOWS) {
            let t = self
                .reports
                .totals_created_between(window.start, window.end)
                .await?;
            monthly.push(MonthlyTotals {
                label: window.label,
                start: window.start,
                end: window.end,
                claim_count: t.claim_count,
                total_billed: t.total_billed,
                total_paid: t.total_paid,
                total_underpayment: t.total_underpayment,
            });
        }

        let top_underpayments = self
            .reports
            .top_underpayments(TOP_UNDERPAYMENT_LIMIT)
            .await?
            .into_iter()
            .map(|c| TopUnderpayment {
                underpayment: c.underpayment(),
                id: c.id,
                patient_name: c.patient_name,
                insurer_name: c.insurer_name,
                status: c.status,
                billed_amount: c.billed_amount,
                paid_amount: c.paid_amount,
            })
            .collect();

        let annotations = AnnotationSummary {
            flagged_claims: self.reports.flagged_claim_count().await?,
            flagged_status_distribution: self.reports.flagged_status_distribution().await?,
            claims_with_notes: self.reports.claims_with_notes_count().await?,
            total_claims: totals.claim_count,
        };

        Ok(ClaimsReport {
            generated_at: now,
            status_distribution,
            insurer_comparison: insurer_comparison(&insurers),
            insurer_underpayment: insurer_underpayment(&insurers),
            financial_summary: FinancialSummary::from(&totals),
            monthly,
            top_underpayments,
            annotations,
        })
    }

    pub async fn upload_stats(&self) -> ClaimsResult<UploadStats> {
        let totals = self.reports.totals().await?;
        Ok(UploadStats::from(&totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn insurer(name: &str, count: i64, billed: &str, paid: &str, under: &str) -> InsurerTotals {
        InsurerTotals {
            insurer_name: name.to_string(),
            claim_count: count,
            total_billed: dec(billed),
            total_paid: dec(paid),
            total_underpayment: dec(under),
        }
    }

    #[test]
    fn test_average() {
        assert_eq!(average(dec("100.00"), 3), dec("33.33"));
        assert_eq!(average(dec("10"), 0), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_windows_oldest_first() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let windows = monthly_windows(now, 6);
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[5].end, now);
        assert_eq!(windows[5].start, now - Duration::days(30));
        assert_eq!(windows[0].start, now - Duration::days(180));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(windows[5].label, "Jun 2024");
        assert_eq!(windows[0].label, "Jan 2024");
    }

    #[test]
    fn test_insurer_underpayment_sorted_by_average() {
        let totals = vec![
            insurer("Aetna", 2, "300", "200", "100"),
            insurer("Cigna", 1, "500", "100", "400"),
            insurer("Humana", 4, "100", "100", "0"),
        ];
        let rows = insurer_underpayment(&totals);
        let names: Vec<&str> = rows.iter().map(|r| r.insurer_name.as_str()).collect();
        assert_eq!(names, vec!["Cigna", "Aetna", "Humana"]);
        assert_eq!(rows[1].average_underpayment, dec("50"));
        assert_eq!(rows[1].claim_count, 2);

        // Comparison keeps the alphabetical order from the query.
        let comparison = insurer_comparison(&totals);
        assert_eq!(comparison[0].insurer_name, "Aetna");
        assert_eq!(comparison[0].total_paid, dec("200"));
    }

    #[test]
    fn test_financial_summary() {
        let totals = AmountTotals {
            claim_count: 4,
            total_billed: dec("1000.00"),
            total_paid: dec("600.00"),
            total_underpayment: dec("450.00"),
        };
        let summary = FinancialSummary::from(&totals);
        assert_eq!(summary.average_billed, dec("250.00"));
        assert_eq!(summary.average_paid, dec("150.00"));
        assert_eq!(summary.average_underpayment, dec("112.50"));

        let empty = FinancialSummary::from(&AmountTotals::default());
        assert_eq!(empty.average_billed, Decimal::ZERO);
    }

    #[test]
    fn test_upload_stats() {
        let totals = AmountTotals {
            claim_count: 2,
            total_billed: dec("300"),
            total_paid: dec("100"),
            total_underpayment: dec("200"),
        };
        let stats = UploadStats::from(&totals);
        assert_eq!(stats.total_claims, 2);
        assert_eq!(stats.average_underpayment, dec("100"));
    }
}
