use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::DbResult;
use crate::models::{AmountTotals, Claim, InsurerTotals, StatusCount};

/// Aggregate queries behind the dashboard statistics and the report view
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Claim count per status, most common first.
    pub async fn status_distribution(&self) -> DbResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM claims
            GROUP BY status
            ORDER BY count DESC, status ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Totals for the first `limit` insurers in alphabetical order.
    pub async fn insurer_totals(&self, limit: i64) -> DbResult<Vec<InsurerTotals>> {
        let rows = sqlx::query_as::<_, InsurerTotals>(
            r#"
            SELECT insurer_name,
                   COUNT(*) AS claim_count,
                   COALESCE(SUM(billed_amount), 0) AS total_billed,
                   COALESCE(SUM(paid_amount), 0) AS total_paid,
                   COALESCE(SUM(GREATEST(billed_amount - paid_amount, 0)), 0) AS total_underpayment
            FROM claims
            GROUP BY insurer_name
            ORDER BY insurer_name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Totals across every claim.
    pub async fn totals(&self) -> DbResult<AmountTotals> {
        let totals = sqlx::query_as::<_, AmountTotals>(
            r#"
            SELECT COUNT(*) AS claim_count,
                   COALESCE(SUM(billed_amount), 0) AS total_billed,
                   COALESCE(SUM(paid_amount), 0) AS total_paid,
                   COALESCE(SUM(GREATEST(billed_amount - paid_amount, 0)), 0) AS total_underpayment
            FROM claims
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    /// Totals for claims created in `[start, end)`.
    pub async fn totals_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<AmountTotals> {
        let totals = sqlx::query_as::<_, AmountTotals>(
            r#"
            SELECT COUNT(*) AS claim_count,
                   COALESCE(SUM(billed_amount), 0) AS total_billed,
                   COALESCE(SUM(paid_amount), 0) AS total_paid,
                   COALESCE(SUM(GREATEST(billed_amount - paid_amount, 0)), 0) AS total_underpayment
            FROM claims
            WHERE created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    /// Mean of `max(billed - paid, 0)` across all claims, zero when empty.
    pub async fn average_underpayment(&self) -> DbResult<Decimal> {
        let avg: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(AVG(GREATEST(billed_amount - paid_amount, 0)), 0) FROM claims",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(avg)
    }

    /// Largest positive underpayments first.
    pub async fn top_underpayments(&self, limit: i64) -> DbResult<Vec<Claim>> {
        let claims = sqlx::query_as::<_, Claim>(
            r#"
            SELECT id, patient_name, billed_amount, paid_amount, status,
                   insurer_name, discharge_date, created_at
            FROM claims
            WHERE billed_amount > paid_amount
            ORDER BY billed_amount - paid_amount DESC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(claims)
    }

    /// Number of distinct claims with at least one flag.
    pub async fn flagged_claim_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT claim_id) FROM flags")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Status distribution restricted to flagged claims.
    pub async fn flagged_status_distribution(&self) -> DbResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT c.status, COUNT(*) AS count
            FROM claims c
            WHERE EXISTS (SELECT 1 FROM flags f WHERE f.claim_id = c.id)
            GROUP BY c.status
            ORDER BY count DESC, c.status ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Number of distinct claims with at least one note.
    pub async fn claims_with_notes_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT claim_id) FROM notes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
