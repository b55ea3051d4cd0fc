use std::collections::HashSet;

use sqlx::{PgConnection, PgPool};
use tracing::debug;

use super::DbResult;
use crate::models::{
    Claim, ClaimDetail, ClaimFilter, ClaimListItem, NewClaim, NewClaimDetail, StatusCounts,
    TableCounts,
};
use crate::query::FilteredQuery;

const LIST_QUERY: &str = r#"
    SELECT c.id, c.patient_name, c.billed_amount, c.paid_amount,
           GREATEST(c.billed_amount - c.paid_amount, 0) AS underpayment,
           c.status, c.insurer_name, c.discharge_date, c.created_at,
           d.denial_reason, d.cpt_codes,
           (SELECT COUNT(*) FROM flags f WHERE f.claim_id = c.id) AS flag_count,
           (SELECT COUNT(*) FROM notes n WHERE n.claim_id = c.id) AS note_count
    FROM claims c
    LEFT JOIN claim_details d ON d.claim_id = c.id
    WHERE 1=1"#;

const COUNT_QUERY: &str = "SELECT COUNT(*) FROM claims c WHERE 1=1";

/// Repository for claims and their detail rows
#[derive(Debug, Clone)]
pub struct ClaimRepository {
    pool: PgPool,
}

impl ClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Dashboard rows matching `filter`, ordered by id, within the window.
    pub async fn list(
        &self,
        filter: &ClaimFilter,
        offset: i64,
        limit: i64,
    ) -> DbResult<Vec<ClaimListItem>> {
        let mut query = FilteredQuery::new(LIST_QUERY);
        query
            .filter_contains("c.status", filter.status.as_deref())
            .filter_contains("c.insurer_name", filter.insurer.as_deref())
            .order_by("c.id", "ASC")
            .window(offset, limit);

        let rows = query
            .build_query_as::<ClaimListItem>()
            .fetch_all(&self.pool)
            .await?;
        debug!(offset, limit, returned = rows.len(), "Listed claims");
        Ok(rows)
    }

    /// Number of claims matching `filter`.
    pub async fn count(&self, filter: &ClaimFilter) -> DbResult<i64> {
        let mut query = FilteredQuery::new(COUNT_QUERY);
        query
            .filter_contains("c.status", filter.status.as_deref())
            .filter_contains("c.insurer_name", filter.insurer.as_deref());

        let (count,) = query
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn get(&self, id: i32) -> DbResult<Option<Claim>> {
        let claim = sqlx::query_as::<_, Claim>(
            r#"
            SELECT id, patient_name, billed_amount, paid_amount, status,
                   insurer_name, discharge_date, created_at
            FROM claims
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claim)
    }

    pub async fn get_detail(&self, claim_id: i32) -> DbResult<Option<ClaimDetail>> {
        let detail = sqlx::query_as::<_, ClaimDetail>(
            "SELECT id, claim_id, denial_reason, cpt_codes FROM claim_details WHERE claim_id = $1",
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    pub async fn exists(&self, id: i32) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM claims WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Claim, flag and note row counts.
    pub async fn table_counts(&self) -> DbResult<TableCounts> {
        let counts = sqlx::query_as::<_, TableCounts>(
            r#"
            SELECT (SELECT COUNT(*) FROM claims) AS claims,
                   (SELECT COUNT(*) FROM flags) AS flags,
                   (SELECT COUNT(*) FROM notes) AS notes
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Claims whose status contains each dashboard label, case-insensitively.
    pub async fn status_counts(&self) -> DbResult<StatusCounts> {
        let counts = sqlx::query_as::<_, StatusCounts>(
            r#"
            SELECT COUNT(*) FILTER (WHERE status ILIKE '%pending%') AS pending,
                   COUNT(*) FILTER (WHERE status ILIKE '%under review%') AS under_review,
                   COUNT(*) FILTER (WHERE status ILIKE '%paid%') AS paid,
                   COUNT(*) FILTER (WHERE status ILIKE '%denied%') AS denied,
                   COUNT(*) FILTER (WHERE status ILIKE '%underpaid%') AS underpaid
            FROM claims
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Ids from `ids` that already exist as claims.
    pub async fn existing_ids(conn: &mut PgConnection, ids: &[i32]) -> DbResult<HashSet<i32>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM claims WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&mut *conn)
            .await?;
        Ok(found.into_iter().collect())
    }

    /// Claim ids from `ids` that already have a detail row.
    pub async fn ids_with_detail(conn: &mut PgConnection, ids: &[i32]) -> DbResult<HashSet<i32>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i32> =
            sqlx::query_scalar("SELECT claim_id FROM claim_details WHERE claim_id = ANY($1)")
                .bind(ids)
                .fetch_all(&mut *conn)
                .await?;
        Ok(found.into_iter().collect())
    }

    pub async fn insert_claim(conn: &mut PgConnection, claim: &NewClaim) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO claims (id, patient_name, billed_amount, paid_amount, status,
                                insurer_name, discharge_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(claim.id)
        .bind(&claim.patient_name)
        .bind(claim.billed_amount)
        .bind(claim.paid_amount)
        .bind(&claim.status)
        .bind(&claim.insurer_name)
        .bind(claim.discharge_date)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Overwrite the claim's columns in place. `created_at` and any
    /// dependent rows are left alone.
    pub async fn update_claim(conn: &mut PgConnection, claim: &NewClaim) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET patient_name = $2, billed_amount = $3, paid_amount = $4, status = $5,
                insurer_name = $6, discharge_date = $7
            WHERE id = $1
            "#,
        )
        .bind(claim.id)
        .bind(&claim.patient_name)
        .bind(claim.billed_amount)
        .bind(claim.paid_amount)
        .bind(&claim.status)
        .bind(&claim.insurer_name)
        .bind(claim.discharge_date)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a claim. Detail, flags and notes go with it.
    pub async fn delete_claim(conn: &mut PgConnection, id: i32) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM claims WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_detail(conn: &mut PgConnection, detail: &NewClaimDetail) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO claim_details (claim_id, denial_reason, cpt_codes) VALUES ($1, $2, $3)",
        )
        .bind(detail.claim_id)
        .bind(&detail.denial_reason)
        .bind(&detail.cpt_codes)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn update_detail(conn: &mut PgConnection, detail: &NewClaimDetail) -> DbResult<u64> {
        let result = sqlx::query(
            "UPDATE claim_details SET denial_reason = $2, cpt_codes = $3 WHERE claim_id = $1",
        )
        .bind(detail.claim_id)
        .bind(&detail.denial_reason)
        .bind(&detail.cpt_codes)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_detail(conn: &mut PgConnection, claim_id: i32) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM claim_details WHERE claim_id = $1")
            .bind(claim_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
