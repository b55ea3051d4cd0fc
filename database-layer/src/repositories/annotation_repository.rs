use sqlx::PgPool;

use super::DbResult;
use crate::models::{Flag, Note};

/// Flags and notes attached to claims by reviewers
#[derive(Debug, Clone)]
pub struct AnnotationRepository {
    pool: PgPool,
}

impl AnnotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_flag(&self, claim_id: i32, created_by: Option<&str>) -> DbResult<Flag> {
        let flag = sqlx::query_as::<_, Flag>(
            r#"
            INSERT INTO flags (claim_id, created_by)
            VALUES ($1, $2)
            RETURNING id, claim_id, created_by, created_at
            "#,
        )
        .bind(claim_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(flag)
    }

    pub async fn create_note(
        &self,
        claim_id: i32,
        text: &str,
        created_by: Option<&str>,
    ) -> DbResult<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (claim_id, text, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, claim_id, text, created_by, created_at
            "#,
        )
        .bind(claim_id)
        .bind(text)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    /// Newest first
    pub async fn flags_for_claim(&self, claim_id: i32) -> DbResult<Vec<Flag>> {
        let flags = sqlx::query_as::<_, Flag>(
            r#"
            SELECT id, claim_id, created_by, created_at
            FROM flags
            WHERE claim_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(flags)
    }

    /// Newest first
    pub async fn notes_for_claim(&self, claim_id: i32) -> DbResult<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, claim_id, text, created_by, created_at
            FROM notes
            WHERE claim_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }
}
