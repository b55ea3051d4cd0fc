use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use database_layer::{AnnotationRepository, ClaimRepository, DatabasePool};

use crate::error::{ClaimsError, ClaimsResult};
use crate::models::{Claim, ClaimDetail, Flag, Note};

/// Longest accepted reviewer identifier
pub const MAX_CREATED_BY_LEN: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClaimDetailView {
    pub id: i64,
    pub denial_reason: Option<String>,
    pub cpt_codes: String,
    pub cpt_code_list: Vec<String>,
}

impl From<ClaimDetail> for ClaimDetailView {
    fn from(detail: ClaimDetail) -> Self {
        Self {
            cpt_code_list: detail.cpt_code_list(),
            id: detail.id,
            denial_reason: detail.denial_reason,
            cpt_codes: detail.cpt_codes,
        }
    }
}

/// A claim with everything hung off it, newest annotations first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClaimView {
    pub claim: Claim,
    pub underpayment: Decimal,
    pub detail: Option<ClaimDetailView>,
    pub flags: Vec<Flag>,
    pub notes: Vec<Note>,
}

/// Trim a reviewer identifier; blank means anonymous.
pub fn normalize_created_by(created_by: Option<&str>) -> ClaimsResult<Option<String>> {
    let Some(value) = created_by.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > MAX_CREATED_BY_LEN {
        return Err(ClaimsError::Validation(format!(
            "created_by must be at most {MAX_CREATED_BY_LEN} characters"
        )));
    }
    Ok(Some(value.to_string()))
}

/// Trimmed note text; blank text is rejected.
pub fn normalize_note_text(text: &str) -> ClaimsResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ClaimsError::Validation("Note text is required".to_string()));
    }
    Ok(text.to_string())
}

/// Claim lookup and reviewer annotations
#[derive(Clone)]
pub struct ClaimService {
    claims: ClaimRepository,
    annotations: AnnotationRepository,
}

impl ClaimService {
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            claims: ClaimRepository::new(pool.pool().clone()),
            annotations: AnnotationRepository::new(pool.pool().clone()),
        }
    }

    pub async fn get_claim(&self, claim_id: i32) -> ClaimsResult<ClaimView> {
        let claim = self
            .claims
            .get(claim_id)
            .await?
            .ok_or(ClaimsError::ClaimNotFound(claim_id))?;
        let detail = self.claims.get_detail(claim_id).await?;
        let flags = self.annotations.flags_for_claim(claim_id).await?;
        let notes = self.annotations.notes_for_claim(claim_id).await?;

        Ok(ClaimView {
            underpayment: claim.underpayment(),
            claim,
            detail: detail.map(ClaimDetailView::from),
            flags,
            notes,
        })
    }

    pub async fn flag_claim(&self, claim_id: i32, created_by: Option<&str>) -> ClaimsResult<Flag> {
        let created_by = normalize_created_by(created_by)?;
        self.ensure_exists(claim_id).await?;
        let flag = self
            .annotations
            .create_flag(claim_id, created_by.as_deref())
            .await?;
        info!(claim_id, flag_id = flag.id, "Claim flagged");
        Ok(flag)
    }

    pub async fn add_note(
        &self,
        claim_id: i32,
        text: &str,
        created_by: Option<&str>,
    ) -> ClaimsResult<Note> {
        let text = normalize_note_text(text)?;
        let created_by = normalize_created_by(created_by)?;
        self.ensure_exists(claim_id).await?;
        let note = self
            .annotations
            .create_note(claim_id, &text, created_by.as_deref())
            .await?;
        info!(claim_id, note_id = note.id, "Note added to claim");
        Ok(note)
    }

    async fn ensure_exists(&self, claim_id: i32) -> ClaimsResult<()> {
        if self.claims.exists(claim_id).await? {
            Ok(())
        } else {
            Err(ClaimsError::ClaimNotFound(claim_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_text_is_trimmed_and_required() {
        assert_eq!(normalize_note_text("  follow up  ").unwrap(), "follow up");
        let err = normalize_note_text(" \n\t ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Note text is required");
    }

    #[test]
    fn test_created_by_normalization() {
        assert_eq!(normalize_created_by(None).unwrap(), None);
        assert_eq!(normalize_created_by(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_created_by(Some(" jsmith ")).unwrap().as_deref(),
            Some("jsmith")
        );
        let long = "x".repeat(MAX_CREATED_BY_LEN + 1);
        assert!(normalize_created_by(Some(&long)).is_err());
    }

    #[test]
    fn test_detail_view_exposes_code_list() {
        let view = ClaimDetailView::from(ClaimDetail {
            id: 3,
            claim_id: 30001,
            denial_reason: Some("Coding error".to_string()),
            cpt_codes: "99204,82947".to_string(),
        });
        assert_eq!(view.cpt_code_list, vec!["99204", "82947"]);
        assert_eq!(view.denial_reason.as_deref(), Some("Coding error"));
    }
}
