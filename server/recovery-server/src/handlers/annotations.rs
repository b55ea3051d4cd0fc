use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use claims_service::{Flag, Note, MAX_CREATED_BY_LEN};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{api_success_with_meta, ApiError, ApiResponse, ResponseMetadata};
use crate::server::RecoveryServer;
use crate::validation::RequestValidation;
use crate::{validate_max_length, validate_required};

/// Optional body for flagging a claim
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct FlagRequest {
    /// Reviewer identifier
    pub created_by: Option<String>,
}

impl RequestValidation for FlagRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(created_by) = &self.created_by {
            validate_max_length!(
                created_by,
                MAX_CREATED_BY_LEN,
                format!("created_by must be at most {MAX_CREATED_BY_LEN} characters")
            );
        }
        Ok(())
    }
}

/// Read an optional flag body. An empty body flags anonymously; anything else
/// must be JSON sent as `application/json`.
pub fn parse_flag_body(headers: &HeaderMap, body: &[u8]) -> Result<FlagRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FlagRequest::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        });
    if !is_json {
        return Err(ApiError::bad_request(
            "Expected request with `Content-Type: application/json`",
        ));
    }

    let Json(request) = Json::<FlagRequest>::from_bytes(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;
    Ok(request)
}

/// Body for adding a note to a claim
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteRequest {
    /// Note text; surrounding whitespace is trimmed
    #[schema(example = "Called insurer, appeal pending")]
    pub text: Option<String>,
    /// Reviewer identifier
    pub created_by: Option<String>,
}

impl RequestValidation for NoteRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let text = self.text.as_deref().unwrap_or_default();
        validate_required!(text, "Note text is required");
        if let Some(created_by) = &self.created_by {
            validate_max_length!(
                created_by,
                MAX_CREATED_BY_LEN,
                format!("created_by must be at most {MAX_CREATED_BY_LEN} characters")
            );
        }
        Ok(())
    }
}

/// Flag a claim for follow-up
#[utoipa::path(
    post,
    path = "/api/v1/claims/{id}/flags",
    tag = "annotations",
    params(("id" = i32, Path, description = "Claim id")),
    request_body(content = FlagRequest, description = "Optional reviewer identifier"),
    responses(
        (status = 201, description = "Claim flagged", body = Flag),
        (status = 400, description = "Malformed JSON body", body = crate::error::ApiErrorResponse),
        (status = 404, description = "Claim not found", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn flag_claim(
    State(server): State<RecoveryServer>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<Flag>>), ApiError> {
    let request = parse_flag_body(&headers, &body)?;
    request.validate()?;

    let flag = server
        .claims
        .flag_claim(id, request.created_by.as_deref())
        .await?;

    let metadata = ResponseMetadata {
        total_count: None,
        message: Some("Claim flagged successfully".to_string()),
    };
    Ok((StatusCode::CREATED, Json(api_success_with_meta(flag, metadata))))
}

/// Attach a note to a claim
#[utoipa::path(
    post,
    path = "/api/v1/claims/{id}/notes",
    tag = "annotations",
    params(("id" = i32, Path, description = "Claim id")),
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note added", body = Note),
        (status = 400, description = "Missing note text or malformed JSON", body = crate::error::ApiErrorResponse),
        (status = 404, description = "Claim not found", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn add_note(
    State(server): State<RecoveryServer>,
    Path(id): Path<i32>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Note>>), ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;
    request.validate()?;

    let note = server
        .claims
        .add_note(
            id,
            request.text.as_deref().unwrap_or_default(),
            request.created_by.as_deref(),
        )
        .await?;

    let metadata = ResponseMetadata {
        total_count: None,
        message: Some("Note added successfully".to_string()),
    };
    Ok((StatusCode::CREATED, Json(api_success_with_meta(note, metadata))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_request_requires_text() {
        let missing = NoteRequest::default();
        assert!(missing.validate().is_err());

        let blank = NoteRequest {
            text: Some("   ".to_string()),
            created_by: None,
        };
        let err = blank.validate().unwrap_err();
        assert_eq!(err.to_string(), "Note text is required");

        let ok = NoteRequest {
            text: Some(" Appeal filed ".to_string()),
            created_by: Some("reviewer-7".to_string()),
        };
        assert!(ok.validate().is_ok());
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers
    }

    #[test]
    fn test_flag_body_may_be_empty() {
        let request = parse_flag_body(&HeaderMap::new(), b"").unwrap();
        assert!(request.created_by.is_none());

        let request = parse_flag_body(&json_headers(), b"  \n").unwrap();
        assert!(request.created_by.is_none());
    }

    #[test]
    fn test_flag_body_reads_json() {
        let request = parse_flag_body(&json_headers(), br#"{"created_by": "reviewer-2"}"#).unwrap();
        assert_eq!(request.created_by.as_deref(), Some("reviewer-2"));
    }

    #[test]
    fn test_flag_body_rejects_malformed_json_and_wrong_content_type() {
        let err = parse_flag_body(&json_headers(), b"{not json").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid JSON"));

        let mut text = HeaderMap::new();
        text.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        let err = parse_flag_body(&text, br#"{"created_by": "x"}"#).unwrap_err();
        assert_eq!(err.error_type(), "bad_request");

        let err = parse_flag_body(&HeaderMap::new(), br#"{"created_by": "x"}"#).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_created_by_length_limit() {
        let request = FlagRequest {
            created_by: Some("x".repeat(MAX_CREATED_BY_LEN + 1)),
        };
        assert!(request.validate().is_err());

        let request = FlagRequest {
            created_by: Some("x".repeat(MAX_CREATED_BY_LEN)),
        };
        assert!(request.validate().is_ok());
        assert!(FlagRequest::default().validate().is_ok());
    }
}
