use axum::{
    extract::{Multipart, State},
    Json,
};
use claims_service::{
    parse_claims, parse_details, parser::read_details_file, ImportMode, ImportOptions,
    ImportSummary, TableCounts, UploadStats,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::error::{api_success, api_success_with_meta, ApiError, ApiResponse, ResponseMetadata};
use crate::server::RecoveryServer;

/// Multipart field carrying the claim list CSV
pub const CLAIM_LIST_FIELD: &str = "claim_list_file";
/// Multipart field carrying the claim detail CSV
pub const CLAIM_DETAIL_FIELD: &str = "claim_detail_file";

/// Multipart form accepted by the upload endpoint
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// Pipe-delimited claim list with a header row
    #[schema(value_type = String, format = Binary)]
    pub claim_list_file: Vec<u8>,
    /// Pipe-delimited claim detail file; the configured default is used when omitted
    #[schema(value_type = Option<String>, format = Binary)]
    pub claim_detail_file: Option<Vec<u8>>,
}

/// Result of a CSV upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub summary: ImportSummary,
    /// Row counts before the import
    pub before: TableCounts,
    /// Row counts after the import
    pub after: TableCounts,
    /// Claims that did not exist before the upload
    pub claims_added: i64,
    /// Flags still attached after the upload
    pub flags_preserved: i64,
    /// Notes still attached after the upload
    pub notes_preserved: i64,
}

impl UploadResponse {
    fn new(summary: ImportSummary, before: TableCounts, after: TableCounts) -> Self {
        Self {
            summary,
            before,
            after,
            claims_added: after.claims - before.claims,
            flags_preserved: after.flags,
            notes_preserved: after.notes,
        }
    }

    fn message(&self) -> String {
        format!(
            "Created {} and updated {} claims. Preserved {} flags and {} notes.",
            self.summary.claims.created,
            self.summary.claims.updated,
            self.flags_preserved,
            self.notes_preserved
        )
    }
}

struct UploadedFile {
    name: String,
    bytes: Vec<u8>,
}

/// Upload claim CSV files and merge them in smart mode
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    tag = "uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import finished", body = UploadResponse),
        (status = 400, description = "Missing or unreadable files", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn upload_csv(
    State(server): State<RecoveryServer>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let mut claim_list: Option<UploadedFile> = None;
    let mut claim_detail: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Error processing upload: {}", e.body_text())))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };
        if field_name != CLAIM_LIST_FIELD && field_name != CLAIM_DETAIL_FIELD {
            continue;
        }
        let name = field
            .file_name()
            .map_or_else(|| field_name.clone(), str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Error processing upload: {}", e.body_text())))?;
        let file = UploadedFile {
            name,
            bytes: bytes.to_vec(),
        };
        if field_name == CLAIM_LIST_FIELD {
            claim_list = Some(file);
        } else {
            claim_detail = Some(file);
        }
    }

    let claim_list = match (claim_list, &claim_detail) {
        (Some(list), _) => list,
        (None, Some(_)) => {
            return Err(ApiError::bad_request(
                "Please upload the claim list file as well.",
            ))
        }
        (None, None) => return Err(ApiError::bad_request("No CSV files provided")),
    };

    let claims = parse_claims(claim_list.bytes.as_slice(), &claim_list.name)?;
    let details = match claim_detail {
        Some(detail) => parse_details(detail.bytes.as_slice(), &detail.name)?,
        None => {
            let fallback = server
                .settings
                .import
                .default_detail_file
                .as_deref()
                .filter(|path| path.exists())
                .ok_or_else(|| {
                    ApiError::bad_request("Claim detail file not found. Please upload both files.")
                })?;
            info!(path = %fallback.display(), "Using default claim detail file");
            read_details_file(fallback)?
        }
    };

    let before = server.claim_repo.table_counts().await?;
    let summary = server
        .importer
        .import(
            claims,
            details,
            ImportOptions {
                mode: ImportMode::Smart,
                dry_run: false,
            },
        )
        .await?;
    let after = server.claim_repo.table_counts().await?;

    let response = UploadResponse::new(summary, before, after);
    info!(
        claims_added = response.claims_added,
        flags = response.flags_preserved,
        notes = response.notes_preserved,
        "CSV upload imported"
    );

    let metadata = ResponseMetadata {
        total_count: Some(after.claims),
        message: Some(response.message()),
    };
    Ok(Json(api_success_with_meta(response, metadata)))
}

/// Totals shown on the upload page
#[utoipa::path(
    get,
    path = "/api/v1/uploads/stats",
    tag = "uploads",
    responses(
        (status = 200, description = "Claim totals", body = UploadStats)
    )
)]
pub async fn upload_stats(
    State(server): State<RecoveryServer>,
) -> Result<Json<ApiResponse<UploadStats>>, ApiError> {
    let stats = server.reports.upload_stats().await?;
    Ok(Json(api_success(stats)))
}
