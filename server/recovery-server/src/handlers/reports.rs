use axum::{extract::State, Json};
use claims_service::ClaimsReport;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::RecoveryServer;

/// Aggregate claims report
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "reports",
    responses(
        (status = 200, description = "Report over all stored claims", body = ClaimsReport)
    )
)]
pub async fn get_report(
    State(server): State<RecoveryServer>,
) -> Result<Json<ApiResponse<ClaimsReport>>, ApiError> {
    let report = server.reports.report(chrono::Utc::now()).await?;
    Ok(Json(api_success(report)))
}
