use axum::{
    extract::{Path, Query, State},
    Json,
};
use claims_service::{ClaimView, Dashboard, DashboardPage};

use crate::error::{api_success_with_meta, ApiError, ApiResponse, ResponseMetadata};
use crate::server::RecoveryServer;
use crate::types::DashboardQuery;

/// Paged claim listing with dashboard statistics
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "claims",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Claims page with statistics", body = Dashboard)
    )
)]
pub async fn dashboard(
    State(server): State<RecoveryServer>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let dashboard = server
        .dashboard
        .dashboard(query.filter(), query.page())
        .await?;

    let metadata = ResponseMetadata {
        total_count: Some(dashboard.page.pagination.total_count),
        message: None,
    };
    Ok(Json(api_success_with_meta(dashboard, metadata)))
}

/// Load-more listing: the same page of claims without statistics
#[utoipa::path(
    get,
    path = "/api/v1/claims",
    tag = "claims",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Claims page", body = DashboardPage)
    )
)]
pub async fn list_claims(
    State(server): State<RecoveryServer>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardPage>>, ApiError> {
    let page = server.dashboard.list(query.filter(), query.page()).await?;

    let metadata = ResponseMetadata {
        total_count: Some(page.pagination.total_count),
        message: None,
    };
    Ok(Json(api_success_with_meta(page, metadata)))
}

/// Claim with its detail, flags and notes
#[utoipa::path(
    get,
    path = "/api/v1/claims/{id}",
    tag = "claims",
    params(("id" = i32, Path, description = "Claim id")),
    responses(
        (status = 200, description = "Claim found", body = ClaimView),
        (status = 404, description = "Claim not found", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_claim(
    State(server): State<RecoveryServer>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ClaimView>>, ApiError> {
    let claim = server.claims.get_claim(id).await?;
    Ok(Json(crate::error::api_success(claim)))
}
