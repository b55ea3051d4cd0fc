use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::server::RecoveryServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,

        // Dashboard and claims
        crate::handlers::claims::dashboard,
        crate::handlers::claims::list_claims,
        crate::handlers::claims::get_claim,

        // Flags and notes
        crate::handlers::annotations::flag_claim,
        crate::handlers::annotations::add_note,

        // CSV uploads
        crate::handlers::uploads::upload_csv,
        crate::handlers::uploads::upload_stats,

        // Reports
        crate::handlers::reports::get_report,
    ),
    components(
        schemas(
            crate::error::ApiErrorResponse,
            crate::handlers::health::HealthResponse,
            crate::handlers::annotations::FlagRequest,
            crate::handlers::annotations::NoteRequest,
            crate::handlers::uploads::UploadForm,
            crate::handlers::uploads::UploadResponse,
            claims_service::Dashboard,
            claims_service::DashboardPage,
            claims_service::DashboardPagination,
            claims_service::DashboardStats,
            claims_service::ClaimView,
            claims_service::ClaimDetailView,
            claims_service::ImportSummary,
            claims_service::ImportStats,
            claims_service::ImportMode,
            claims_service::RowIssue,
            claims_service::ImportFile,
            claims_service::UploadStats,
            claims_service::ClaimsReport,
            claims_service::FinancialSummary,
            claims_service::MonthlyTotals,
            claims_service::InsurerComparison,
            claims_service::InsurerUnderpayment,
            claims_service::TopUnderpayment,
            claims_service::AnnotationSummary,
            database_layer::Claim,
            database_layer::ClaimListItem,
            database_layer::ClaimFilter,
            database_layer::Flag,
            database_layer::Note,
            database_layer::TableCounts,
            database_layer::StatusCounts,
            database_layer::StatusCount,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "claims", description = "Claim dashboard, listing and detail"),
        (name = "annotations", description = "Reviewer flags and notes"),
        (name = "uploads", description = "CSV import of claim lists and details"),
        (name = "reports", description = "Aggregate financial reporting"),
    ),
    info(
        title = "Claims Recovery API",
        version = "0.1.0",
        description = "Browse, annotate and report on insurance claims imported from pipe-delimited CSV files.",
    ),
)]
pub struct ApiDoc;

/// Create OpenAPI documentation routes
pub fn create_docs_routes() -> Router<RecoveryServer> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/v1/dashboard",
            "/api/v1/claims",
            "/api/v1/claims/{id}",
            "/api/v1/claims/{id}/flags",
            "/api/v1/claims/{id}/notes",
            "/api/v1/uploads",
            "/api/v1/uploads/stats",
            "/api/v1/reports",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }
}
