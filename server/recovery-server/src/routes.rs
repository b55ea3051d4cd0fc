pub mod paths;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{annotations, claims, health, reports, uploads},
    openapi,
    server::RecoveryServer,
};

/// Largest multipart body accepted by the upload endpoint
pub const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Create health check routes
pub fn health_routes() -> Router<RecoveryServer> {
    Router::new().route(paths::health::HEALTH, get(health::health_check))
}

/// Create dashboard, claim detail and annotation routes
pub fn claim_routes() -> Router<RecoveryServer> {
    Router::new()
        .route(paths::claims::DASHBOARD, get(claims::dashboard))
        .route(paths::claims::CLAIMS, get(claims::list_claims))
        .route(paths::claims::CLAIM_BY_ID, get(claims::get_claim))
        .route(paths::claims::CLAIM_FLAGS, post(annotations::flag_claim))
        .route(paths::claims::CLAIM_NOTES, post(annotations::add_note))
}

/// Create CSV upload routes
pub fn upload_routes() -> Router<RecoveryServer> {
    Router::new()
        .route(
            paths::uploads::UPLOADS,
            post(uploads::upload_csv).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(paths::uploads::UPLOAD_STATS, get(uploads::upload_stats))
}

/// Create reporting routes
pub fn report_routes() -> Router<RecoveryServer> {
    Router::new().route(paths::reports::REPORTS, get(reports::get_report))
}

/// Create all application routes
pub fn create_routes() -> Router<RecoveryServer> {
    let api_v1 = Router::new()
        .merge(claim_routes())
        .merge(upload_routes())
        .merge(report_routes());

    Router::new()
        .merge(health_routes())
        .nest(paths::API_V1, api_v1)
        .merge(openapi::create_docs_routes())
}
