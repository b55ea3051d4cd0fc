//! Route path constants
//!
//! utoipa `#[utoipa::path(...)]` attributes need string literals, so the
//! paths written there must match these constants exactly.

/// API base path
pub const API_V1: &str = "/api/v1";

/// Health check endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
}

/// Dashboard and claim endpoints, relative to [`super::API_V1`]
pub mod claims {
    pub const DASHBOARD: &str = "/dashboard";
    pub const CLAIMS: &str = "/claims";
    pub const CLAIM_BY_ID: &str = "/claims/:id";
    pub const CLAIM_FLAGS: &str = "/claims/:id/flags";
    pub const CLAIM_NOTES: &str = "/claims/:id/notes";
}

/// CSV upload endpoints, relative to [`super::API_V1`]
pub mod uploads {
    pub const UPLOADS: &str = "/uploads";
    pub const UPLOAD_STATS: &str = "/uploads/stats";
}

/// Reporting endpoints, relative to [`super::API_V1`]
pub mod reports {
    pub const REPORTS: &str = "/reports";
}
