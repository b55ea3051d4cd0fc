use claims_service::{parse_page, ClaimFilter};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query string accepted by the dashboard and load-more endpoints
///
/// `page` stays a raw string so that junk values fall back to the first page
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// 1-based page number; values below 1 or unparsable select page 1
    pub page: Option<String>,
    /// Case-insensitive substring match on the claim status
    pub status: Option<String>,
    /// Case-insensitive substring match on the insurer name
    pub insurer: Option<String>,
}

impl DashboardQuery {
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }

    pub fn filter(&self) -> ClaimFilter {
        ClaimFilter::new(self.status.clone(), self.insurer.clone())
    }
}
