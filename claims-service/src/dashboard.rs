//! Dashboard listing window and statistics.
//!
//! The listing only ever reaches the first `max_claims` claims of the
//! filtered set, `page_size` at a time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use database_layer::{ClaimRepository, DatabasePool, ReportRepository};

use crate::error::ClaimsResult;
use crate::models::{ClaimFilter, ClaimListItem, StatusCounts};

pub const DEFAULT_PAGE_SIZE: u32 = 30;
pub const DEFAULT_MAX_CLAIMS: u32 = 100;

/// Page number from a raw query value; anything below 1 or unparsable is 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map_or(1, |p| u32::try_from(p).unwrap_or(u32::MAX))
}

/// Slice of the capped listing shown on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardWindow {
    page: u32,
    page_size: u32,
    max_claims: u32,
}

impl DashboardWindow {
    pub fn new(page: u32, page_size: u32, max_claims: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            max_claims,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Zero-based offset of the first row
    pub fn start(&self) -> i64 {
        (i64::from(self.page) - 1).saturating_mul(i64::from(self.page_size))
    }

    /// Exclusive end offset, never past the cap
    pub fn end(&self) -> i64 {
        (self.start() + i64::from(self.page_size)).min(i64::from(self.max_claims))
    }

    /// Rows to fetch; zero once the page starts past the cap
    pub fn limit(&self) -> i64 {
        (self.end() - self.start()).max(0)
    }

    pub fn pagination(&self, filtered_total: i64) -> DashboardPagination {
        let reachable = filtered_total.min(i64::from(self.max_claims));
        DashboardPagination {
            page: self.page,
            page_size: self.page_size,
            total_count: filtered_total,
            has_more: self.end() < reachable,
            has_previous: self.page > 1,
            showing_start: self.start() + 1,
            showing_end: self.end(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardPagination {
    pub page: u32,
    pub page_size: u32,
    /// Claims matching the filters, before the cap
    pub total_count: i64,
    pub has_more: bool,
    pub has_previous: bool,
    pub showing_start: i64,
    pub showing_end: i64,
}

/// One page of the claim listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardPage {
    pub claims: Vec<ClaimListItem>,
    pub pagination: DashboardPagination,
    pub filters: ClaimFilter,
}

/// Headline numbers shown above the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_claims: i64,
    pub total_flags: i64,
    pub total_notes: i64,
    pub average_underpayment: Decimal,
    pub status_counts: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dashboard {
    #[serde(flatten)]
    pub page: DashboardPage,
    pub stats: DashboardStats,
}

#[derive(Clone)]
pub struct DashboardService {
    claims: ClaimRepository,
    reports: ReportRepository,
    page_size: u32,
    max_claims: u32,
}

impl DashboardService {
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            claims: ClaimRepository::new(pool.pool().clone()),
            reports: ReportRepository::new(pool.pool().clone()),
            page_size: DEFAULT_PAGE_SIZE,
            max_claims: DEFAULT_MAX_CLAIMS,
        }
    }

    pub fn with_window(mut self, page_size: u32, max_claims: u32) -> Self {
        self.page_size = page_size;
        self.max_claims = max_claims;
        self
    }

    pub fn window(&self, page: u32) -> DashboardWindow {
        DashboardWindow::new(page, self.page_size, self.max_claims)
    }

    /// Filtered listing for `page`, without statistics.
    pub async fn list(&self, filter: ClaimFilter, page: u32) -> ClaimsResult<DashboardPage> {
        let window = self.window(page);
        let total = self.claims.count(&filter).await?;
        let claims = if window.limit() > 0 {
            self.claims.list(&filter, window.start(), window.limit()).await?
        } else {
            Vec::new()
        };
        debug!(
            page = window.page(),
            total,
            returned = claims.len(),
            "Dashboard page loaded"
        );

        Ok(DashboardPage {
            claims,
            pagination: window.pagination(total),
            filters: filter,
        })
    }

    pub async fn stats(&self) -> ClaimsResult<DashboardStats> {
        let counts = self.claims.table_counts().await?;
        let status_counts = self.claims.status_counts().await?;
        let average = self.reports.average_underpayment().await?;

        Ok(DashboardStats {
            total_claims: counts.claims,
            total_flags: counts.flags,
            total_notes: counts.notes,
            average_underpayment: average.round_dp(2),
            status_counts,
        })
    }

    /// Listing plus statistics.
    pub async fn dashboard(&self, filter: ClaimFilter, page: u32) -> ClaimsResult<Dashboard> {
        let page = self.list(filter, page).await?;
        let stats = self.stats().await?;
        Ok(Dashboard { page, stats })
    }
}
