use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use claims_service::{ClaimImporter, ClaimService, DashboardService, ReportService};
use config_engine::Settings;
use database_layer::{ClaimRepository, DatabasePool, PoolOptions};
use tracing::info;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct RecoveryServer {
    /// Loaded settings
    pub settings: Arc<Settings>,
    /// Database connection pool
    pub db_pool: DatabasePool,
    /// Claim lookup, flags and notes
    pub claims: ClaimService,
    /// Paged claim listing and statistics
    pub dashboard: DashboardService,
    /// Aggregate reports
    pub reports: ReportService,
    /// CSV importer used by uploads
    pub importer: ClaimImporter,
    /// Raw counts for before/after upload comparisons
    pub claim_repo: ClaimRepository,
}

impl RecoveryServer {
    /// Connect to the configured database and build the server state
    pub async fn new(settings: Settings) -> Result<Self> {
        let options = PoolOptions {
            max_connections: settings.database.max_connections,
            acquire_timeout: Duration::from_secs(settings.database.acquire_timeout_secs),
        };
        let pool = DatabasePool::new(&settings.database.url, &options)
            .await
            .context("Failed to connect to the claims database")?;

        if settings.database.run_migrations {
            pool.migrate()
                .await
                .context("Failed to apply database migrations")?;
            info!("Database schema is up to date");
        }

        Ok(Self::new_with_pool(pool, settings))
    }

    /// Build the server state around an existing pool
    pub fn new_with_pool(db_pool: DatabasePool, settings: Settings) -> Self {
        let dashboard = DashboardService::new(&db_pool)
            .with_window(settings.dashboard.page_size, settings.dashboard.max_claims);

        Self {
            claims: ClaimService::new(&db_pool),
            reports: ReportService::new(&db_pool),
            importer: ClaimImporter::new(db_pool.clone()),
            claim_repo: ClaimRepository::new(db_pool.pool().clone()),
            dashboard,
            settings: Arc::new(settings),
            db_pool,
        }
    }
}
