//! Postgres persistence for the claims recovery platform.
//!
//! - [`DatabasePool`] wraps the sqlx pool and runs the embedded migrations
//!   under `migrations/`.
//! - [`TransactionManager`] hands out transactions; the CSV import runs in
//!   exactly one.
//! - Repositories under [`repositories`] hold every SQL statement.
//!
//! # Schema
//!
//! `claims` is keyed by the upstream claim id. `claim_details` (one per
//! claim), `flags` and `notes` reference it with `ON DELETE CASCADE`, so
//! deleting a claim removes everything hung off it.
//!
//! ```rust,ignore
//! use database_layer::{DatabasePool, PoolOptions, ClaimRepository, ClaimFilter};
//!
//! let db = DatabasePool::new("postgresql://localhost/claims", &PoolOptions::default()).await?;
//! db.migrate().await?;
//! let claims = ClaimRepository::new(db.pool().clone())
//!     .list(&ClaimFilter::default(), 0, 30)
//!     .await?;
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;
pub mod transaction;

pub use connection::{DatabasePool, PoolOptions};
pub use error::{DatabaseError, DatabaseResult};
pub use models::*;
pub use repositories::{AnnotationRepository, ClaimRepository, DbResult, ReportRepository};
pub use transaction::TransactionManager;
