//! Repositories over the claims schema.
//!
//! Read paths borrow the shared pool. Import writes are associated functions
//! taking a `&mut PgConnection` so callers can run them inside a transaction.

pub mod annotation_repository;
pub mod claim_repository;
pub mod report_repository;

pub use annotation_repository::AnnotationRepository;
pub use claim_repository::ClaimRepository;
pub use report_repository::ReportRepository;

use crate::error::DatabaseError;

pub type DbResult<T> = Result<T, DatabaseError>;
