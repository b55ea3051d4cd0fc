//! Claims import and review for underpayment recovery
//!
//! - [`parser`]: pipe-delimited claim list and claim detail parsing
//! - [`import`]: overwrite / append / smart merge of a batch into the store,
//!   in one transaction
//! - [`dashboard`]: filtered, capped claim listing and headline statistics
//! - [`service`]: claim lookup, flags and notes
//! - [`reporting`]: insurer, status, monthly and underpayment aggregates
//!
//! Flags and notes survive smart and append re-imports. Overwrite deletes
//! each re-imported claim, and the schema cascades the delete to them.

pub mod dashboard;
pub mod error;
pub mod import;
pub mod models;
pub mod parser;
pub mod reporting;
pub mod service;

pub use dashboard::*;
pub use error::*;
pub use import::{ClaimImporter, ImportOptions, ImportStats, ImportSummary, RowAction};
pub use models::*;
pub use parser::{parse_claims, parse_details, ImportFile, ParsedFile, RowIssue};
pub use reporting::*;
pub use service::*;
