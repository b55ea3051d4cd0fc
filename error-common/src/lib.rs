//! Common error handling utilities for the claims recovery platform
//!
//! Library crates define their own `thiserror` enums close to the code that
//! fails. This crate holds the process-level error that binaries return from
//! `main`, plus the stable error codes surfaced to API and CLI users.
//!
//! # Example
//!
//! ```rust
//! use error_common::{RecoveryError, Result};
//!
//! fn require_file(path: &std::path::Path) -> Result<()> {
//!     if !path.exists() {
//!         return Err(RecoveryError::ValidationError(format!(
//!             "Claim list file not found: {}",
//!             path.display()
//!         )));
//!     }
//!     Ok(())
//! }
//! ```

pub mod codes;
pub mod types;

pub use codes::*;
pub use types::*;
