//! Request validation utilities shared by handlers
//!
//! Request bodies implement [`RequestValidation`]; the macros keep the
//! resulting error messages consistent.

use crate::error::ApiError;

/// Trait for validating request payloads
pub trait RequestValidation {
    /// Validates the request and returns an error if validation fails
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] describing the first failed check.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Macro for validating fields with custom predicates
///
/// # Usage
///
/// ```rust,ignore
/// validate_field!(self.text, !self.text.trim().is_empty(), "Note text is required");
/// ```
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::validation($message));
        }
    };
}

/// Macro for validating required fields (non-empty strings)
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Macro for validating an upper bound on string length
#[macro_export]
macro_rules! validate_max_length {
    ($field:expr, $max:expr, $message:expr) => {
        $crate::validate_field!($field, $field.chars().count() <= $max, $message);
    };
}
