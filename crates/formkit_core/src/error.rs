//! Form error types

use thiserror::Error;

/// Errors raised by the form layer
///
/// Validation failures are not errors: they are reported through
/// [`FormState::error_for`](crate::FormState::error_for).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A field slot held a value of a different kind than the widget expects
    #[error("Field `{field}` holds a {found} value, expected {expected}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Kind the caller expected
        expected: &'static str,
        /// Kind actually stored
        found: &'static str,
    },

    /// The same field name was declared twice in a schema
    #[error("Field `{0}` is declared more than once")]
    DuplicateField(String),

    /// A rule cannot apply to the field it is attached to
    #[error("Rule `{rule}` is not valid for field `{field}`: {reason}")]
    InvalidRule {
        /// Field name
        field: String,
        /// Rule name
        rule: &'static str,
        /// Why the rule was rejected
        reason: String,
    },
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
