//! # Error Types
//!
//! Domain-specific error types for compta-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  compta-core errors (this file)                                        │
//! │  ├── InvalidInputError - Calculator rejected its snapshot              │
//! │  ├── ValidationError   - One record field failed a rule                │
//! │  ├── ValidationErrors  - Every field failure of one record             │
//! │  └── CoreError         - Umbrella for the above + parsing              │
//! │                                                                         │
//! │  compta-db errors (separate crate)                                     │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  Flow: ValidationErrors → DbError → caller                             │
//! │        InvalidInputError → display layer ("(invalid data)")            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in the message
//! 3. A failed calculation never yields a value

use std::fmt;

use thiserror::Error;

// =============================================================================
// Invalid Input (calculator)
// =============================================================================

/// The amount calculator refused its input snapshot.
///
/// ## When This Occurs
/// - `amount` is zero or negative
/// - an effective rate is negative
/// - a tax-inclusive amount would be divided by a non-positive factor
///
/// Raised by [`AmountCalculator::new`](crate::calculator::AmountCalculator::new)
/// before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid input: {reason}")]
pub struct InvalidInputError {
    reason: String,
}

impl InvalidInputError {
    /// Creates an error carrying a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        InvalidInputError {
            reason: reason.into(),
        }
    }

    /// Why the input was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Record field validation errors.
///
/// These errors occur when a record doesn't meet its storage rules.
/// Checked before a record is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range (bounds in the field's display unit).
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must be strictly positive.
    #[error("{field} must be a positive number")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// All field failures of a single record, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Turns the collected list into a result: `Ok` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        ValidationErrors(vec![err])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Amount calculation rejected its input.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// Record failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A decimal or enum string could not be parsed.
    #[error("Cannot parse {what} from '{value}'")]
    Parse { what: &'static str, value: String },
}

impl CoreError {
    pub fn parse(what: &'static str, value: impl Into<String>) -> Self {
        CoreError::Parse {
            what,
            value: value.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = InvalidInputError::new("amount must be greater than zero");
        assert_eq!(err.reason(), "amount must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid input: amount must be greater than zero"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "Amount".to_string(),
        };
        assert_eq!(err.to_string(), "Amount must be a positive number");

        let err = ValidationError::TooLong {
            field: "label".to_string(),
            max: 128,
        };
        assert_eq!(err.to_string(), "label must be at most 128 characters");
    }

    #[test]
    fn test_validation_errors_collects_and_joins() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.push(ValidationError::Required {
            field: "label".to_string(),
        });
        errors.push(ValidationError::MustBePositive {
            field: "Amount".to_string(),
        });

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "label is required; Amount must be a positive number"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_conversions_to_core_error() {
        let core_err: CoreError = InvalidInputError::new("nope").into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
        assert_eq!(core_err.to_string(), "Invalid input: nope");

        let single: ValidationErrors = ValidationError::Required {
            field: "id".to_string(),
        }
        .into();
        let core_err: CoreError = single.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_every_variant_has_a_producer() {
        use crate::money::Money;
        use crate::types::{Account, DebitOrCredit};

        let produced: Vec<CoreError> = vec![
            "abc".parse::<Money>().unwrap_err(),
            DebitOrCredit::from_code(0).unwrap_err(),
            Account::new("", "", "").validate().unwrap_err().into(),
            InvalidInputError::new("amount must be greater than zero").into(),
        ];

        for err in produced {
            match err {
                CoreError::InvalidInput(_) | CoreError::Validation(_) | CoreError::Parse { .. } => {}
            }
        }
    }
}
