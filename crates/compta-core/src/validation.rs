//! # Validation Module
//!
//! Field rules for accounts and operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Record (THIS MODULE)                                         │
//! │  ├── normalize_rate: disabled toggle → rate 0.00                       │
//! │  └── validate_*: lengths, ranges, positive amount                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Calculator                                                   │
//! │  └── rejects non-positive amount / negative rates on its own           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key to accounts                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use compta_core::money::Money;
//! use compta_core::validation::{validate_account_id, validate_amount};
//!
//! assert!(validate_account_id("BANK-01").is_ok());
//! assert!(validate_amount(Money::from_cents(0)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Rate;
use crate::{
    MAX_ACCOUNT_ID_LEN, MAX_ACCOUNT_LABEL_LEN, MAX_AMOUNT_CENTS, MAX_COMMENT_LEN,
    MAX_DESCRIPTION_LEN, MAX_OPERATION_LABEL_LEN, MAX_RATE_BPS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Normalisation
// =============================================================================

/// Returns `rate` when the toggle is on, zero otherwise.
///
/// ## Example
/// ```rust
/// use compta_core::types::Rate;
/// use compta_core::validation::normalize_rate;
///
/// assert_eq!(normalize_rate(false, Rate::from_percent(40)), Rate::zero());
/// assert_eq!(normalize_rate(true, Rate::from_percent(40)), Rate::from_percent(40));
/// ```
#[inline]
pub fn normalize_rate(apply: bool, rate: Rate) -> Rate {
    if apply {
        rate
    } else {
        Rate::zero()
    }
}

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, required: bool, max: usize) -> ValidationResult<()> {
    if required && value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an account identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 25 characters
pub fn validate_account_id(id: &str) -> ValidationResult<()> {
    validate_text("account id", id, true, MAX_ACCOUNT_ID_LEN)
}

/// Validates an account label (required, at most 255 characters).
pub fn validate_account_label(label: &str) -> ValidationResult<()> {
    validate_text("account label", label, true, MAX_ACCOUNT_LABEL_LEN)
}

/// Validates an account description (optional, at most 1024 characters).
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_text("description", description, false, MAX_DESCRIPTION_LEN)
}

/// Validates an operation label (required, at most 128 characters).
pub fn validate_operation_label(label: &str) -> ValidationResult<()> {
    validate_text("label", label, true, MAX_OPERATION_LABEL_LEN)
}

/// Validates an operation comment (optional, at most 1024 characters).
pub fn validate_comment(comment: &str) -> ValidationResult<()> {
    validate_text("comment", comment, false, MAX_COMMENT_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an operation amount.
///
/// ## Rules
/// - Must be strictly positive ("Amount must be a positive number")
/// - At most 9 999 999 999.99 (12 digits, 2 of them decimals)
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "Amount".to_string(),
        });
    }

    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "Amount".to_string(),
            min: Money::from_cents(1).to_string(),
            max: Money::from_cents(MAX_AMOUNT_CENTS).to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage rate.
///
/// ## Rules
/// - Between 0.00 and 999.99 (5 digits, 2 of them decimals)
///
/// ## Example
/// ```rust
/// use compta_core::types::Rate;
/// use compta_core::validation::validate_rate;
///
/// assert!(validate_rate("vat_rate", Rate::from_percent(20)).is_ok());
/// assert!(validate_rate("vat_rate", Rate::from_bps(-1)).is_err());
/// ```
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if rate.is_negative() || rate.bps() > MAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Rate::zero().to_string(),
            max: Rate::from_bps(MAX_RATE_BPS).to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use compta_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_account_id() {
        assert!(validate_account_id("BANK").is_ok());
        assert!(validate_account_id(&"A".repeat(25)).is_ok());

        assert!(validate_account_id("").is_err());
        assert!(validate_account_id("   ").is_err());
        assert!(validate_account_id(&"A".repeat(26)).is_err());
    }

    #[test]
    fn test_validate_labels_and_free_text() {
        assert!(validate_operation_label("Rent").is_ok());
        assert!(validate_operation_label("").is_err());
        assert!(validate_operation_label(&"x".repeat(129)).is_err());

        assert!(validate_account_label(&"x".repeat(255)).is_ok());
        assert!(validate_account_label(&"x".repeat(256)).is_err());

        assert!(validate_description("").is_ok());
        assert!(validate_comment("").is_ok());
        assert!(validate_comment(&"x".repeat(1025)).is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(validate_operation_label(&"é".repeat(128)).is_ok());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Money::from_cents(1)).is_ok());
        assert!(validate_amount(Money::from_cents(MAX_AMOUNT_CENTS)).is_ok());

        let err = validate_amount(Money::zero()).unwrap_err();
        assert_eq!(err.to_string(), "Amount must be a positive number");
        assert!(validate_amount(Money::from_cents(-500)).is_err());
        assert!(validate_amount(Money::from_cents(MAX_AMOUNT_CENTS + 1)).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("vat_rate", Rate::zero()).is_ok());
        assert!(validate_rate("vat_rate", Rate::from_bps(MAX_RATE_BPS)).is_ok());

        let err = validate_rate("vat_rate", Rate::from_bps(MAX_RATE_BPS + 1)).unwrap_err();
        assert_eq!(err.to_string(), "vat_rate must be between 0.00 and 999.99");
        assert!(validate_rate("provision_rate", Rate::from_bps(-100)).is_err());
    }

    #[test]
    fn test_normalize_rate() {
        assert!(normalize_rate(false, Rate::from_percent(20)).is_zero());
        assert_eq!(normalize_rate(true, Rate::from_percent(20)).bps(), 2000);
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
