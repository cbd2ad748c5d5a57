//! # compta-core: Pure Business Logic for Compta
//!
//! Amount derivation and record rules for debit/credit operations booked
//! against accounts. No I/O lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Compta Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             seed / report binary (compta-db/src/bin)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ compta-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ calculator │  │ validation│  │   │
//! │  │   │  Account  │  │   Money   │  │   gross    │  │   rules   │  │   │
//! │  │   │ Operation │  │  rounding │  │ VAT, prov. │  │ normalize │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  compta-db (Database Layer)                     │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Account, Operation, Rate, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`calculator`] - Gross / VAT / net / provision derivation
//! - [`error`] - Domain error types
//! - [`validation`] - Record field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use compta_core::{DebitOrCredit, Money, Operation, Rate};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let op = Operation::new("BANK", date, "Invoice 42", DebitOrCredit::Credit, "120.00".parse().unwrap())
//!     .vat(true, Rate::from_percent(20))
//!     .tax_included(true);
//!
//! let calc = op.calculator().unwrap();
//! assert_eq!(calc.vat_amount(), Money::from_cents(2000));
//! assert_eq!(calc.provision_amount(), Money::from_cents(4000)); // 40% default
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{AmountCalculator, DerivedAmounts};
pub use error::{CoreError, CoreResult, InvalidInputError, ValidationError, ValidationErrors};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest storable amount: 12 digits, 2 of them decimals.
pub const MAX_AMOUNT_CENTS: i64 = 999_999_999_999;

/// Largest storable rate: 5 digits, 2 of them decimals (999.99 %).
pub const MAX_RATE_BPS: i64 = 99_999;

pub const MAX_ACCOUNT_ID_LEN: usize = 25;
pub const MAX_ACCOUNT_LABEL_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 1024;
pub const MAX_OPERATION_LABEL_LEN: usize = 128;
pub const MAX_COMMENT_LEN: usize = 1024;
