//! # Domain Types
//!
//! Core domain types used throughout Compta.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐                        │
//! │  │    Account      │◄──│      Operation       │                        │
//! │  │  ─────────────  │   │  ──────────────────  │                        │
//! │  │  id (business)  │   │  id (UUID)           │                        │
//! │  │  label          │   │  account_id (FK)     │                        │
//! │  │  description    │   │  amount, toggles,    │                        │
//! │  └─────────────────┘   │  rates, sign         │                        │
//! │                        └──────────┬───────────┘                        │
//! │                                   │ inputs() (fresh every call)        │
//! │                                   ▼                                     │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌───────────────┐   │
//! │  │      Rate       │   │   OperationInputs    │   │ DebitOrCredit │   │
//! │  │  bps (i64)      │   │  7-field snapshot    │   │  Debit  = -1  │   │
//! │  │  2000 = 20.00 % │   │  for the calculator  │   │  Credit = +1  │   │
//! │  └─────────────────┘   └──────────────────────┘   └───────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::calculator::AmountCalculator;
use crate::error::{CoreError, CoreResult, InvalidInputError, ValidationErrors};
use crate::money::{fmt_hundredths, parse_hundredths, Money};
use crate::validation;

// =============================================================================
// Rate
// =============================================================================

/// A percentage with two fractional digits, held in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so `20.00 %` is exactly `2000`.
/// Signed: a negative rate is invalid input, but it must be representable
/// to be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(i64);

impl Rate {
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage (`20` → `20.00 %`).
    #[inline]
    pub const fn from_percent(pct: i64) -> Self {
        Rate(pct * 100)
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Renders as a plain percentage number, e.g. `"20.00"`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hundredths(self.0, f)
    }
}

impl FromStr for Rate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hundredths(s)
            .map(Rate)
            .ok_or_else(|| CoreError::parse("rate", s))
    }
}

// =============================================================================
// Debit / Credit
// =============================================================================

/// Ledger direction of an operation.
///
/// Amounts are stored as magnitudes; the direction is applied only when a
/// value is shown in a ledger column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DebitOrCredit {
    /// Money leaving the account.
    Debit,
    /// Money entering the account.
    Credit,
}

impl DebitOrCredit {
    /// `-1` for debits, `+1` for credits.
    #[inline]
    pub const fn multiplier(&self) -> i64 {
        match self {
            DebitOrCredit::Debit => -1,
            DebitOrCredit::Credit => 1,
        }
    }

    /// Storage code, identical to [`multiplier`](Self::multiplier).
    #[inline]
    pub const fn code(&self) -> i64 {
        self.multiplier()
    }

    /// Decodes a storage code.
    pub fn from_code(code: i64) -> CoreResult<Self> {
        match code {
            -1 => Ok(DebitOrCredit::Debit),
            1 => Ok(DebitOrCredit::Credit),
            other => Err(CoreError::parse("debit_or_credit", other.to_string())),
        }
    }
}

impl fmt::Display for DebitOrCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebitOrCredit::Debit => write!(f, "Debit"),
            DebitOrCredit::Credit => write!(f, "Credit"),
        }
    }
}

impl FromStr for DebitOrCredit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "-1" => Ok(DebitOrCredit::Debit),
            "credit" | "1" | "+1" => Ok(DebitOrCredit::Credit),
            _ => Err(CoreError::parse("debit_or_credit", s)),
        }
    }
}

// =============================================================================
// Operation Inputs (calculator snapshot)
// =============================================================================

/// Everything the amount calculator needs, copied out of a record.
///
/// Built fresh by [`Operation::inputs`] on every access and dropped after
/// use. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OperationInputs {
    pub amount: Money,
    pub apply_vat: bool,
    pub vat_rate: Rate,
    pub all_tax_included: bool,
    pub apply_provision: bool,
    pub provision_rate: Rate,
    pub sign: DebitOrCredit,
}

// =============================================================================
// Operation Defaults
// =============================================================================

/// Field defaults for newly created operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OperationDefaults {
    pub all_tax_included: bool,
    pub apply_vat: bool,
    pub vat_rate: Rate,
    pub apply_provision: bool,
    pub provision_rate: Rate,
}

/// Environment keys read by [`OperationDefaults::from_lookup`].
pub const ENV_DEFAULT_VAT_RATE: &str = "COMPTA_DEFAULT_VAT_RATE";
pub const ENV_DEFAULT_PROVISION_RATE: &str = "COMPTA_DEFAULT_PROVISION_RATE";
pub const ENV_DEFAULT_ALL_TAX_INCLUDED: &str = "COMPTA_DEFAULT_ALL_TAX_INCLUDED";
pub const ENV_DEFAULT_APPLY_VAT: &str = "COMPTA_DEFAULT_APPLY_VAT";
pub const ENV_DEFAULT_APPLY_PROVISION: &str = "COMPTA_DEFAULT_APPLY_PROVISION";

impl Default for OperationDefaults {
    fn default() -> Self {
        OperationDefaults {
            all_tax_included: true,
            apply_vat: true,
            vat_rate: Rate::zero(),
            apply_provision: true,
            provision_rate: Rate::from_percent(40),
        }
    }
}

impl OperationDefaults {
    /// Overrides the defaults with whatever `lookup` returns for the
    /// `COMPTA_DEFAULT_*` keys.
    ///
    /// The lookup is injected so this crate never touches the process
    /// environment itself; callers pass `|k| std::env::var(k).ok()`.
    ///
    /// ## Example
    /// ```rust
    /// use compta_core::types::{OperationDefaults, Rate};
    ///
    /// let defaults = OperationDefaults::from_lookup(|key| match key {
    ///     "COMPTA_DEFAULT_VAT_RATE" => Some("20.00".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(defaults.vat_rate, Rate::from_percent(20));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut defaults = OperationDefaults::default();

        if let Some(value) = lookup(ENV_DEFAULT_VAT_RATE) {
            defaults.vat_rate = value
                .parse()
                .map_err(|_| CoreError::parse(ENV_DEFAULT_VAT_RATE, value.as_str()))?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_PROVISION_RATE) {
            defaults.provision_rate = value
                .parse()
                .map_err(|_| CoreError::parse(ENV_DEFAULT_PROVISION_RATE, value.as_str()))?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_ALL_TAX_INCLUDED) {
            defaults.all_tax_included = parse_flag(ENV_DEFAULT_ALL_TAX_INCLUDED, &value)?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_APPLY_VAT) {
            defaults.apply_vat = parse_flag(ENV_DEFAULT_APPLY_VAT, &value)?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_APPLY_PROVISION) {
            defaults.apply_provision = parse_flag(ENV_DEFAULT_APPLY_PROVISION, &value)?;
        }

        Ok(defaults)
    }
}

fn parse_flag(key: &'static str, value: &str) -> CoreResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::parse(key, value)),
    }
}

// =============================================================================
// Account
// =============================================================================

/// A bookkeeping account. The `id` is a short business code chosen by the
/// user (e.g. `"BANK-01"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Account {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl Account {
    pub fn new(id: impl Into<String>, label: impl Into<String>, description: impl Into<String>) -> Self {
        Account {
            id: id.into(),
            label: label.into(),
            description: description.into(),
        }
    }

    /// Checks every field and returns all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validation::validate_account_id(&self.id) {
            errors.push(e);
        }
        if let Err(e) = validation::validate_account_label(&self.label) {
            errors.push(e);
        }
        if let Err(e) = validation::validate_description(&self.description) {
            errors.push(e);
        }
        errors.into_result()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

// =============================================================================
// Operation
// =============================================================================

/// A debit or credit booked against an account.
///
/// Only the raw inputs are stored. Gross, VAT, net and provision amounts
/// are derived on demand through [`Operation::calculator`]; nothing derived
/// is kept on the record, so a field change is visible on the next read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Operation {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the operation happened.
    #[ts(as = "String")]
    pub operation_date: NaiveDate,

    /// When the operation was entered.
    #[ts(as = "String")]
    pub input_date: NaiveDate,

    pub label: String,
    pub debit_or_credit: DebitOrCredit,
    pub account_id: String,

    /// Stored magnitude; see `all_tax_included` for what it contains.
    pub amount: Money,
    pub all_tax_included: bool,
    pub apply_vat: bool,
    pub vat_rate: Rate,
    pub apply_provision: bool,
    pub provision_rate: Rate,
    pub comment: String,
}

impl Operation {
    /// Creates an operation with [`OperationDefaults::default`].
    pub fn new(
        account_id: impl Into<String>,
        operation_date: NaiveDate,
        label: impl Into<String>,
        debit_or_credit: DebitOrCredit,
        amount: Money,
    ) -> Self {
        Self::with_defaults(
            OperationDefaults::default(),
            account_id,
            operation_date,
            label,
            debit_or_credit,
            amount,
        )
    }

    /// Creates an operation seeded from explicit defaults.
    pub fn with_defaults(
        defaults: OperationDefaults,
        account_id: impl Into<String>,
        operation_date: NaiveDate,
        label: impl Into<String>,
        debit_or_credit: DebitOrCredit,
        amount: Money,
    ) -> Self {
        Operation {
            id: Uuid::new_v4().to_string(),
            operation_date,
            input_date: Utc::now().date_naive(),
            label: label.into(),
            debit_or_credit,
            account_id: account_id.into(),
            amount,
            all_tax_included: defaults.all_tax_included,
            apply_vat: defaults.apply_vat,
            vat_rate: defaults.vat_rate,
            apply_provision: defaults.apply_provision,
            provision_rate: defaults.provision_rate,
            comment: String::new(),
        }
    }

    /// Sets the VAT toggle and rate.
    pub fn vat(mut self, apply: bool, rate: Rate) -> Self {
        self.apply_vat = apply;
        self.vat_rate = rate;
        self
    }

    /// Sets the provision toggle and rate.
    pub fn provision(mut self, apply: bool, rate: Rate) -> Self {
        self.apply_provision = apply;
        self.provision_rate = rate;
        self
    }

    /// Sets whether `amount` already includes VAT.
    pub fn tax_included(mut self, included: bool) -> Self {
        self.all_tax_included = included;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    // -------------------------------------------------------------------------
    // Record rules
    // -------------------------------------------------------------------------

    /// Forces each rate to zero when its toggle is off.
    pub fn normalize_rates(&mut self) {
        self.vat_rate = validation::normalize_rate(self.apply_vat, self.vat_rate);
        self.provision_rate = validation::normalize_rate(self.apply_provision, self.provision_rate);
    }

    /// Checks every field and returns all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let checks = [
            validation::validate_uuid(&self.id),
            validation::validate_account_id(&self.account_id),
            validation::validate_operation_label(&self.label),
            validation::validate_amount(self.amount),
            validation::validate_rate("vat_rate", self.vat_rate),
            validation::validate_rate("provision_rate", self.provision_rate),
            validation::validate_comment(&self.comment),
        ];
        for check in checks {
            if let Err(e) = check {
                errors.push(e);
            }
        }
        errors.into_result()
    }

    /// Normalises the rates, then validates.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use compta_core::{DebitOrCredit, Money, Operation, Rate};
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    /// let mut op = Operation::new("BANK", date, "Fees", DebitOrCredit::Debit, Money::from_cents(1000))
    ///     .provision(false, Rate::from_percent(40));
    /// op.clean().unwrap();
    /// assert!(op.provision_rate.is_zero());
    /// ```
    pub fn clean(&mut self) -> Result<(), ValidationErrors> {
        self.normalize_rates();
        self.validate()
    }

    // -------------------------------------------------------------------------
    // Derived amounts
    // -------------------------------------------------------------------------

    /// Snapshot of the calculator inputs as they are right now.
    pub fn inputs(&self) -> OperationInputs {
        OperationInputs {
            amount: self.amount,
            apply_vat: self.apply_vat,
            vat_rate: self.vat_rate,
            all_tax_included: self.all_tax_included,
            apply_provision: self.apply_provision,
            provision_rate: self.provision_rate,
            sign: self.debit_or_credit,
        }
    }

    /// Builds a calculator over a fresh snapshot.
    pub fn calculator(&self) -> Result<AmountCalculator, InvalidInputError> {
        AmountCalculator::new(self.inputs())
    }

    pub fn gross_amount(&self) -> Result<Money, InvalidInputError> {
        Ok(self.calculator()?.gross_amount())
    }

    pub fn vat_amount(&self) -> Result<Money, InvalidInputError> {
        Ok(self.calculator()?.vat_amount())
    }

    pub fn net_amount(&self) -> Result<Money, InvalidInputError> {
        Ok(self.calculator()?.net_amount())
    }

    pub fn provision_amount(&self) -> Result<Money, InvalidInputError> {
        Ok(self.calculator()?.provision_amount())
    }

    /// One-line list-view text.
    ///
    /// `[Operation Date:2024 Jan 05] [Account:Bank] Groceries: 120.00 €`, or
    /// `Groceries (invalid data)` when the amounts cannot be derived.
    pub fn describe(&self, account: &Account) -> String {
        match self.gross_amount() {
            Ok(gross) => format!(
                "[Operation Date:{}] [Account:{}] {}: {} €",
                self.operation_date.format("%Y %b %d"),
                account,
                self.label,
                gross
            ),
            Err(_) => {
                let label = if self.label.is_empty() {
                    "Operation"
                } else {
                    self.label.as_str()
                };
                format!("{} (invalid data)", label)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    fn sample() -> Operation {
        Operation::new("BANK", date(), "Groceries", DebitOrCredit::Debit, Money::from_cents(12000))
            .vat(true, Rate::from_percent(20))
            .tax_included(true)
            .provision(true, Rate::from_percent(40))
    }

    #[test]
    fn test_rate_parse_and_display() {
        let rate: Rate = "20.00".parse().unwrap();
        assert_eq!(rate.bps(), 2000);
        assert_eq!(rate.to_string(), "20.00");
        assert_eq!("5.5".parse::<Rate>().unwrap().bps(), 550);
        assert!("5.555".parse::<Rate>().is_err());
        assert!("-1".parse::<Rate>().unwrap().is_negative());
    }

    #[test]
    fn test_debit_or_credit_codes() {
        assert_eq!(DebitOrCredit::Debit.code(), -1);
        assert_eq!(DebitOrCredit::Credit.code(), 1);
        assert_eq!(DebitOrCredit::from_code(-1).unwrap(), DebitOrCredit::Debit);
        assert_eq!(DebitOrCredit::from_code(1).unwrap(), DebitOrCredit::Credit);
        assert!(DebitOrCredit::from_code(0).is_err());
        assert_eq!("credit".parse::<DebitOrCredit>().unwrap(), DebitOrCredit::Credit);
        assert_eq!(DebitOrCredit::Debit.to_string(), "Debit");
    }

    #[test]
    fn test_operation_defaults() {
        let op = Operation::new("BANK", date(), "x", DebitOrCredit::Credit, Money::from_cents(100));
        assert!(op.all_tax_included);
        assert!(op.apply_vat);
        assert!(op.vat_rate.is_zero());
        assert!(op.apply_provision);
        assert_eq!(op.provision_rate, Rate::from_percent(40));
        assert!(op.comment.is_empty());
        assert!(validation::validate_uuid(&op.id).is_ok());
    }

    #[test]
    fn test_defaults_from_lookup() {
        let defaults = OperationDefaults::from_lookup(|key| match key {
            ENV_DEFAULT_PROVISION_RATE => Some("12.50".to_string()),
            ENV_DEFAULT_APPLY_VAT => Some("false".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(defaults.provision_rate.bps(), 1250);
        assert!(!defaults.apply_vat);
        assert!(defaults.all_tax_included);

        let err = OperationDefaults::from_lookup(|key| match key {
            ENV_DEFAULT_APPLY_PROVISION => Some("maybe".to_string()),
            _ => None,
        });
        assert!(matches!(err, Err(CoreError::Parse { what, .. }) if what == ENV_DEFAULT_APPLY_PROVISION));
    }

    #[test]
    fn test_normalize_rates_zeroes_disabled_toggles() {
        let mut op = sample().vat(false, Rate::from_percent(20)).provision(false, Rate::from_percent(40));
        op.normalize_rates();
        assert!(op.vat_rate.is_zero());
        assert!(op.provision_rate.is_zero());

        let mut op = sample();
        op.normalize_rates();
        assert_eq!(op.vat_rate, Rate::from_percent(20));
        assert_eq!(op.provision_rate, Rate::from_percent(40));
    }

    #[test]
    fn test_clean_rejects_non_positive_amount() {
        let mut op = sample();
        op.amount = Money::zero();
        let errors = op.clean().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.to_string(), "Amount must be a positive number");

        op.amount = Money::from_cents(-500);
        assert!(op.clean().is_err());
    }

    #[test]
    fn test_clean_collects_every_failure() {
        let mut op = sample();
        op.amount = Money::zero();
        op.label = String::new();
        op.comment = "c".repeat(2000);
        let errors = op.clean().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_inputs_snapshot_is_fresh() {
        let mut op = sample();
        assert_eq!(op.gross_amount().unwrap(), Money::from_cents(12000));

        op.amount = Money::from_cents(24000);
        assert_eq!(op.gross_amount().unwrap(), Money::from_cents(24000));
        assert_eq!(op.vat_amount().unwrap(), Money::from_cents(4000));

        op.apply_vat = false;
        assert_eq!(op.vat_amount().unwrap(), Money::zero());
    }

    #[test]
    fn test_derived_amounts_on_record() {
        let op = sample();
        assert_eq!(op.gross_amount().unwrap(), Money::from_cents(12000));
        assert_eq!(op.vat_amount().unwrap(), Money::from_cents(2000));
        assert_eq!(op.net_amount().unwrap(), Money::from_cents(10000));
        assert_eq!(op.provision_amount().unwrap(), Money::from_cents(4000));
    }

    #[test]
    fn test_describe() {
        let account = Account::new("BANK", "Bank", "");
        assert_eq!(
            sample().describe(&account),
            "[Operation Date:2024 Jan 05] [Account:Bank] Groceries: 120.00 €"
        );

        let mut broken = sample();
        broken.amount = Money::zero();
        assert_eq!(broken.describe(&account), "Groceries (invalid data)");

        broken.label = String::new();
        assert_eq!(broken.describe(&account), "Operation (invalid data)");
    }

    #[test]
    fn test_account_validate_and_display() {
        let account = Account::new("BANK", "Main bank", "Checking account");
        assert!(account.validate().is_ok());
        assert_eq!(account.to_string(), "Main bank");

        let bad = Account::new("", "", "");
        assert_eq!(bad.validate().unwrap_err().len(), 2);
    }
}
