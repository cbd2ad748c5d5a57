//! # Amount Calculator
//!
//! Derives the gross (tax-inclusive), VAT, net and provision amounts of an
//! operation from its stored inputs.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    From one stored amount to four figures               │
//! │                                                                         │
//! │  all_tax_included = true           all_tax_included = false            │
//! │  ───────────────────────           ────────────────────────            │
//! │  gross = amount                    vat   = amount × r / 100            │
//! │  vat   = amount × r / (100 + r)    gross = amount + vat                │
//! │                                                                         │
//! │                  net       = gross − vat                                │
//! │                  provision = net × p / 100                              │
//! │                                                                         │
//! │  r = vat_rate if apply_vat else 0                                       │
//! │  p = provision_rate if apply_provision else 0                           │
//! │  Every division rounds half away from zero to the cent.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All results are unsigned magnitudes. The ledger direction is applied by
//! the caller via [`Money::signed`] or [`DerivedAmounts::signed_gross`].
//!
//! ## Usage
//! ```rust
//! use compta_core::calculator::AmountCalculator;
//! use compta_core::money::Money;
//! use compta_core::types::{DebitOrCredit, OperationInputs, Rate};
//!
//! let calc = AmountCalculator::new(OperationInputs {
//!     amount: Money::from_cents(10000),
//!     apply_vat: true,
//!     vat_rate: Rate::from_percent(20),
//!     all_tax_included: false,
//!     apply_provision: false,
//!     provision_rate: Rate::zero(),
//!     sign: DebitOrCredit::Credit,
//! })
//! .unwrap();
//!
//! assert_eq!(calc.gross_amount().to_string(), "120.00");
//! assert_eq!(calc.vat_amount().to_string(), "20.00");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::InvalidInputError;
use crate::money::Money;
use crate::types::{DebitOrCredit, OperationInputs, Rate};
use crate::{MAX_AMOUNT_CENTS, MAX_RATE_BPS};

// =============================================================================
// Calculator
// =============================================================================

/// Pure calculator over one immutable [`OperationInputs`] snapshot.
///
/// Every figure is derived, with overflow checks, inside [`new`](Self::new).
/// Once built, every query is infallible and side-effect free. Instances are
/// `Copy` and can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountCalculator {
    amounts: DerivedAmounts,
}

impl AmountCalculator {
    /// Checks the snapshot and derives every amount.
    ///
    /// Disabled toggles zero their rate here, whatever the stored value.
    ///
    /// ## Errors
    /// [`InvalidInputError`] when
    /// - `amount` ≤ 0 or above 9 999 999 999.99
    /// - an effective rate is negative or above 999.99
    /// - the amount is tax-inclusive and `1 + vat_rate/100` ≤ 0
    /// - a derived figure does not fit into i64 cents
    pub fn new(inputs: OperationInputs) -> Result<Self, InvalidInputError> {
        let vat_rate = effective_rate(inputs.apply_vat, inputs.vat_rate);
        let provision_rate = effective_rate(inputs.apply_provision, inputs.provision_rate);
        let amount = inputs.amount;

        if !amount.is_positive() {
            return Err(InvalidInputError::new(format!(
                "amount must be greater than zero (got {})",
                amount
            )));
        }

        if amount.cents() > MAX_AMOUNT_CENTS {
            return Err(InvalidInputError::new(format!(
                "amount must not exceed {} (got {})",
                Money::from_cents(MAX_AMOUNT_CENTS),
                amount
            )));
        }

        check_rate("vat_rate", vat_rate)?;
        check_rate("provision_rate", provision_rate)?;

        // 1 + r/100 is the divisor when backing VAT out of a gross amount.
        if inputs.all_tax_included && vat_rate.bps() <= -10_000 {
            return Err(InvalidInputError::new(format!(
                "vat_rate {} leaves no tax-exclusive base",
                vat_rate
            )));
        }

        let (gross, vat) = if inputs.all_tax_included {
            let vat = amount
                .included_portion(vat_rate)
                .ok_or_else(|| overflow("vat amount"))?;
            (amount, vat)
        } else {
            let vat = amount.percent_of(vat_rate).ok_or_else(|| overflow("vat amount"))?;
            let gross = amount.checked_add(vat).ok_or_else(|| overflow("gross amount"))?;
            (gross, vat)
        };

        let net = gross.checked_sub(vat).ok_or_else(|| overflow("net amount"))?;
        let provision = net
            .percent_of(provision_rate)
            .ok_or_else(|| overflow("provision amount"))?;

        Ok(AmountCalculator {
            amounts: DerivedAmounts {
                gross,
                vat,
                net,
                provision,
                sign: inputs.sign,
            },
        })
    }

    /// The tax-inclusive total.
    pub fn gross_amount(&self) -> Money {
        self.amounts.gross
    }

    /// The VAT portion of [`gross_amount`](Self::gross_amount).
    pub fn vat_amount(&self) -> Money {
        self.amounts.vat
    }

    /// The tax-exclusive base: gross minus VAT.
    pub fn net_amount(&self) -> Money {
        self.amounts.net
    }

    /// Provision on the tax-exclusive base.
    pub fn provision_amount(&self) -> Money {
        self.amounts.provision
    }

    /// Ledger direction of the snapshot.
    pub fn sign(&self) -> DebitOrCredit {
        self.amounts.sign
    }

    /// Every derived figure at once.
    pub fn amounts(&self) -> DerivedAmounts {
        self.amounts
    }
}

#[inline]
fn effective_rate(apply: bool, rate: Rate) -> Rate {
    if apply {
        rate
    } else {
        Rate::zero()
    }
}

fn check_rate(field: &str, rate: Rate) -> Result<(), InvalidInputError> {
    if rate.is_negative() {
        return Err(InvalidInputError::new(format!(
            "{} must not be negative (got {})",
            field, rate
        )));
    }
    if rate.bps() > MAX_RATE_BPS {
        return Err(InvalidInputError::new(format!(
            "{} must not exceed {} (got {})",
            field,
            Rate::from_bps(MAX_RATE_BPS),
            rate
        )));
    }
    Ok(())
}

fn overflow(what: &str) -> InvalidInputError {
    InvalidInputError::new(format!("{} does not fit into a cent amount", what))
}

// =============================================================================
// Derived Amounts
// =============================================================================

/// All figures derived from one snapshot, for reports and list views.
/// Display only; never written back to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DerivedAmounts {
    pub gross: Money,
    pub vat: Money,
    pub net: Money,
    pub provision: Money,
    pub sign: DebitOrCredit,
}

impl DerivedAmounts {
    /// Gross amount with the ledger direction applied.
    pub fn signed_gross(&self) -> Money {
        self.gross.signed(self.sign)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
