//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every stored amount has exactly two fractional digits, so it is     │
//! │    an integer number of cents. Rates are integer basis points.         │
//! │    Products and quotients are done in i128 and rounded ONCE.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use compta_core::money::Money;
//!
//! let amount: Money = "120.00".parse().unwrap();
//! assert_eq!(amount.cents(), 12000);
//! assert_eq!(amount.to_string(), "120.00");
//!
//! let total = amount + Money::from_cents(50);
//! assert_eq!(total.to_string(), "120.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::{DebitOrCredit, Rate};

/// Basis points in one whole (100.00 %).
pub(crate) const BPS_PER_UNIT: i128 = 10_000;

// =============================================================================
// Rounding
// =============================================================================

/// Integer division rounding half away from zero.
///
/// ## Examples
/// ```text
///  5 / 2  =  2.5  →  3
/// -5 / 2  = -2.5  → -3
///  7 / 3  =  2.33 →  2
/// ```
///
/// `denominator` must not be zero; callers guard it.
pub fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let negative = (numerator < 0) != (denominator < 0);
    let n = numerator.abs();
    let d = denominator.abs();
    let magnitude = (2 * n + d) / (2 * d);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

// =============================================================================
// Fixed-point (2 decimals) text helpers
// =============================================================================

/// Parses `"-12.3"`, `"120"`, `"0.05"` into hundredths. At most two
/// fractional digits are accepted.
pub(crate) fn parse_hundredths(input: &str) -> Option<i64> {
    let s = input.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > 2 {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac_value: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    let value = whole_value.checked_mul(100)?.checked_add(frac_value)?;
    Some(if negative { -value } else { value })
}

/// Writes hundredths as `"-12.30"`.
pub(crate) fn fmt_hundredths(value: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: stored amounts are magnitudes, but signed ledger
///   values (debits) and invalid input must stay representable
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Operation.amount ──► OperationInputs ──► AmountCalculator
///                                              │
///                       gross / VAT / net / provision (all Money)
///                                              │
///                       .signed(Debit) ──► ledger column "-120.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use compta_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use compta_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (euros).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a ledger direction to an unsigned magnitude.
    ///
    /// ## Example
    /// ```rust
    /// use compta_core::money::Money;
    /// use compta_core::types::DebitOrCredit;
    ///
    /// let gross = Money::from_cents(12000);
    /// assert_eq!(gross.signed(DebitOrCredit::Debit).to_string(), "-120.00");
    /// assert_eq!(gross.signed(DebitOrCredit::Credit).to_string(), "120.00");
    /// ```
    #[inline]
    pub const fn signed(&self, direction: DebitOrCredit) -> Self {
        Money(self.0 * direction.multiplier())
    }

    /// `self × rate / 100`, rounded half away from zero.
    ///
    /// ## Implementation
    /// `cents × bps / 10000` in i128, rounded once. Returns `None` when the
    /// result does not fit back into i64 cents.
    ///
    /// ## Example
    /// ```rust
    /// use compta_core::money::Money;
    /// use compta_core::types::Rate;
    ///
    /// let net = Money::from_cents(1000);       // 10.00
    /// let rate = Rate::from_bps(825);          // 8.25 %
    /// // 10.00 × 8.25 % = 0.825 → 0.83
    /// assert_eq!(net.percent_of(rate).unwrap().cents(), 83);
    /// ```
    pub fn percent_of(&self, rate: Rate) -> Option<Money> {
        let cents = div_round_half_away(self.0 as i128 * rate.bps() as i128, BPS_PER_UNIT);
        i64::try_from(cents).ok().map(Money)
    }

    /// The portion of a rate-inclusive total that the rate accounts for:
    /// `self × rate / (100 + rate)`, rounded half away from zero.
    ///
    /// Returns `None` when `100 + rate` is not positive, or when the result
    /// does not fit into i64 cents.
    ///
    /// ## Example
    /// ```rust
    /// use compta_core::money::Money;
    /// use compta_core::types::Rate;
    ///
    /// let gross = Money::from_cents(12000);    // 120.00 incl. 20 %
    /// let vat = gross.included_portion(Rate::from_bps(2000)).unwrap();
    /// assert_eq!(vat.cents(), 2000);           // 20.00
    /// ```
    pub fn included_portion(&self, rate: Rate) -> Option<Money> {
        let divisor = BPS_PER_UNIT + rate.bps() as i128;
        if divisor <= 0 {
            return None;
        }
        let cents = div_round_half_away(self.0 as i128 * rate.bps() as i128, divisor);
        i64::try_from(cents).ok().map(Money)
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self - other`, or `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering, e.g. `"120.00"`, `"-5.50"`. Currency
/// symbols are added by whoever renders the record.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hundredths(self.0, f)
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hundredths(s)
            .map(Money)
            .ok_or_else(|| CoreError::parse("amount", s))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("120.00".parse::<Money>().unwrap().cents(), 12000);
        assert_eq!("120".parse::<Money>().unwrap().cents(), 12000);
        assert_eq!("0.5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(".05".parse::<Money>().unwrap().cents(), 5);
        assert_eq!("-5.00".parse::<Money>().unwrap().cents(), -500);
        assert_eq!(" 7.25 ".parse::<Money>().unwrap().cents(), 725);

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_div_round_half_away() {
        assert_eq!(div_round_half_away(5, 2), 3);
        assert_eq!(div_round_half_away(-5, 2), -3);
        assert_eq!(div_round_half_away(5, -2), -3);
        assert_eq!(div_round_half_away(7, 3), 2);
        assert_eq!(div_round_half_away(8, 3), 3);
        assert_eq!(div_round_half_away(0, 7), 0);
        assert_eq!(div_round_half_away(25, 10), 3);
        assert_eq!(div_round_half_away(15, 10), 2);
    }

    #[test]
    fn test_percent_of_rounds_half_away_from_zero() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let amount = Money::from_cents(1000);
        assert_eq!(amount.percent_of(Rate::from_bps(825)).unwrap().cents(), 83);

        // 0.10 at 25% = 0.025 → 0.03 (bankers would give 0.02)
        let small = Money::from_cents(10);
        assert_eq!(small.percent_of(Rate::from_bps(2500)).unwrap().cents(), 3);

        assert_eq!(amount.percent_of(Rate::zero()).unwrap().cents(), 0);
    }

    #[test]
    fn test_included_portion() {
        let gross = Money::from_cents(12000);
        assert_eq!(gross.included_portion(Rate::from_bps(2000)), Some(Money::from_cents(2000)));

        // 100.00 incl. 5.5% → 5.2132... → 5.21
        let gross = Money::from_cents(10000);
        assert_eq!(gross.included_portion(Rate::from_bps(550)), Some(Money::from_cents(521)));

        assert_eq!(gross.included_portion(Rate::from_bps(-10000)), None);
        assert_eq!(gross.included_portion(Rate::from_bps(-20000)), None);
    }

    #[test]
    fn test_rate_helpers_never_truncate() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.percent_of(Rate::from_bps(99_999)), None);
        assert_eq!(huge.included_portion(Rate::from_bps(i64::MAX / 2)), None);

        assert_eq!(huge.checked_add(huge), Some(Money::from_cents(i64::MAX - 1)));
        assert_eq!(huge.checked_add(Money::from_cents(i64::MAX)), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
    }

    #[test]
    fn test_signed() {
        let m = Money::from_cents(250);
        assert_eq!(m.signed(DebitOrCredit::Debit).cents(), -250);
        assert_eq!(m.signed(DebitOrCredit::Credit).cents(), 250);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
