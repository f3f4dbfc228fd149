//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    1.1 × 3    = 3.3000000000000003  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    Every price the user types is represented exactly.                  │
//! │    Percent math (× p / 100) stays exact until WE choose to round.      │
//! │                                                                         │
//! │  Rounding happens once, at the fields the user sees:                    │
//! │    tax_amount, line_total, and the final order fields.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::money::{Money, RoundingMode};
//! use tally_core::types::Percent;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line = price.checked_mul_quantity(3).unwrap(); // 32.97
//! assert_eq!(line, Money::from_cents(3297));
//!
//! let tax = line.percent_of(Percent::clamped(Decimal::from(5)).0).unwrap();
//! assert_eq!(tax.round(2, RoundingMode::HalfUp), Money::from_cents(165));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::Percent;

// =============================================================================
// Rounding Mode
// =============================================================================

/// How a monetary value is brought to its display precision.
///
/// ```text
///   value     HalfUp   HalfEven
///   0.125     0.13     0.12
///   0.135     0.14     0.14
///   -0.125   -0.13    -0.12
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half away from zero. What customers expect on a receipt.
    #[default]
    HalfUp,
    /// Bankers rounding (round half to even).
    HalfEven,
}

impl RoundingMode {
    /// Returns the rust_decimal strategy for this mode.
    pub const fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major currency units, held as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal (signed)**: order math never goes negative for in-domain input,
///   but intermediate differences (subtotal − discount) are plain subtraction
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serialized as a string**: `"189.00"`, so JSON never loses precision
///
/// ## Where Money Flows
/// ```text
/// CatalogEntry.unit_price ──► LineInput ──► LineItem.taxable_amount
///                                               │
///                                               ├──► LineItem.tax_amount
///                                               └──► LineItem.line_total
///
/// Σ unit_price × quantity ──► OrderTotals.sub_total ──► grand_total
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (hundredths of the major unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to `decimal_places` using the given mode.
    ///
    /// The result keeps its scale, so `180` rounds to `180.00`.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::{Money, RoundingMode};
    ///
    /// let tax = Money::new(Decimal::new(10085, 3)); // 10.085
    /// assert_eq!(tax.round(2, RoundingMode::HalfUp).to_string(), "10.09");
    /// assert_eq!(tax.round(2, RoundingMode::HalfEven).to_string(), "10.08");
    /// ```
    pub fn round(&self, decimal_places: u32, mode: RoundingMode) -> Money {
        let mut rounded = self.0.round_dp_with_strategy(decimal_places, mode.strategy());
        rounded.rescale(decimal_places);
        Money(rounded)
    }

    /// Multiplies by a quantity. `None` on overflow.
    #[inline]
    pub fn checked_mul_quantity(&self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    /// Returns `percent` of this amount (`self × percent / 100`), unrounded.
    ///
    /// `None` on overflow.
    pub fn percent_of(&self, percent: Percent) -> Option<Money> {
        self.0.checked_mul(percent.fraction()).map(Money)
    }

    /// Returns this amount reduced by `percent` (`self × (1 − percent / 100)`),
    /// unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    /// use tally_core::types::Percent;
    ///
    /// let gross = Money::from_cents(20000); // 200.00
    /// let ten = Percent::clamped(Decimal::from(10)).0;
    /// assert_eq!(gross.less_percent(ten), Some(Money::from_cents(18000)));
    /// ```
    pub fn less_percent(&self, percent: Percent) -> Option<Money> {
        let keep = Decimal::ONE.checked_sub(percent.fraction())?;
        self.0.checked_mul(keep).map(Money)
    }

    /// Checked addition. `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction. `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering, no currency symbol. Formatting for display is the
/// host's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pct(value: Decimal) -> Percent {
        Percent::clamped(value).0
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
        assert_eq!(money.to_string(), "10.99");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(Money::new(dec!(0.125)).round(2, RoundingMode::HalfUp).amount(), dec!(0.13));
        assert_eq!(Money::new(dec!(0.124)).round(2, RoundingMode::HalfUp).amount(), dec!(0.12));
        assert_eq!(Money::new(dec!(-0.125)).round(2, RoundingMode::HalfUp).amount(), dec!(-0.13));
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(Money::new(dec!(0.125)).round(2, RoundingMode::HalfEven).amount(), dec!(0.12));
        assert_eq!(Money::new(dec!(0.135)).round(2, RoundingMode::HalfEven).amount(), dec!(0.14));
    }

    #[test]
    fn test_round_pads_scale() {
        let rounded = Money::new(dec!(180)).round(2, RoundingMode::HalfUp);
        assert_eq!(rounded.to_string(), "180.00");
    }

    #[test]
    fn test_percent_of() {
        let net = Money::new(dec!(126));
        assert_eq!(net.percent_of(pct(dec!(8))), Some(Money::new(dec!(10.08))));
        assert_eq!(net.percent_of(Percent::ZERO), Some(Money::ZERO));
    }

    #[test]
    fn test_less_percent() {
        let gross = Money::new(dec!(200));
        assert_eq!(gross.less_percent(pct(dec!(10))), Some(Money::new(dec!(180))));
        assert!(gross.less_percent(Percent::HUNDRED).unwrap().is_zero());
    }

    #[test]
    fn test_checked_mul_quantity_overflow() {
        let huge = Money::new(Decimal::MAX);
        assert!(huge.checked_mul_quantity(2).is_none());
        assert_eq!(
            Money::from_cents(299).checked_mul_quantity(3),
            Some(Money::from_cents(897))
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(a.checked_sub(b), Some(Money::from_cents(500)));
        assert!(b.checked_sub(a).unwrap().is_negative());
        assert!(!Money::ZERO.is_negative());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(189.00))).unwrap();
        assert_eq!(json, "\"189.00\"");
    }

    /// Documents the float problem this type exists to avoid.
    #[test]
    fn test_decimal_avoids_float_drift() {
        assert_ne!(0.1_f64 + 0.2, 0.3);
        let exact = Money::new(dec!(0.1)).checked_add(Money::new(dec!(0.2))).unwrap();
        assert_eq!(exact.amount(), dec!(0.3));
    }
}
