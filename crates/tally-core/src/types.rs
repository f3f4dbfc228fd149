//! # Domain Types
//!
//! Value types shared by the line and order calculations.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  NumericInput   │   │    Percent      │   │  CatalogEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Number(f64)    │──►│  Decimal        │   │  unit_price     │       │
//! │  │  Text(String)   │   │  0 ≤ p ≤ 100    │   │  tax_percent    │       │
//! │  │  (raw, unsafe)  │   │  (always valid) │   │  (pre-resolved) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Raw values only become `Money`/`Percent` through the coercion functions in
//! [`validation`](crate::validation).

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Numeric Input
// =============================================================================

/// A numeric form value exactly as the host received it.
///
/// Deserializes from a JSON number or a JSON string, so `2`, `"2"`, `"2.50"`
/// and `""` are all accepted and sorted out later by coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// True for an empty or whitespace-only text value.
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(text) if text.trim().is_empty())
    }
}

impl Default for NumericInput {
    fn default() -> Self {
        NumericInput::Number(0.0)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<u32> for NumericInput {
    fn from(value: u32) -> Self {
        NumericInput::Number(f64::from(value))
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        NumericInput::Text(value)
    }
}

/// Exact: the decimal is carried as its canonical text.
impl From<Decimal> for NumericInput {
    fn from(value: Decimal) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl From<Money> for NumericInput {
    fn from(value: Money) -> Self {
        NumericInput::from(value.amount())
    }
}

impl From<Percent> for NumericInput {
    fn from(value: Percent) -> Self {
        NumericInput::from(value.value())
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage guaranteed to lie in `[0, 100]`.
///
/// `8` means 8%. Construct with [`Percent::clamped`] when the value comes from
/// a user (a slider dragged past 100 must not crash anything), or
/// [`Percent::new`] when out-of-range means a programming error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(#[ts(type = "string")] Decimal);

impl Percent {
    /// 0%.
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// 100%.
    pub const HUNDRED: Percent = Percent(Decimal::ONE_HUNDRED);

    /// Returns `None` when `value` is outside `[0, 100]`.
    pub fn new(value: Decimal) -> Option<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            None
        } else {
            Some(Percent(value))
        }
    }

    /// Clamps `value` into `[0, 100]`. The flag is true when clamping changed
    /// the value.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::types::Percent;
    ///
    /// let (pct, clamped) = Percent::clamped(Decimal::from(150));
    /// assert_eq!(pct, Percent::HUNDRED);
    /// assert!(clamped);
    /// ```
    pub fn clamped(value: Decimal) -> (Self, bool) {
        let bounded = value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        (Percent(bounded), bounded != value)
    }

    /// Returns the percentage, e.g. `8` for 8%.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the multiplier, e.g. `0.08` for 8%.
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Percent::new(value).ok_or_else(|| CoreError::PercentOutOfRange { value })
    }
}

impl From<Percent> for Decimal {
    fn from(percent: Percent) -> Self {
        percent.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// The pre-resolved pair a catalog lookup returns for a product.
///
/// The core never looks a product up itself; the host resolves the product
/// and hands over its price and tax rate when a row is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    pub unit_price: Money,
    pub tax_percent: Percent,
}

impl CatalogEntry {
    pub fn new(unit_price: Money, tax_percent: Percent) -> Self {
        CatalogEntry {
            unit_price,
            tax_percent,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_new_bounds() {
        assert_eq!(Percent::new(dec!(0)), Some(Percent::ZERO));
        assert_eq!(Percent::new(dec!(100)), Some(Percent::HUNDRED));
        assert!(Percent::new(dec!(100.01)).is_none());
        assert!(Percent::new(dec!(-1)).is_none());
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(Percent::clamped(dec!(-5)), (Percent::ZERO, true));
        assert_eq!(Percent::clamped(dec!(150)), (Percent::HUNDRED, true));

        let (pct, clamped) = Percent::clamped(dec!(8.25));
        assert_eq!(pct.value(), dec!(8.25));
        assert!(!clamped);
    }

    #[test]
    fn test_percent_fraction() {
        let (pct, _) = Percent::clamped(dec!(8));
        assert_eq!(pct.fraction(), dec!(0.08));
    }

    #[test]
    fn test_percent_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Percent>("\"12.5\"").is_ok());
        assert!(serde_json::from_str::<Percent>("\"120\"").is_err());
    }

    #[test]
    fn test_numeric_input_untagged() {
        let n: NumericInput = serde_json::from_str("2").unwrap();
        assert_eq!(n, NumericInput::Number(2.0));

        let t: NumericInput = serde_json::from_str("\"\"").unwrap();
        assert!(t.is_blank());

        let t: NumericInput = serde_json::from_str("\"2.50\"").unwrap();
        assert_eq!(t, NumericInput::Text("2.50".to_string()));
    }

    #[test]
    fn test_numeric_input_from_decimal_is_exact() {
        assert_eq!(
            NumericInput::from(dec!(0.10)),
            NumericInput::Text("0.10".to_string())
        );
    }
}
