//! # Line Recalculation
//!
//! Prices one line: unit price × quantity, less the line discount, plus the
//! line tax.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineInput (raw)                                                        │
//! │    unit_price  quantity  discount_percent  tax_percent                  │
//! │        │          │             │               │                       │
//! │        ▼          ▼             ▼               ▼                       │
//! │   coerce_amount coerce_qty coerce_percent  coerce_percent               │
//! │        │          │             │               │                       │
//! │        └────┬─────┘             │               │                       │
//! │             ▼                   │               │                       │
//! │   gross = price × qty           │               │                       │
//! │             │                   │               │                       │
//! │             ▼                   ▼               │                       │
//! │   taxable = gross × (1 − discount/100)  (NOT rounded)                   │
//! │             │                                   │                       │
//! │             ▼                                   ▼                       │
//! │   tax_amount = round(taxable × tax/100)                                 │
//! │             │                                                           │
//! │             ▼                                                           │
//! │   line_total = round(taxable + tax_amount)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use tally_core::line::{recalculate_line, LineInput};
//! use tally_core::money::Money;
//!
//! let line = recalculate_line(&LineInput::new(100.0, 2u32, 10.0, 5.0));
//! assert_eq!(line.taxable_amount(), Money::from_cents(18000));
//! assert_eq!(line.tax_amount(), Money::from_cents(900));
//! assert_eq!(line.line_total(), Money::from_cents(18900));
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::{Field, InputIssue, LineFailure};
use crate::money::Money;
use crate::policy::PricingPolicy;
use crate::types::{CatalogEntry, NumericInput, Percent};
use crate::validation::{coerce_amount, coerce_percent, coerce_quantity};

// =============================================================================
// Line Input
// =============================================================================

/// One row's raw values, as the screen holds them.
///
/// Missing fields default to the values a freshly added row would have:
/// quantity 1, everything else 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineInput {
    #[serde(default)]
    pub unit_price: NumericInput,
    #[serde(default = "default_quantity")]
    pub quantity: NumericInput,
    #[serde(default)]
    pub discount_percent: NumericInput,
    #[serde(default)]
    pub tax_percent: NumericInput,
}

fn default_quantity() -> NumericInput {
    NumericInput::Number(1.0)
}

impl Default for LineInput {
    fn default() -> Self {
        LineInput {
            unit_price: NumericInput::default(),
            quantity: default_quantity(),
            discount_percent: NumericInput::default(),
            tax_percent: NumericInput::default(),
        }
    }
}

impl LineInput {
    pub fn new(
        unit_price: impl Into<NumericInput>,
        quantity: impl Into<NumericInput>,
        discount_percent: impl Into<NumericInput>,
        tax_percent: impl Into<NumericInput>,
    ) -> Self {
        LineInput {
            unit_price: unit_price.into(),
            quantity: quantity.into(),
            discount_percent: discount_percent.into(),
            tax_percent: tax_percent.into(),
        }
    }

    /// A freshly added row: catalog price and tax, quantity 1, no discount.
    pub fn from_catalog(entry: &CatalogEntry) -> Self {
        LineInput {
            unit_price: entry.unit_price.into(),
            quantity: default_quantity(),
            discount_percent: NumericInput::default(),
            tax_percent: entry.tax_percent.into(),
        }
    }
}

// =============================================================================
// Line Amounts
// =============================================================================

/// The derived monetary fields of a priced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct LineAmounts {
    /// `unit_price × quantity`, exact.
    pub gross_amount: Money,
    /// `gross_amount − taxable_amount`, exact.
    pub discount_amount: Money,
    /// After the line discount, before tax. Never rounded.
    pub taxable_amount: Money,
    /// Rounded.
    pub tax_amount: Money,
    /// Rounded.
    pub line_total: Money,
}

// =============================================================================
// Line Item
// =============================================================================

/// A line after recalculation: coerced inputs plus derived amounts.
///
/// Derived amounts can only be produced by [`recalculate_line`] and friends,
/// so they never drift from the inputs they were computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct LineItem {
    unit_price: Money,
    quantity: u32,
    discount_percent: Percent,
    tax_percent: Percent,
    /// `None` when the line could not be priced (see [`LineFailure`]).
    amounts: Option<LineAmounts>,
}

impl LineItem {
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn discount_percent(&self) -> Percent {
        self.discount_percent
    }

    pub fn tax_percent(&self) -> Percent {
        self.tax_percent
    }

    /// The derived amounts, or `None` if the line failed to price.
    pub fn amounts(&self) -> Option<&LineAmounts> {
        self.amounts.as_ref()
    }

    pub fn is_priced(&self) -> bool {
        self.amounts.is_some()
    }

    pub fn failure(&self) -> Option<LineFailure> {
        match self.amounts {
            Some(_) => None,
            None => Some(LineFailure::Overflow),
        }
    }

    /// `unit_price × quantity`; zero for an unpriced line.
    pub fn gross_amount(&self) -> Money {
        self.amounts.map_or(Money::ZERO, |a| a.gross_amount)
    }

    pub fn discount_amount(&self) -> Money {
        self.amounts.map_or(Money::ZERO, |a| a.discount_amount)
    }

    pub fn taxable_amount(&self) -> Money {
        self.amounts.map_or(Money::ZERO, |a| a.taxable_amount)
    }

    pub fn tax_amount(&self) -> Money {
        self.amounts.map_or(Money::ZERO, |a| a.tax_amount)
    }

    pub fn line_total(&self) -> Money {
        self.amounts.map_or(Money::ZERO, |a| a.line_total)
    }

    /// The coerced inputs as a `LineInput`, for feeding back into
    /// [`recalculate_line`]. Derived fields are not part of it.
    pub fn input(&self) -> LineInput {
        LineInput {
            unit_price: self.unit_price.into(),
            quantity: self.quantity.into(),
            discount_percent: self.discount_percent.into(),
            tax_percent: self.tax_percent.into(),
        }
    }
}

/// A recalculated line together with the coercions applied to its raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct LineReport {
    pub line: LineItem,
    pub issues: Vec<InputIssue>,
}

// =============================================================================
// Recalculation
// =============================================================================

/// Recalculates a line under the default [`PricingPolicy`].
pub fn recalculate_line(input: &LineInput) -> LineItem {
    recalculate_line_with(input, &PricingPolicy::default())
}

/// Recalculates a line under `policy`.
pub fn recalculate_line_with(input: &LineInput, policy: &PricingPolicy) -> LineItem {
    recalculate_line_reported(input, policy).line
}

/// Recalculates a line and reports every coercion applied to `input`.
///
/// ## Example
/// ```rust
/// use tally_core::error::{Field, InputIssue};
/// use tally_core::line::{recalculate_line_reported, LineInput};
/// use tally_core::money::Money;
/// use tally_core::policy::PricingPolicy;
///
/// let input = LineInput::new(-10.0, "", 150.0, 5.0);
/// let report = recalculate_line_reported(&input, &PricingPolicy::default());
///
/// assert_eq!(report.line.quantity(), 1);
/// assert_eq!(report.line.line_total(), Money::ZERO);
/// assert_eq!(report.issues.len(), 3);
/// assert!(report.issues.contains(&InputIssue::OutOfRangePercent {
///     field: Field::DiscountPercent
/// }));
/// ```
pub fn recalculate_line_reported(input: &LineInput, policy: &PricingPolicy) -> LineReport {
    let mut issues = Vec::new();

    let unit_price = coerce_amount(&input.unit_price, Field::UnitPrice, policy.max_amount)
        .record(&mut issues);
    let quantity =
        coerce_quantity(&input.quantity, Field::Quantity, policy.max_quantity).record(&mut issues);
    let discount_percent =
        coerce_percent(&input.discount_percent, Field::DiscountPercent).record(&mut issues);
    let tax_percent = coerce_percent(&input.tax_percent, Field::TaxPercent).record(&mut issues);

    let amounts = price(unit_price, quantity, discount_percent, tax_percent, policy);
    if amounts.is_none() {
        warn!(%unit_price, quantity, "Line amounts overflowed, line left unpriced");
    }

    LineReport {
        line: LineItem {
            unit_price,
            quantity,
            discount_percent,
            tax_percent,
            amounts,
        },
        issues,
    }
}

fn price(
    unit_price: Money,
    quantity: u32,
    discount_percent: Percent,
    tax_percent: Percent,
    policy: &PricingPolicy,
) -> Option<LineAmounts> {
    let gross_amount = unit_price.checked_mul_quantity(quantity)?;
    let taxable_amount = gross_amount.less_percent(discount_percent)?;
    let discount_amount = gross_amount.checked_sub(taxable_amount)?;

    let tax_amount = policy.round(taxable_amount.percent_of(tax_percent)?);
    let line_total = policy.round(taxable_amount.checked_add(tax_amount)?);

    Some(LineAmounts {
        gross_amount,
        discount_amount,
        taxable_amount,
        tax_amount,
        line_total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(value: Decimal) -> Money {
        Money::new(value)
    }

    #[test]
    fn test_basic_line() {
        let line = recalculate_line(&LineInput::new(100.0, 2u32, 10.0, 5.0));

        assert_eq!(line.gross_amount(), money(dec!(200)));
        assert_eq!(line.discount_amount(), money(dec!(20)));
        assert_eq!(line.taxable_amount(), money(dec!(180.00)));
        assert_eq!(line.tax_amount(), money(dec!(9.00)));
        assert_eq!(line.line_total(), money(dec!(189.00)));
        assert_eq!(line.line_total().to_string(), "189.00");
    }

    #[test]
    fn test_inputs_pass_through() {
        let line = recalculate_line(&LineInput::new("12.34", 3u32, "2.5", "8.25"));

        assert_eq!(line.unit_price(), money(dec!(12.34)));
        assert_eq!(line.quantity(), 3);
        assert_eq!(line.discount_percent().value(), dec!(2.5));
        assert_eq!(line.tax_percent().value(), dec!(8.25));
    }

    #[test]
    fn test_taxable_amount_is_not_rounded() {
        // 0.333 × 1 × (1 − 0.10) = 0.2997
        let line = recalculate_line(&LineInput::new("0.333", 1u32, 10.0, 0.0));
        assert_eq!(line.taxable_amount(), money(dec!(0.2997)));
        assert_eq!(line.line_total(), money(dec!(0.30)));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 10.00 × 8.25% = 0.825 → 0.83
        let line = recalculate_line(&LineInput::new(10.0, 1u32, 0.0, 8.25));
        assert_eq!(line.tax_amount(), money(dec!(0.83)));
        assert_eq!(line.line_total(), money(dec!(10.83)));
    }

    #[test]
    fn test_full_discount_zeroes_line() {
        let line = recalculate_line(&LineInput::new(49.99, 7u32, 100.0, 20.0));
        assert!(line.taxable_amount().is_zero());
        assert!(line.tax_amount().is_zero());
        assert!(line.line_total().is_zero());
    }

    #[test]
    fn test_discount_over_hundred_is_clamped() {
        let report = recalculate_line_reported(
            &LineInput::new(100.0, 1u32, 150.0, 5.0),
            &PricingPolicy::default(),
        );
        assert_eq!(report.line.discount_percent(), Percent::HUNDRED);
        assert!(report.line.line_total().is_zero());
        assert_eq!(
            report.issues,
            vec![InputIssue::OutOfRangePercent {
                field: Field::DiscountPercent
            }]
        );
    }

    #[test]
    fn test_huge_inputs_clamp_instead_of_resetting() {
        let policy = PricingPolicy::default();

        for discount in [NumericInput::from(1e20), NumericInput::from(1e30), "1e30".into()] {
            let input = LineInput::new(100.0, 1u32, discount, 0.0);
            let report = recalculate_line_reported(&input, &policy);
            assert_eq!(report.line.discount_percent(), Percent::HUNDRED);
            assert!(report.line.line_total().is_zero());
        }

        let report = recalculate_line_reported(&LineInput::new(2.0, "1e30", 0.0, 0.0), &policy);
        assert_eq!(report.line.quantity(), policy.max_quantity);
        assert_eq!(
            report.issues,
            vec![InputIssue::AboveMaximum {
                field: Field::Quantity
            }]
        );

        let report = recalculate_line_reported(&LineInput::new(-1e30, 3u32, 0.0, 0.0), &policy);
        assert_eq!(report.line.unit_price(), Money::ZERO);
        assert!(report.line.line_total().is_zero());
    }

    #[test]
    fn test_invalid_inputs_are_coerced() {
        let report = recalculate_line_reported(
            &LineInput::new(-25.0, f64::NAN, 0.0, 0.0),
            &PricingPolicy::default(),
        );
        assert_eq!(report.line.unit_price(), Money::ZERO);
        assert_eq!(report.line.quantity(), 1);
        assert!(report.line.is_priced());
        assert_eq!(report.line.line_total(), Money::ZERO);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_from_catalog_defaults() {
        let entry = CatalogEntry::new(money(dec!(4.50)), Percent::clamped(dec!(10)).0);
        let input = LineInput::from_catalog(&entry);
        let line = recalculate_line(&input);

        assert_eq!(line.quantity(), 1);
        assert!(line.discount_percent().is_zero());
        assert_eq!(line.line_total(), money(dec!(4.95)));
    }

    #[test]
    fn test_missing_fields_deserialize_to_row_defaults() {
        let input: LineInput = serde_json::from_str(r#"{"unit_price":"5"}"#).unwrap();
        assert_eq!(input.quantity, NumericInput::Number(1.0));
        assert_eq!(recalculate_line(&input).line_total(), money(dec!(5)));
    }

    #[test]
    fn test_overflow_leaves_line_unpriced() {
        let policy = PricingPolicy {
            max_amount: Money::new(Decimal::MAX),
            max_quantity: u32::MAX,
            ..PricingPolicy::default()
        };
        let input = LineInput::new(Decimal::MAX, 1_000u32, 0.0, 0.0);
        let line = recalculate_line_with(&input, &policy);

        assert!(!line.is_priced());
        assert_eq!(line.failure(), Some(LineFailure::Overflow));
        assert_eq!(line.line_total(), Money::ZERO);
    }

    #[test]
    fn test_idempotent_on_coerced_input() {
        let first = recalculate_line(&LineInput::new("abc", -2.0, 250.0, "7.5"));
        let second = recalculate_line(&first.input());
        assert_eq!(first, second);
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn arb_price() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    fn arb_percent() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000i64).prop_map(|bps| Decimal::new(bps, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: recalculating from a line's own inputs changes nothing.
        #[test]
        fn recalculation_is_idempotent(
            price in arb_price(),
            qty in 1u32..1_000,
            discount in arb_percent(),
            tax in arb_percent(),
        ) {
            let once = recalculate_line(&LineInput::new(price, qty, discount, tax));
            let twice = recalculate_line(&once.input());
            prop_assert_eq!(once, twice);
        }

        /// Property: more quantity never lowers the line total.
        #[test]
        fn line_total_monotonic_in_quantity(
            price in arb_price(),
            qty in 1u32..1_000,
            extra in 1u32..100,
            discount in arb_percent(),
            tax in arb_percent(),
        ) {
            let base = recalculate_line(&LineInput::new(price, qty, discount, tax));
            let more = recalculate_line(&LineInput::new(price, qty + extra, discount, tax));
            prop_assert!(more.line_total() >= base.line_total());
        }

        /// Property: more discount never raises the line total.
        #[test]
        fn line_total_monotonic_in_discount(
            price in arb_price(),
            qty in 1u32..1_000,
            low in arb_percent(),
            high in arb_percent(),
            tax in arb_percent(),
        ) {
            let (low, high) = if low <= high { (low, high) } else { (high, low) };
            let cheap = recalculate_line(&LineInput::new(price, qty, high, tax));
            let dear = recalculate_line(&LineInput::new(price, qty, low, tax));
            prop_assert!(cheap.line_total() <= dear.line_total());
        }

        /// Property: no discount and no tax means the line total is the gross.
        #[test]
        fn untaxed_undiscounted_total_is_gross(price in arb_price(), qty in 1u32..1_000) {
            let line = recalculate_line(&LineInput::new(price, qty, 0u32, 0u32));
            prop_assert_eq!(line.line_total().amount(), price * Decimal::from(qty));
        }

        /// Property: whatever the raw numbers, the line total is finite and >= 0.
        #[test]
        fn any_raw_numbers_price_to_non_negative_total(
            price in proptest::num::f64::ANY,
            qty in proptest::num::f64::ANY,
            discount in proptest::num::f64::ANY,
            tax in proptest::num::f64::ANY,
        ) {
            let line = recalculate_line(&LineInput::new(price, qty, discount, tax));
            prop_assert!(line.is_priced());
            prop_assert!(!line.line_total().is_negative());
        }
    }
}
