//! # Order Aggregation
//!
//! Folds recalculated lines and the order-level adjustments into one totals
//! snapshot.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lines: [LineItem]                                                      │
//! │     │                                                                   │
//! │     ├── unpriced line? ──► excluded_lines, has_warnings = true          │
//! │     │                                                                   │
//! │     ▼  left-to-right fold, no rounding                                  │
//! │  sub_total   = Σ unit_price × quantity      (gross of line adjustments) │
//! │  lines_total = Σ line_total                 (what the line table shows) │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  order_discount_amount = sub_total × discount/100                       │
//! │  order_tax_amount      = (sub_total − discount_amount) × tax/100        │
//! │  grand_total           = sub_total − discount + tax + shipping          │
//! │     │                                                                   │
//! │     ▼  round each final field once                                      │
//! │  OrderTotals                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `sub_total` deliberately ignores per-line discount and tax; those live in
//! each line's own `line_total` and are summed separately into
//! `lines_total`.
//!
//! ## Example
//! ```rust
//! use tally_core::line::{recalculate_line, LineInput};
//! use tally_core::money::Money;
//! use tally_core::order::aggregate_order;
//!
//! let lines = vec![
//!     recalculate_line(&LineInput::new(50.0, 1u32, 0u32, 0u32)),
//!     recalculate_line(&LineInput::new(30.0, 3u32, 0u32, 0u32)),
//! ];
//! let totals = aggregate_order(&lines, 10.0, 8.0, 0.0);
//!
//! assert_eq!(totals.sub_total, Money::from_cents(14000));
//! assert_eq!(totals.order_discount_amount, Money::from_cents(1400));
//! assert_eq!(totals.order_tax_amount, Money::from_cents(1008));
//! assert_eq!(totals.grand_total, Money::from_cents(13608));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{Field, InputIssue};
use crate::line::{recalculate_line_reported, LineInput, LineItem, LineReport};
use crate::money::Money;
use crate::policy::PricingPolicy;
use crate::types::{NumericInput, Percent};
use crate::validation::{coerce_amount, coerce_percent};

// =============================================================================
// Order Input
// =============================================================================

/// An order as the host form holds it: raw rows plus raw order-level fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderInput {
    #[serde(default)]
    pub lines: Vec<LineInput>,
    #[serde(default)]
    pub discount_percent: NumericInput,
    #[serde(default)]
    pub tax_percent: NumericInput,
    #[serde(default)]
    pub shipping_fee: NumericInput,
}

impl OrderInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: LineInput) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_adjustments(
        mut self,
        discount_percent: impl Into<NumericInput>,
        tax_percent: impl Into<NumericInput>,
        shipping_fee: impl Into<NumericInput>,
    ) -> Self {
        self.discount_percent = discount_percent.into();
        self.tax_percent = tax_percent.into();
        self.shipping_fee = shipping_fee.into();
        self
    }

    /// Recalculates every line, then aggregates, under the default policy.
    pub fn totals(&self) -> OrderTotals {
        self.evaluate(&PricingPolicy::default()).totals
    }

    /// Recalculates every line, then aggregates, under `policy`.
    pub fn evaluate(&self, policy: &PricingPolicy) -> OrderEvaluation {
        let lines: Vec<LineReport> = self
            .lines
            .iter()
            .map(|line| recalculate_line_reported(line, policy))
            .collect();

        let items: Vec<LineItem> = lines.iter().map(|report| report.line.clone()).collect();
        let totals = aggregate_order_with(
            &items,
            self.discount_percent.clone(),
            self.tax_percent.clone(),
            self.shipping_fee.clone(),
            policy,
        );

        OrderEvaluation { lines, totals }
    }
}

/// Every line's report plus the order totals, from one recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct OrderEvaluation {
    pub lines: Vec<LineReport>,
    pub totals: OrderTotals,
}

// =============================================================================
// Order Totals
// =============================================================================

/// The derived totals of an order. A fresh value on every recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    /// Σ `unit_price × quantity` over included lines.
    pub sub_total: Money,
    pub order_discount_amount: Money,
    pub order_tax_amount: Money,
    /// The coerced shipping fee that went into `grand_total`.
    pub shipping_fee: Money,
    pub grand_total: Money,

    /// Σ `line_total` over included lines (net of line discount, with line tax).
    pub lines_total: Money,
    /// Number of included lines.
    pub item_count: usize,
    /// Σ quantity over included lines.
    #[ts(type = "number")]
    pub total_quantity: u64,

    /// True when a line was excluded or the totals could not be computed.
    pub has_warnings: bool,
    /// Positions (in the input slice) of lines left out of the totals.
    pub excluded_lines: Vec<usize>,
    /// Coercions applied to the order-level fields.
    pub issues: Vec<InputIssue>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Aggregates recalculated lines under the default [`PricingPolicy`].
///
/// Never panics, never fails: unpriceable lines are excluded and flagged.
pub fn aggregate_order(
    lines: &[LineItem],
    discount_percent: impl Into<NumericInput>,
    tax_percent: impl Into<NumericInput>,
    shipping_fee: impl Into<NumericInput>,
) -> OrderTotals {
    aggregate_order_with(
        lines,
        discount_percent,
        tax_percent,
        shipping_fee,
        &PricingPolicy::default(),
    )
}

/// Aggregates recalculated lines under `policy`.
pub fn aggregate_order_with(
    lines: &[LineItem],
    discount_percent: impl Into<NumericInput>,
    tax_percent: impl Into<NumericInput>,
    shipping_fee: impl Into<NumericInput>,
    policy: &PricingPolicy,
) -> OrderTotals {
    let mut issues = Vec::new();
    let discount_percent = coerce_percent(&discount_percent.into(), Field::OrderDiscountPercent)
        .record(&mut issues);
    let tax_percent =
        coerce_percent(&tax_percent.into(), Field::OrderTaxPercent).record(&mut issues);
    let shipping_fee = coerce_amount(&shipping_fee.into(), Field::ShippingFee, policy.max_amount)
        .record(&mut issues);

    let sums = sum_lines(lines);
    if !sums.excluded_lines.is_empty() {
        warn!(
            excluded = sums.excluded_lines.len(),
            total = lines.len(),
            "Excluded unpriceable lines from order totals"
        );
    }

    let adjusted = apply_adjustments(sums.sub_total, discount_percent, tax_percent, shipping_fee);
    if adjusted.is_none() {
        warn!(sub_total = %sums.sub_total, "Order adjustments overflowed, totals zeroed");
    }
    let (order_discount_amount, order_tax_amount, grand_total) =
        adjusted.unwrap_or((Money::ZERO, Money::ZERO, Money::ZERO));

    let totals = OrderTotals {
        sub_total: policy.round(sums.sub_total),
        order_discount_amount: policy.round(order_discount_amount),
        order_tax_amount: policy.round(order_tax_amount),
        shipping_fee: policy.round(shipping_fee),
        grand_total: policy.round(grand_total),
        lines_total: policy.round(sums.lines_total),
        item_count: sums.item_count,
        total_quantity: sums.total_quantity,
        has_warnings: adjusted.is_none() || !sums.excluded_lines.is_empty(),
        excluded_lines: sums.excluded_lines,
        issues,
    };

    debug!(
        items = totals.item_count,
        sub_total = %totals.sub_total,
        grand_total = %totals.grand_total,
        "Order totals recomputed"
    );

    totals
}

struct LineSums {
    sub_total: Money,
    lines_total: Money,
    item_count: usize,
    total_quantity: u64,
    excluded_lines: Vec<usize>,
}

/// Stable left-to-right fold over the lines. A line whose amounts are missing,
/// or whose addition would overflow, is skipped and its index recorded.
fn sum_lines(lines: &[LineItem]) -> LineSums {
    let mut sums = LineSums {
        sub_total: Money::ZERO,
        lines_total: Money::ZERO,
        item_count: 0,
        total_quantity: 0,
        excluded_lines: Vec::new(),
    };

    for (index, line) in lines.iter().enumerate() {
        let next = line.amounts().and_then(|amounts| {
            Some((
                sums.sub_total.checked_add(amounts.gross_amount)?,
                sums.lines_total.checked_add(amounts.line_total)?,
            ))
        });

        match next {
            Some((sub_total, lines_total)) => {
                sums.sub_total = sub_total;
                sums.lines_total = lines_total;
                sums.item_count += 1;
                sums.total_quantity += u64::from(line.quantity());
            }
            None => sums.excluded_lines.push(index),
        }
    }

    sums
}

/// Returns `(discount_amount, tax_amount, grand_total)`, all unrounded.
fn apply_adjustments(
    sub_total: Money,
    discount_percent: Percent,
    tax_percent: Percent,
    shipping_fee: Money,
) -> Option<(Money, Money, Money)> {
    let discount_amount = sub_total.percent_of(discount_percent)?;
    let net = sub_total.checked_sub(discount_amount)?;
    let tax_amount = net.percent_of(tax_percent)?;
    let grand_total = net.checked_add(tax_amount)?.checked_add(shipping_fee)?;
    Some((discount_amount, tax_amount, grand_total))
}

// =============================================================================
// Unit Tests
// =============================================================================
