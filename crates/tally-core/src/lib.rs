//! # tally-core: Pure Pricing Logic for Tally
//!
//! This crate is the **heart** of Tally. It prices order lines and aggregates
//! orders as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin Screens (web UI)                       │   │
//! │  │    Quotation ──► Sale Entry ──► Stock Adjustment               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw form values                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-forms (adapters)                       │   │
//! │  │    QuotationForm, SaleEntryForm, StockAdjustmentForm           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ validation│  │   line    │  │   order   │  │   money   │  │   │
//! │  │   │  coerce   │─►│ Recalc-   │─►│ Aggre-    │  │   Money   │  │   │
//! │  │   │  clamp    │  │ ulator    │  │ gator     │  │  rounding │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO PERSISTENCE • NO CATALOG • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Raw numeric input, `Percent`, `CatalogEntry`
//! - [`money`] - Decimal `Money` type and rounding modes
//! - [`validation`] - Coercion of raw values into the valid domain
//! - [`line`] - LineRecalculator
//! - [`order`] - OrderAggregator
//! - [`policy`] - Rounding and bounding policy
//! - [`error`] - Input issues and error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, inputs never mutated
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Decimal Money**: exact base-10 arithmetic, rounded once per shown field
//! 4. **Total Functions**: pricing never fails; bad input is coerced and reported
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{aggregate_order, recalculate_line, LineInput, Money};
//!
//! let line = recalculate_line(&LineInput::new(100.0, 2u32, 10.0, 5.0));
//! assert_eq!(line.line_total(), Money::from_cents(18900));
//!
//! let totals = aggregate_order(&[line], 0u32, 0u32, 20u32);
//! assert_eq!(totals.sub_total, Money::from_cents(20000));
//! assert_eq!(totals.grand_total, Money::from_cents(22000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod line;
pub mod money;
pub mod order;
pub mod policy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, Field, InputIssue, LineFailure};
pub use line::{
    recalculate_line, recalculate_line_reported, recalculate_line_with, LineAmounts, LineInput,
    LineItem, LineReport,
};
pub use money::{Money, RoundingMode};
pub use order::{aggregate_order, aggregate_order_with, OrderEvaluation, OrderInput, OrderTotals};
pub use policy::PricingPolicy;
pub use types::{CatalogEntry, NumericInput, Percent};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Places monetary derived values are rounded to by default.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Upper bound accepted by [`PricingPolicy::validate`] for `decimal_places`.
pub const MAX_DECIMAL_PLACES: u32 = 6;

/// Default quantity cap for a single line.
///
/// ## Business Reason
/// Catches a mistyped quantity (an extra row of zeros) without rejecting the
/// row. Large enough for wholesale stock adjustments.
pub const DEFAULT_MAX_QUANTITY: u32 = 1_000_000;

/// Default cap for a unit price or shipping fee, in major units.
///
/// With [`DEFAULT_MAX_QUANTITY`] this keeps any single line far inside the
/// decimal range, so default-policy lines always price.
pub const DEFAULT_MAX_AMOUNT: i64 = 1_000_000_000_000;
