//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core (this file)                                                │
//! │  ├── InputIssue   - A raw value was coerced (reported, never thrown)   │
//! │  ├── LineFailure  - A line could not be priced (excluded from totals)  │
//! │  └── CoreError    - Invalid policy or stored percent                   │
//! │                                                                         │
//! │  tally-forms errors (separate crate)                                   │
//! │  └── FormsError   - Config I/O, unknown rows                           │
//! │                                                                         │
//! │  Pricing functions NEVER return Err: every raw value has a safe        │
//! │  coercion, and unpriceable lines are dropped with a warning flag.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Field
// =============================================================================

/// The numeric form field an issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    UnitPrice,
    Quantity,
    DiscountPercent,
    TaxPercent,
    OrderDiscountPercent,
    OrderTaxPercent,
    ShippingFee,
}

impl Field {
    /// Returns the snake_case name used in payloads and messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::UnitPrice => "unit_price",
            Field::Quantity => "quantity",
            Field::DiscountPercent => "discount_percent",
            Field::TaxPercent => "tax_percent",
            Field::OrderDiscountPercent => "order_discount_percent",
            Field::OrderTaxPercent => "order_tax_percent",
            Field::ShippingFee => "shipping_fee",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Input Issue
// =============================================================================

/// A recoverable problem found in a raw input value.
///
/// Issues are attached to the computed [`LineItem`](crate::line::LineItem) or
/// [`OrderTotals`](crate::order::OrderTotals) so the host UI can explain why a
/// displayed value differs from what the user typed.
///
/// ## Coercion Table
/// ```text
/// ┌──────────────────────────┬──────────────┬────────────────────────────┐
/// │ Issue                    │ Fields       │ Coerced to                 │
/// ├──────────────────────────┼──────────────┼────────────────────────────┤
/// │ InvalidNumericInput      │ any          │ quantity 1, others 0       │
/// │ OutOfRangePercent        │ percents     │ nearest of 0 / 100         │
/// │ NegativeQuantityOrPrice  │ amounts, qty │ amounts 0, quantity 1      │
/// │ FractionalQuantity       │ quantity     │ truncated toward zero      │
/// │ AboveMaximum             │ amounts, qty │ policy maximum             │
/// └──────────────────────────┴──────────────┴────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputIssue {
    /// Empty, non-numeric, NaN or infinite.
    #[error("{field} is not a valid number")]
    InvalidNumericInput { field: Field },

    /// Percent outside `[0, 100]`.
    #[error("{field} must be between 0 and 100")]
    OutOfRangePercent { field: Field },

    /// Negative amount, or quantity below 1.
    #[error("{field} is below its minimum")]
    NegativeQuantityOrPrice { field: Field },

    #[error("{field} must be a whole number")]
    FractionalQuantity { field: Field },

    #[error("{field} exceeds the allowed maximum")]
    AboveMaximum { field: Field },
}

impl InputIssue {
    /// Returns the field this issue refers to.
    pub const fn field(&self) -> Field {
        match self {
            InputIssue::InvalidNumericInput { field }
            | InputIssue::OutOfRangePercent { field }
            | InputIssue::NegativeQuantityOrPrice { field }
            | InputIssue::FractionalQuantity { field }
            | InputIssue::AboveMaximum { field } => *field,
        }
    }
}

// =============================================================================
// Line Failure
// =============================================================================

/// A line that could not produce a finite total even after coercion.
///
/// With the policy caps in place this only happens for pathological policies
/// (e.g. an enormous `max_amount`), but the aggregator still has to cope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineFailure {
    #[error("line amount overflowed the decimal range")]
    Overflow,
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors from the fallible parts of the core API.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A pricing policy failed validation.
    #[error("Invalid pricing policy: {reason}")]
    InvalidPolicy { reason: String },

    /// A stored percent (e.g. in a config file) is outside `[0, 100]`.
    #[error("Percent {value} is outside 0..=100")]
    PercentOutOfRange { value: Decimal },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_messages() {
        let issue = InputIssue::InvalidNumericInput {
            field: Field::Quantity,
        };
        assert_eq!(issue.to_string(), "quantity is not a valid number");

        let issue = InputIssue::OutOfRangePercent {
            field: Field::OrderTaxPercent,
        };
        assert_eq!(issue.to_string(), "order_tax_percent must be between 0 and 100");
    }

    #[test]
    fn test_issue_field() {
        let issue = InputIssue::AboveMaximum {
            field: Field::ShippingFee,
        };
        assert_eq!(issue.field(), Field::ShippingFee);
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let issue = InputIssue::NegativeQuantityOrPrice {
            field: Field::UnitPrice,
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert_eq!(json, r#"{"kind":"negative_quantity_or_price","field":"unit_price"}"#);
    }

    #[test]
    fn test_policy_error_message() {
        let err = CoreError::InvalidPolicy {
            reason: "max_quantity must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid pricing policy: max_quantity must be at least 1"
        );
    }
}
