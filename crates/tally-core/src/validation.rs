//! # Validation Module
//!
//! Turns raw form values into in-domain numbers.
//!
//! ## Coercion Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Values Get Checked                           │
//! │                                                                         │
//! │  Layer 1: Screen (host UI)                                             │
//! │  ├── Whatever the user typed, including "", "abc", "-3"                │
//! │  └── Optional inline hints, driven by the issues we report             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Parse: NumericInput → Decimal (NaN/∞/garbage → safe default)      │
//! │  ├── Overflow: finite but past Decimal range → nearest bound           │
//! │  ├── Bound: clamp percents, floor amounts at 0, quantity at 1          │
//! │  └── Report: one InputIssue per coerced field                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: line / order math                                            │
//! │  └── Only ever sees in-domain Money, Percent, u32                      │
//! │                                                                         │
//! │  Nothing here fails: every raw value has a defined coercion.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::error::{Field, InputIssue};
//! use tally_core::types::NumericInput;
//! use tally_core::validation::coerce_quantity;
//!
//! let qty = coerce_quantity(&NumericInput::from(""), Field::Quantity, 999);
//! assert_eq!(qty.value, 1);
//! assert_eq!(qty.issue, Some(InputIssue::InvalidNumericInput { field: Field::Quantity }));
//! ```

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Field, InputIssue};
use crate::money::Money;
use crate::types::{NumericInput, Percent};

// =============================================================================
// Coerced Value
// =============================================================================

/// A value that is guaranteed in-domain, plus the issue (if any) that had to
/// be fixed to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coerced<T> {
    pub value: T,
    pub issue: Option<InputIssue>,
}

impl<T> Coerced<T> {
    fn clean(value: T) -> Self {
        Coerced { value, issue: None }
    }

    fn fixed(value: T, issue: InputIssue) -> Self {
        debug!(field = %issue.field(), %issue, "Coerced raw input");
        Coerced {
            value,
            issue: Some(issue),
        }
    }

    /// Pushes the issue (if any) onto `issues` and returns the value.
    pub fn record(self, issues: &mut Vec<InputIssue>) -> T {
        issues.extend(self.issue);
        self.value
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Outcome of parsing a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDecimal {
    Value(Decimal),
    /// A finite number too large in magnitude for `Decimal`.
    Overflow { negative: bool },
    /// Blank, non-numeric, NaN or infinite.
    NotANumber,
}

/// Parses a raw value into an exact decimal.
///
/// ## Rules
/// - Numbers must be finite
/// - Text is trimmed; blank text is not a number
/// - Plain (`"12.50"`) and scientific (`"1.2e3"`) notation are accepted
/// - Finite values beyond the decimal range report their sign as
///   [`ParsedDecimal::Overflow`]; values too small to represent become 0
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::types::NumericInput;
/// use tally_core::validation::{parse_decimal, ParsedDecimal};
///
/// assert_eq!(
///     parse_decimal(&NumericInput::from(" 12.50 ")),
///     ParsedDecimal::Value(Decimal::new(1250, 2))
/// );
/// assert_eq!(
///     parse_decimal(&NumericInput::from("-1e30")),
///     ParsedDecimal::Overflow { negative: true }
/// );
/// assert_eq!(parse_decimal(&NumericInput::from(f64::NAN)), ParsedDecimal::NotANumber);
/// assert_eq!(parse_decimal(&NumericInput::from("twelve")), ParsedDecimal::NotANumber);
/// ```
pub fn parse_decimal(raw: &NumericInput) -> ParsedDecimal {
    match raw {
        NumericInput::Number(value) => from_finite_f64(*value),
        NumericInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return ParsedDecimal::NotANumber;
            }
            if let Ok(value) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
                return ParsedDecimal::Value(value);
            }
            parse_out_of_range_text(text)
        }
    }
}

fn from_finite_f64(value: f64) -> ParsedDecimal {
    if !value.is_finite() {
        return ParsedDecimal::NotANumber;
    }
    match Decimal::from_f64(value) {
        Some(decimal) => ParsedDecimal::Value(decimal),
        None if value.abs() < 1.0 => ParsedDecimal::Value(Decimal::ZERO),
        None => ParsedDecimal::Overflow {
            negative: value < 0.0,
        },
    }
}

/// Numeric text the decimal parsers rejected, e.g. `"1e30"` or `"1e-40"`.
fn parse_out_of_range_text(text: &str) -> ParsedDecimal {
    let lower = text.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return ParsedDecimal::NotANumber;
    }

    match lower.parse::<f64>() {
        // "1e400" parses to infinity but was written as a finite number.
        Ok(value) if value.is_infinite() => ParsedDecimal::Overflow {
            negative: value < 0.0,
        },
        Ok(value) => from_finite_f64(value),
        Err(_) => ParsedDecimal::NotANumber,
    }
}

// =============================================================================
// Coercions
// =============================================================================

/// Coerces a monetary amount (unit price, shipping fee).
///
/// ## Rules
/// - Not a number → 0
/// - Negative (however large) → 0
/// - Above `max` (however large) → `max`
pub fn coerce_amount(raw: &NumericInput, field: Field, max: Money) -> Coerced<Money> {
    let value = match parse_decimal(raw) {
        ParsedDecimal::Value(value) => value,
        ParsedDecimal::Overflow { negative: true } => {
            return Coerced::fixed(Money::ZERO, InputIssue::NegativeQuantityOrPrice { field })
        }
        ParsedDecimal::Overflow { negative: false } => {
            return Coerced::fixed(max, InputIssue::AboveMaximum { field })
        }
        ParsedDecimal::NotANumber => {
            return Coerced::fixed(Money::ZERO, InputIssue::InvalidNumericInput { field })
        }
    };

    let value = Money::new(value);
    if value.is_negative() {
        return Coerced::fixed(Money::ZERO, InputIssue::NegativeQuantityOrPrice { field });
    }

    if value > max {
        return Coerced::fixed(max, InputIssue::AboveMaximum { field });
    }

    Coerced::clean(value)
}

/// Coerces a percent (line or order discount/tax).
///
/// ## Rules
/// - Not a number → 0
/// - Outside `[0, 100]` → nearest bound
pub fn coerce_percent(raw: &NumericInput, field: Field) -> Coerced<Percent> {
    let value = match parse_decimal(raw) {
        ParsedDecimal::Value(value) => value,
        ParsedDecimal::Overflow { negative } => {
            let bound = if negative { Percent::ZERO } else { Percent::HUNDRED };
            return Coerced::fixed(bound, InputIssue::OutOfRangePercent { field });
        }
        ParsedDecimal::NotANumber => {
            return Coerced::fixed(Percent::ZERO, InputIssue::InvalidNumericInput { field })
        }
    };

    match Percent::clamped(value) {
        (percent, true) => Coerced::fixed(percent, InputIssue::OutOfRangePercent { field }),
        (percent, false) => Coerced::clean(percent),
    }
}

/// Coerces a quantity.
///
/// ## Rules
/// - Not a number → 1
/// - Below 1 (including 0 and anything negative) → 1
/// - Above `max` → `max`
/// - Fractional → truncated toward zero (`2.7` → `2`)
///
/// ## User Workflow
/// ```text
/// User clears the quantity box: ""
///      │
///      ▼
/// coerce_quantity("") ← THIS FUNCTION
///      │
///      ▼
/// value 1, InvalidNumericInput { quantity }
///      │
///      ▼
/// Line still priced at qty 1, UI shows "invalid quantity"
/// ```
pub fn coerce_quantity(raw: &NumericInput, field: Field, max: u32) -> Coerced<u32> {
    let value = match parse_decimal(raw) {
        ParsedDecimal::Value(value) => value,
        ParsedDecimal::Overflow { negative: true } => {
            return Coerced::fixed(1, InputIssue::NegativeQuantityOrPrice { field })
        }
        ParsedDecimal::Overflow { negative: false } => {
            return Coerced::fixed(max, InputIssue::AboveMaximum { field })
        }
        ParsedDecimal::NotANumber => {
            return Coerced::fixed(1, InputIssue::InvalidNumericInput { field })
        }
    };

    if value < Decimal::ONE {
        return Coerced::fixed(1, InputIssue::NegativeQuantityOrPrice { field });
    }

    if value > Decimal::from(max) {
        return Coerced::fixed(max, InputIssue::AboveMaximum { field });
    }

    // In [1, max] here, so the conversion cannot fail.
    let whole = value.trunc().to_u32().unwrap_or(1);
    if value.fract().is_zero() {
        Coerced::clean(whole)
    } else {
        Coerced::fixed(whole, InputIssue::FractionalQuantity { field })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
