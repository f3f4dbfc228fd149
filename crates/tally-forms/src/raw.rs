//! Raw text fields as the screens hold them.
//!
//! Nothing here parses. Text goes to the core untouched and comes back as a
//! coerced [`LineItem`](tally_core::LineItem), so a re-render never loses what
//! the operator typed.

use serde::{Deserialize, Serialize};
use tally_core::{CatalogEntry, Field, LineInput, NumericInput, OrderInput};
use ts_rs::TS;

use crate::config::FormDefaults;
use crate::error::{FormsError, FormsResult};

/// The four per-line inputs of a row, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RawLine {
    pub unit_price: String,
    pub quantity: String,
    pub discount_percent: String,
    pub tax_percent: String,
}

impl Default for RawLine {
    fn default() -> Self {
        RawLine {
            unit_price: "0".to_string(),
            quantity: "1".to_string(),
            discount_percent: "0".to_string(),
            tax_percent: "0".to_string(),
        }
    }
}

impl RawLine {
    /// Pre-fills price and tax from a catalog lookup, quantity 1, no discount.
    pub fn from_catalog(entry: &CatalogEntry) -> Self {
        RawLine {
            unit_price: entry.unit_price.to_string(),
            quantity: "1".to_string(),
            discount_percent: "0".to_string(),
            tax_percent: entry.tax_percent.value().to_string(),
        }
    }

    pub fn set(&mut self, field: Field, text: impl Into<String>) -> FormsResult<()> {
        let slot = match field {
            Field::UnitPrice => &mut self.unit_price,
            Field::Quantity => &mut self.quantity,
            Field::DiscountPercent => &mut self.discount_percent,
            Field::TaxPercent => &mut self.tax_percent,
            other => return Err(FormsError::WrongFieldScope(other)),
        };
        *slot = text.into();
        Ok(())
    }

    pub fn to_input(&self) -> LineInput {
        LineInput {
            unit_price: NumericInput::from(self.unit_price.as_str()),
            quantity: NumericInput::from(self.quantity.as_str()),
            discount_percent: NumericInput::from(self.discount_percent.as_str()),
            tax_percent: NumericInput::from(self.tax_percent.as_str()),
        }
    }
}

/// The order-level inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RawAdjustments {
    pub discount_percent: String,
    pub tax_percent: String,
    pub shipping_fee: String,
}

impl RawAdjustments {
    pub fn from_defaults(defaults: &FormDefaults) -> Self {
        RawAdjustments {
            discount_percent: defaults.order_discount_percent.value().to_string(),
            tax_percent: defaults.order_tax_percent.value().to_string(),
            shipping_fee: defaults.shipping_fee.to_string(),
        }
    }

    pub fn set(&mut self, field: Field, text: impl Into<String>) -> FormsResult<()> {
        let slot = match field {
            Field::OrderDiscountPercent => &mut self.discount_percent,
            Field::OrderTaxPercent => &mut self.tax_percent,
            Field::ShippingFee => &mut self.shipping_fee,
            other => return Err(FormsError::WrongFieldScope(other)),
        };
        *slot = text.into();
        Ok(())
    }

    /// Builds an order from `lines` with these adjustments applied.
    pub fn to_order(&self, lines: Vec<LineInput>) -> OrderInput {
        OrderInput {
            lines,
            discount_percent: NumericInput::from(self.discount_percent.as_str()),
            tax_percent: NumericInput::from(self.tax_percent.as_str()),
            shipping_fee: NumericInput::from(self.shipping_fee.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_core::{recalculate_line, Money, Percent};

    #[test]
    fn test_from_catalog_prices_like_core() {
        let entry = CatalogEntry::new(Money::new(dec!(12.50)), Percent::new(dec!(16)).unwrap());
        let raw = RawLine::from_catalog(&entry);

        assert_eq!(raw.unit_price, "12.50");
        assert_eq!(raw.tax_percent, "16");
        assert_eq!(
            recalculate_line(&raw.to_input()),
            recalculate_line(&LineInput::from_catalog(&entry))
        );
    }

    #[test]
    fn test_set_rejects_order_fields() {
        let mut raw = RawLine::default();
        assert!(raw.set(Field::Quantity, "3").is_ok());
        assert_eq!(raw.quantity, "3");

        assert!(matches!(
            raw.set(Field::ShippingFee, "5"),
            Err(FormsError::WrongFieldScope(Field::ShippingFee))
        ));

        let mut adjustments = RawAdjustments::default();
        assert!(adjustments.set(Field::TaxPercent, "5").is_err());
        assert!(adjustments.set(Field::ShippingFee, "5").is_ok());
    }

    #[test]
    fn test_typed_text_is_kept() {
        let mut raw = RawLine::default();
        raw.set(Field::UnitPrice, " 12.5 ").unwrap();

        let line = recalculate_line(&raw.to_input());
        assert_eq!(raw.unit_price, " 12.5 ");
        assert_eq!(line.unit_price(), Money::new(dec!(12.5)));
    }
}
