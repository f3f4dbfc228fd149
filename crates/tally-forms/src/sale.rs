//! # Sale Entry Form
//!
//! Backs the point-of-sale modal: the operator scans or picks products and
//! the form keeps one row per product.
//!
//! ## Invariants
//! - Rows are unique by `product_id` (adding the same product increases quantity)
//! - Setting a quantity of 0 removes the row
//! - Order discount, tax and shipping start from the configured defaults

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::validation::coerce_quantity;
use tally_core::{CatalogEntry, Field, NumericInput, OrderInput, PricingPolicy};
use tracing::debug;
use ts_rs::TS;

use crate::config::FormsConfig;
use crate::error::{FormsError, FormsResult};
use crate::form::OrderForm;
use crate::raw::{RawAdjustments, RawLine};

/// A product in the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRow {
    pub product_id: String,

    /// Product name when it was added.
    pub name: String,

    #[serde(flatten)]
    pub line: RawLine,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

/// The sale being rung up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleEntryForm {
    rows: Vec<SaleRow>,

    adjustments: RawAdjustments,

    policy: PricingPolicy,

    /// When the sale was opened or last cleared.
    pub started_at: DateTime<Utc>,
}

impl SaleEntryForm {
    pub fn new(config: &FormsConfig) -> Self {
        SaleEntryForm {
            rows: Vec::new(),
            adjustments: RawAdjustments::from_defaults(&config.defaults),
            policy: config.pricing,
            started_at: Utc::now(),
        }
    }

    pub fn rows(&self) -> &[SaleRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn adjustments(&self) -> &RawAdjustments {
        &self.adjustments
    }

    /// Adds a product or increases its quantity if already present.
    ///
    /// A quantity of 0 counts as 1. The merged quantity stops at the policy's
    /// `max_quantity`.
    pub fn add_product(
        &mut self,
        product_id: impl Into<String>,
        name: impl Into<String>,
        entry: &CatalogEntry,
        quantity: u32,
    ) {
        let product_id = product_id.into();
        let quantity = quantity.max(1);
        let max_quantity = self.policy.max_quantity;

        if let Some(row) = self.rows.iter_mut().find(|r| r.product_id == product_id) {
            let current = coerce_quantity(
                &NumericInput::from(row.line.quantity.as_str()),
                Field::Quantity,
                max_quantity,
            )
            .value;
            let merged = current.saturating_add(quantity).min(max_quantity);

            debug!(%product_id, current, merged, "Sale quantity increased");
            row.line.quantity = merged.to_string();
            return;
        }

        let mut line = RawLine::from_catalog(entry);
        line.quantity = quantity.min(max_quantity).to_string();

        debug!(%product_id, quantity, "Product added to sale");
        self.rows.push(SaleRow {
            product_id,
            name: name.into(),
            line,
            added_at: Utc::now(),
        });
    }

    /// Sets a row's quantity from the stepper. 0 removes the row.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> FormsResult<()> {
        if quantity == 0 {
            return self.remove_product(product_id);
        }

        self.row_mut(product_id)?.line.quantity = quantity.to_string();
        Ok(())
    }

    /// Replaces one per-line cell with typed text.
    pub fn set_field(
        &mut self,
        product_id: &str,
        field: Field,
        text: impl Into<String>,
    ) -> FormsResult<()> {
        self.row_mut(product_id)?.line.set(field, text)
    }

    pub fn set_order_field(&mut self, field: Field, text: impl Into<String>) -> FormsResult<()> {
        self.adjustments.set(field, text)
    }

    pub fn remove_product(&mut self, product_id: &str) -> FormsResult<()> {
        let index = self
            .rows
            .iter()
            .position(|r| r.product_id == product_id)
            .ok_or_else(|| FormsError::ProductNotInSale(product_id.to_string()))?;

        self.rows.remove(index);
        debug!(%product_id, "Product removed from sale");
        Ok(())
    }

    /// Empties the sale. Order fields keep their current values.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.started_at = Utc::now();
    }

    fn row_mut(&mut self, product_id: &str) -> FormsResult<&mut SaleRow> {
        self.rows
            .iter_mut()
            .find(|r| r.product_id == product_id)
            .ok_or_else(|| FormsError::ProductNotInSale(product_id.to_string()))
    }
}

impl OrderForm for SaleEntryForm {
    fn order_input(&self) -> OrderInput {
        self.adjustments
            .to_order(self.rows.iter().map(|row| row.line.to_input()).collect())
    }

    fn policy(&self) -> &PricingPolicy {
        &self.policy
    }
}
