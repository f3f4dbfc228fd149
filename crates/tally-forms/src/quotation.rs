//! # Quotation Form
//!
//! Backs the quotation screen: free-form rows the operator edits cell by
//! cell, plus order discount, tax and shipping.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Quotation Operations                                 │
//! │                                                                         │
//! │  Screen Action            Form Method             Row State Change      │
//! │  ─────────────            ───────────             ────────────────      │
//! │                                                                         │
//! │  Pick Product ───────────► add_row() ───────────► rows.push(row)       │
//! │                                                                         │
//! │  Edit Cell ──────────────► set_row_field() ─────► row.line.<field>     │
//! │                                                                         │
//! │  Edit Order Field ───────► set_order_field() ───► adjustments.<field>  │
//! │                                                                         │
//! │  Click Remove ───────────► remove_row() ────────► rows.remove(i)       │
//! │                                                                         │
//! │  Any Change ─────────────► snapshot() ──────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are addressed by a generated id, never by position, so removing a row
//! while another cell is being edited cannot retarget the edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{CatalogEntry, Field, OrderInput, PricingPolicy};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::config::FormsConfig;
use crate::error::{FormsError, FormsResult};
use crate::form::OrderForm;
use crate::raw::{RawAdjustments, RawLine};

/// One row of a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationRow {
    #[ts(as = "String")]
    pub id: Uuid,

    pub product_name: String,

    #[serde(flatten)]
    pub line: RawLine,
}

/// A quotation being drafted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationForm {
    /// Customer-facing reference, e.g. "Q-2024-0113".
    pub reference: String,

    rows: Vec<QuotationRow>,

    adjustments: RawAdjustments,

    policy: PricingPolicy,

    pub created_at: DateTime<Utc>,
}

impl QuotationForm {
    /// Creates an empty quotation with order fields from `config` defaults.
    pub fn new(reference: impl Into<String>, config: &FormsConfig) -> Self {
        QuotationForm {
            reference: reference.into(),
            rows: Vec::new(),
            adjustments: RawAdjustments::from_defaults(&config.defaults),
            policy: config.pricing,
            created_at: Utc::now(),
        }
    }

    pub fn rows(&self) -> &[QuotationRow] {
        &self.rows
    }

    pub fn row(&self, id: Uuid) -> Option<&QuotationRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn adjustments(&self) -> &RawAdjustments {
        &self.adjustments
    }

    /// Appends a row pre-filled from a catalog lookup. Returns its id.
    pub fn add_row(&mut self, product_name: impl Into<String>, entry: &CatalogEntry) -> Uuid {
        let row = QuotationRow {
            id: Uuid::new_v4(),
            product_name: product_name.into(),
            line: RawLine::from_catalog(entry),
        };
        let id = row.id;

        debug!(%id, product = %row.product_name, "Quotation row added");
        self.rows.push(row);
        id
    }

    /// Replaces one per-line cell of row `id` with `text`, as typed.
    pub fn set_row_field(
        &mut self,
        id: Uuid,
        field: Field,
        text: impl Into<String>,
    ) -> FormsResult<()> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(FormsError::RowNotFound(id))?
            .line
            .set(field, text)
    }

    pub fn set_unit_price(&mut self, id: Uuid, text: impl Into<String>) -> FormsResult<()> {
        self.set_row_field(id, Field::UnitPrice, text)
    }

    pub fn set_quantity(&mut self, id: Uuid, text: impl Into<String>) -> FormsResult<()> {
        self.set_row_field(id, Field::Quantity, text)
    }

    pub fn set_discount_percent(&mut self, id: Uuid, text: impl Into<String>) -> FormsResult<()> {
        self.set_row_field(id, Field::DiscountPercent, text)
    }

    pub fn set_tax_percent(&mut self, id: Uuid, text: impl Into<String>) -> FormsResult<()> {
        self.set_row_field(id, Field::TaxPercent, text)
    }

    /// Replaces an order-level field (discount, tax or shipping).
    pub fn set_order_field(&mut self, field: Field, text: impl Into<String>) -> FormsResult<()> {
        self.adjustments.set(field, text)
    }

    pub fn remove_row(&mut self, id: Uuid) -> FormsResult<()> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(FormsError::RowNotFound(id))?;

        self.rows.remove(index);
        debug!(%id, "Quotation row removed");
        Ok(())
    }
}

impl OrderForm for QuotationForm {
    fn order_input(&self) -> OrderInput {
        self.adjustments
            .to_order(self.rows.iter().map(|row| row.line.to_input()).collect())
    }

    fn policy(&self) -> &PricingPolicy {
        &self.policy
    }
}
