//! # Stock Adjustment Form
//!
//! Backs the stock adjustment screen. Each row adds or removes units of a
//! product at a unit cost. There is no discount or tax on this screen.
//!
//! ## Valuation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   rows ──┬── kind = Addition ────► aggregate ──► added                  │
//! │          │                                                              │
//! │          └── kind = Subtraction ─► aggregate ──► removed                │
//! │                                                                         │
//! │                        net_value = added - removed  (may be negative)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tally_core::{
    Field, InputIssue, LineInput, Money, NumericInput, OrderEvaluation, OrderInput, OrderTotals,
    PricingPolicy,
};
use tracing::{debug, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::config::FormsConfig;
use crate::error::{FormsError, FormsResult};

/// Whether a row puts stock in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    #[default]
    Addition,
    Subtraction,
}

impl std::fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentKind::Addition => write!(f, "addition"),
            AdjustmentKind::Subtraction => write!(f, "subtraction"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdjustmentRow {
    #[ts(as = "String")]
    pub id: Uuid,
    pub product: String,
    pub unit_cost: String,
    pub quantity: String,
    pub kind: AdjustmentKind,
}

impl AdjustmentRow {
    fn to_input(&self) -> LineInput {
        LineInput {
            unit_price: NumericInput::from(self.unit_cost.as_str()),
            quantity: NumericInput::from(self.quantity.as_str()),
            discount_percent: NumericInput::default(),
            tax_percent: NumericInput::default(),
        }
    }
}

/// A value on one row that was coerced before valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct RowIssue {
    #[ts(as = "String")]
    pub row_id: Uuid,
    pub issue: InputIssue,
}

/// Valuation of a stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct AdjustmentSummary {
    /// Totals over the addition rows.
    pub added: OrderTotals,

    /// Totals over the subtraction rows.
    pub removed: OrderTotals,

    /// `added.grand_total - removed.grand_total`.
    pub net_value: Money,

    /// Coercions applied to row cells, in row order.
    pub row_issues: Vec<RowIssue>,
}

impl AdjustmentSummary {
    pub fn has_warnings(&self) -> bool {
        self.added.has_warnings || self.removed.has_warnings
    }

    /// Warnings or any coerced cell.
    pub fn needs_attention(&self) -> bool {
        self.has_warnings() || !self.row_issues.is_empty()
    }

    pub fn issues_for(&self, row_id: Uuid) -> impl Iterator<Item = &InputIssue> + '_ {
        self.row_issues
            .iter()
            .filter(move |row_issue| row_issue.row_id == row_id)
            .map(|row_issue| &row_issue.issue)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustmentForm {
    /// Why stock is being adjusted, e.g. "Damaged in transit".
    pub reason: String,

    rows: Vec<AdjustmentRow>,

    policy: PricingPolicy,
}

impl StockAdjustmentForm {
    pub fn new(reason: impl Into<String>, config: &FormsConfig) -> Self {
        StockAdjustmentForm {
            reason: reason.into(),
            rows: Vec::new(),
            policy: config.pricing,
        }
    }

    pub fn rows(&self) -> &[AdjustmentRow] {
        &self.rows
    }

    /// Appends a row of one unit at `unit_cost`. Returns its id.
    pub fn add_row(
        &mut self,
        product: impl Into<String>,
        unit_cost: Money,
        kind: AdjustmentKind,
    ) -> Uuid {
        let row = AdjustmentRow {
            id: Uuid::new_v4(),
            product: product.into(),
            unit_cost: unit_cost.to_string(),
            quantity: "1".to_string(),
            kind,
        };
        let id = row.id;

        debug!(%id, product = %row.product, %kind, "Adjustment row added");
        self.rows.push(row);
        id
    }

    /// Replaces the unit cost or quantity of row `id`.
    ///
    /// Unit cost is addressed as [`Field::UnitPrice`]; discount and tax fields
    /// do not exist on this screen.
    pub fn set_row_field(
        &mut self,
        id: Uuid,
        field: Field,
        text: impl Into<String>,
    ) -> FormsResult<()> {
        let row = self.row_mut(id)?;
        let slot = match field {
            Field::UnitPrice => &mut row.unit_cost,
            Field::Quantity => &mut row.quantity,
            other => return Err(FormsError::WrongFieldScope(other)),
        };
        *slot = text.into();
        Ok(())
    }

    pub fn set_unit_cost(&mut self, id: Uuid, text: impl Into<String>) -> FormsResult<()> {
        self.set_row_field(id, Field::UnitPrice, text)
    }

    pub fn set_quantity(&mut self, id: Uuid, text: impl Into<String>) -> FormsResult<()> {
        self.set_row_field(id, Field::Quantity, text)
    }

    pub fn set_kind(&mut self, id: Uuid, kind: AdjustmentKind) -> FormsResult<()> {
        self.row_mut(id)?.kind = kind;
        Ok(())
    }

    pub fn remove_row(&mut self, id: Uuid) -> FormsResult<()> {
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(FormsError::RowNotFound(id))?;

        self.rows.remove(index);
        Ok(())
    }

    /// Values the additions and subtractions separately, then nets them.
    pub fn summary(&self) -> AdjustmentSummary {
        let added = self.evaluate(AdjustmentKind::Addition);
        let removed = self.evaluate(AdjustmentKind::Subtraction);

        let mut row_issues: Vec<RowIssue> = self
            .rows_of(AdjustmentKind::Addition)
            .zip(&added.lines)
            .chain(self.rows_of(AdjustmentKind::Subtraction).zip(&removed.lines))
            .flat_map(|(row, report)| {
                report.issues.iter().map(move |&issue| RowIssue {
                    row_id: row.id,
                    issue,
                })
            })
            .collect();
        row_issues.sort_by_key(|row_issue| self.position(row_issue.row_id));

        let (added, removed) = (added.totals, removed.totals);

        // Zeroed on overflow, like the order totals.
        let net_value = added
            .grand_total
            .checked_sub(removed.grand_total)
            .unwrap_or(Money::ZERO);

        let summary = AdjustmentSummary {
            added,
            removed,
            net_value,
            row_issues,
        };

        debug!(net_value = %summary.net_value, rows = self.rows.len(), "Adjustment valued");
        if summary.has_warnings() {
            warn!(reason = %self.reason, "Adjustment valuation carries warnings");
        }

        summary
    }

    fn rows_of(&self, kind: AdjustmentKind) -> impl Iterator<Item = &AdjustmentRow> + '_ {
        self.rows.iter().filter(move |row| row.kind == kind)
    }

    fn position(&self, id: Uuid) -> usize {
        self.rows
            .iter()
            .position(|row| row.id == id)
            .unwrap_or(self.rows.len())
    }

    fn evaluate(&self, kind: AdjustmentKind) -> OrderEvaluation {
        let order = OrderInput {
            lines: self.rows_of(kind).map(AdjustmentRow::to_input).collect(),
            ..OrderInput::default()
        };

        order.evaluate(&self.policy)
    }

    fn row_mut(&mut self, id: Uuid) -> FormsResult<&mut AdjustmentRow> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(FormsError::RowNotFound(id))
    }
}
