//! # Form Contract
//!
//! What every screen adapter shares: turning its rows into an
//! [`OrderInput`] and reading back a [`FormSnapshot`].
//!
//! ## Recompute Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   field edit ──► form.set_*() ──► form.snapshot()                       │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                     order_input() ──► OrderInput::evaluate(policy)      │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                     FormSnapshot { lines, line_issues, totals, at }     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A snapshot is a fresh value per call. Nothing is cached between edits.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::{InputIssue, LineItem, OrderEvaluation, OrderInput, OrderTotals, PricingPolicy};
use tracing::{debug, warn};
use ts_rs::TS;

/// Everything a screen renders after one recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FormSnapshot {
    /// Recalculated rows, in form order.
    pub lines: Vec<LineItem>,

    /// Coercion issues per row, parallel to `lines`.
    pub line_issues: Vec<Vec<InputIssue>>,

    pub totals: OrderTotals,

    #[ts(as = "String")]
    pub taken_at: DateTime<Utc>,
}

impl FormSnapshot {
    pub fn capture(evaluation: OrderEvaluation) -> Self {
        let (lines, line_issues) = evaluation
            .lines
            .into_iter()
            .map(|report| (report.line, report.issues))
            .unzip();

        FormSnapshot {
            lines,
            line_issues,
            totals: evaluation.totals,
            taken_at: Utc::now(),
        }
    }

    /// True if any row or order field was coerced, or anything was excluded.
    pub fn needs_attention(&self) -> bool {
        self.totals.has_warnings
            || !self.totals.issues.is_empty()
            || self.line_issues.iter().any(|issues| !issues.is_empty())
    }
}

/// A screen that edits an order.
pub trait OrderForm {
    /// The form's current rows and order fields as raw core input.
    fn order_input(&self) -> OrderInput;

    fn policy(&self) -> &PricingPolicy;

    /// Recalculates every row and the order totals.
    fn snapshot(&self) -> FormSnapshot {
        let input = self.order_input();
        let snapshot = FormSnapshot::capture(input.evaluate(self.policy()));

        debug!(
            lines = snapshot.lines.len(),
            grand_total = %snapshot.totals.grand_total,
            "Form recomputed"
        );
        if snapshot.totals.has_warnings {
            warn!(
                excluded = ?snapshot.totals.excluded_lines,
                "Form totals carry warnings"
            );
        }

        snapshot
    }
}
