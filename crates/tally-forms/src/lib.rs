//! # tally-forms: Screen Adapters for Tally
//!
//! Each admin screen keeps its rows as raw text and hands them to
//! [`tally_core`] on every change. This crate owns that mapping, plus the
//! pieces a host needs around it: config loading and tracing setup.
//!
//! ## Module Organization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tally-forms                                      │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────┐    │
//! │  │  quotation   │   │    sale      │   │   stock_adjustment       │    │
//! │  │  rows by id  │   │  rows by     │   │   addition/subtraction   │    │
//! │  │              │   │  product id  │   │   rows, net valuation    │    │
//! │  └──────┬───────┘   └──────┬───────┘   └────────────┬─────────────┘    │
//! │         │                  │                        │                   │
//! │         └────────┬─────────┘                        │                   │
//! │                  ▼                                  ▼                   │
//! │  ┌──────────────────────────┐          ┌──────────────────────────┐    │
//! │  │  form (OrderForm trait)  │          │  raw (RawLine, Raw-      │    │
//! │  │  FormSnapshot            │          │  Adjustments)            │    │
//! │  └──────────────────────────┘          └──────────────────────────┘    │
//! │                                                                         │
//! │  config (FormsConfig)   telemetry (init_tracing)   error (FormsError)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::{CatalogEntry, Money, Percent};
//! use tally_forms::{FormsConfig, OrderForm, QuotationForm};
//!
//! let config = FormsConfig::default();
//! let mut form = QuotationForm::new("Q-0001", &config);
//!
//! let tax = Percent::new(Decimal::from(5)).unwrap();
//! let entry = CatalogEntry::new(Money::from_cents(10000), tax);
//! let row = form.add_row("Widget", &entry);
//! form.set_quantity(row, "2").unwrap();
//! form.set_discount_percent(row, "10").unwrap();
//!
//! let snapshot = form.snapshot();
//! assert_eq!(snapshot.lines[0].line_total(), Money::from_cents(18900));
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod quotation;
pub mod raw;
pub mod sale;
pub mod stock_adjustment;
pub mod telemetry;

pub use config::{FormDefaults, FormsConfig};
pub use error::{FormsError, FormsResult};
pub use form::{FormSnapshot, OrderForm};
pub use quotation::{QuotationForm, QuotationRow};
pub use raw::{RawAdjustments, RawLine};
pub use sale::{SaleEntryForm, SaleRow};
pub use stock_adjustment::{
    AdjustmentKind, AdjustmentRow, AdjustmentSummary, RowIssue, StockAdjustmentForm,
};
pub use telemetry::init_tracing;
