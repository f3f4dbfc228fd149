//! # Forms Error Types
//!
//! Error types for the screen adapters and configuration loading.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Form edits    │  │   Core                  │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  RowNotFound    │  │  InvalidPolicy          │ │
//! │  │  ConfigParse    │  │  ProductNotIn-  │  │  PercentOutOfRange      │ │
//! │  │  InvalidConfig  │  │    Sale         │  │                         │ │
//! │  │                 │  │  WrongField-    │  │                         │ │
//! │  │                 │  │    Scope        │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing itself never produces an error; these only come from addressing a
//! row that does not exist or from a broken config.

use tally_core::{CoreError, Field};
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for form and config operations.
pub type FormsResult<T> = Result<T, FormsError>;

#[derive(Debug, Error)]
pub enum FormsError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Reading or writing the config file failed.
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No platform config directory and no explicit path.
    #[error("No config path available")]
    NoConfigPath,

    /// The global tracing subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),

    // =========================================================================
    // Form Edit Errors
    // =========================================================================
    #[error("Row not found: {0}")]
    RowNotFound(Uuid),

    #[error("Product {0} is not in the sale")]
    ProductNotInSale(String),

    /// An order-level field was addressed as a row field, or vice versa.
    #[error("{0} cannot be edited here")]
    WrongFieldScope(Field),

    // =========================================================================
    // Core Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}
