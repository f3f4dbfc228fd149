//! # Forms Configuration
//!
//! Pricing policy and per-screen defaults for the admin forms.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_DEFAULT_TAX_PERCENT=16                                       │
//! │     TALLY_SHIPPING_FEE=250                                             │
//! │     TALLY_DECIMAL_PLACES=2                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tally/forms.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/forms.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     PricingPolicy::default(), no order tax/discount, no shipping       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # forms.toml
//! [pricing]
//! decimal_places = 2
//! rounding = "half_up"   # half_up | half_even
//! max_quantity = 1000000
//!
//! [defaults]
//! order_tax_percent = "16"
//! order_discount_percent = "0"
//! shipping_fee = "250.00"
//! ```

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{Money, Percent, PricingPolicy};
use tracing::{debug, info, warn};

use crate::error::{FormsError, FormsResult};

const ENV_DEFAULT_TAX_PERCENT: &str = "TALLY_DEFAULT_TAX_PERCENT";
const ENV_SHIPPING_FEE: &str = "TALLY_SHIPPING_FEE";
const ENV_DECIMAL_PLACES: &str = "TALLY_DECIMAL_PLACES";

// =============================================================================
// Form Defaults
// =============================================================================

/// Order-level values a fresh form starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefaults {
    #[serde(default)]
    pub order_tax_percent: Percent,

    #[serde(default)]
    pub order_discount_percent: Percent,

    #[serde(default)]
    pub shipping_fee: Money,
}

// =============================================================================
// Main Forms Configuration
// =============================================================================

/// Complete configuration shared by every form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsConfig {
    #[serde(default)]
    pub pricing: PricingPolicy,

    #[serde(default)]
    pub defaults: FormDefaults,
}

impl FormsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (forms.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> FormsResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading forms config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load forms config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> FormsResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(FormsError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Forms config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> FormsResult<()> {
        self.pricing.validate()?;

        if self.defaults.shipping_fee.is_negative() {
            return Err(FormsError::InvalidConfig(
                "shipping_fee must not be negative".into(),
            ));
        }

        if self.defaults.shipping_fee > self.pricing.max_amount {
            return Err(FormsError::InvalidConfig(format!(
                "shipping_fee {} exceeds max_amount {}",
                self.defaults.shipping_fee, self.pricing.max_amount
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, ignoring values that do not parse.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(ENV_DEFAULT_TAX_PERCENT) {
            match raw.trim().parse::<Decimal>().ok().and_then(Percent::new) {
                Some(percent) => {
                    debug!(%percent, "Overriding default tax percent from environment");
                    self.defaults.order_tax_percent = percent;
                }
                None => warn!(value = %raw, "Ignoring invalid {}", ENV_DEFAULT_TAX_PERCENT),
            }
        }

        if let Some(raw) = lookup(ENV_SHIPPING_FEE) {
            match raw.trim().parse::<Decimal>() {
                Ok(fee) => {
                    debug!(%fee, "Overriding shipping fee from environment");
                    self.defaults.shipping_fee = Money::new(fee);
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_SHIPPING_FEE),
            }
        }

        if let Some(raw) = lookup(ENV_DECIMAL_PLACES) {
            match raw.trim().parse::<u32>() {
                Ok(places) => {
                    debug!(places, "Overriding decimal places from environment");
                    self.pricing.decimal_places = places;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_DECIMAL_PLACES),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join("forms.toml"))
    }
}
