//! # Pricing Policy
//!
//! The small set of knobs that decide how raw values are bounded and how
//! derived amounts are rounded.
//!
//! Every screen uses [`PricingPolicy::default()`] unless the host config
//! overrides it:
//!
//! ```toml
//! [pricing]
//! decimal_places = 2
//! rounding = "half_up"
//! max_quantity = 1000000
//! max_amount = "1000000000000"
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, RoundingMode};
use crate::{DEFAULT_DECIMAL_PLACES, DEFAULT_MAX_AMOUNT, DEFAULT_MAX_QUANTITY, MAX_DECIMAL_PLACES};

/// Rounding and bounding rules for one pricing computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PricingPolicy {
    /// Places that monetary derived values are rounded to.
    pub decimal_places: u32,

    pub rounding: RoundingMode,

    /// Quantities above this are clamped down to it.
    pub max_quantity: u32,

    /// Unit prices and shipping fees above this are clamped down to it.
    pub max_amount: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            decimal_places: DEFAULT_DECIMAL_PLACES,
            rounding: RoundingMode::HalfUp,
            max_quantity: DEFAULT_MAX_QUANTITY,
            max_amount: Money::new(Decimal::from(DEFAULT_MAX_AMOUNT)),
        }
    }
}

impl PricingPolicy {
    /// Rounds a derived monetary value per this policy.
    #[inline]
    pub fn round(&self, value: Money) -> Money {
        value.round(self.decimal_places, self.rounding)
    }

    /// Checks the policy can be applied safely.
    ///
    /// ## Rules
    /// - `decimal_places` at most 6
    /// - `max_quantity` at least 1
    /// - `max_amount` strictly positive
    pub fn validate(&self) -> CoreResult<()> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(CoreError::InvalidPolicy {
                reason: format!("decimal_places must be at most {}", MAX_DECIMAL_PLACES),
            });
        }

        if self.max_quantity == 0 {
            return Err(CoreError::InvalidPolicy {
                reason: "max_quantity must be at least 1".to_string(),
            });
        }

        if self.max_amount.is_zero() || self.max_amount.is_negative() {
            return Err(CoreError::InvalidPolicy {
                reason: "max_amount must be positive".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = PricingPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.decimal_places, 2);
        assert_eq!(policy.rounding, RoundingMode::HalfUp);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let policy = PricingPolicy {
            decimal_places: 9,
            ..PricingPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = PricingPolicy {
            max_quantity: 0,
            ..PricingPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = PricingPolicy {
            max_amount: Money::ZERO,
            ..PricingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_round_uses_policy() {
        let policy = PricingPolicy {
            rounding: RoundingMode::HalfEven,
            ..PricingPolicy::default()
        };
        assert_eq!(policy.round(Money::new(dec!(2.125))), Money::new(dec!(2.12)));
        assert_eq!(
            PricingPolicy::default().round(Money::new(dec!(2.125))),
            Money::new(dec!(2.13))
        );
    }

    #[test]
    fn test_partial_policy_deserializes_with_defaults() {
        let policy: PricingPolicy = serde_json::from_str(r#"{"rounding":"half_even"}"#).unwrap();
        assert_eq!(policy.rounding, RoundingMode::HalfEven);
        assert_eq!(policy.decimal_places, 2);
    }
}
