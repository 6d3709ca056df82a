//! Negotiation configuration

use crate::error::{NegotiationError, Result};
use crate::negotiation::MultiplierRule;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fraction of the base price used as convergence tolerance when none is set
pub const DEFAULT_EPSILON_FRACTION: f64 = 0.005;

/// Upper limit on `max_rounds`
pub const MAX_ROUNDS_LIMIT: u32 = 10_000;

/// Tunables for a single negotiation run.
///
/// Every field has a default, so a config file only needs to name the
/// values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
    /// Rounds allowed before the run times out
    pub max_rounds: u32,
    /// Absolute price tolerance for automatic closure; `None` means
    /// [`DEFAULT_EPSILON_FRACTION`] of the base price
    pub convergence_epsilon: Option<f64>,
    /// Seller accepts offers at or above `min_price * (1 + margin)`, or at its own standing ask
    pub seller_profit_margin: f64,
    /// Buyer accepts asks at most `last_offer * (1 + band)`; this is its only acceptance limit
    pub buyer_close_band: f64,
    /// How the seller picks its counteroffer multiplier
    pub multiplier: MultiplierRule,
    /// Fail with `NoProgress` when a policy repeats itself against a stalled counterpart
    pub detect_stalls: bool,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            convergence_epsilon: None,
            seller_profit_margin: 0.10,
            buyer_close_band: 0.10,
            multiplier: MultiplierRule::Midpoint,
            detect_stalls: true,
        }
    }
}

impl NegotiationConfig {
    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_LIMIT {
            return Err(NegotiationError::InvalidConfig(format!(
                "max_rounds must be within [1, {}], got {}",
                MAX_ROUNDS_LIMIT, self.max_rounds
            )));
        }

        if let Some(epsilon) = self.convergence_epsilon {
            if !epsilon.is_finite() || epsilon < 0.0 {
                return Err(NegotiationError::InvalidConfig(format!(
                    "convergence_epsilon must be non-negative, got {}",
                    epsilon
                )));
            }
        }

        check_fraction("seller_profit_margin", self.seller_profit_margin)?;
        check_fraction("buyer_close_band", self.buyer_close_band)?;
        self.multiplier.validate()?;

        Ok(())
    }

    /// Tolerance in price units for a given base price
    pub fn epsilon_for(&self, base_price: f64) -> f64 {
        self.convergence_epsilon
            .unwrap_or(base_price * DEFAULT_EPSILON_FRACTION)
    }
}

fn check_fraction(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(NegotiationError::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NegotiationConfig::default();
        assert_eq!(config.max_rounds, 10);
        assert_eq!(config.multiplier, MultiplierRule::Midpoint);
        assert!(config.validate().is_ok());
        assert!((config.epsilon_for(1000.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: NegotiationConfig =
            serde_json::from_str(r#"{"max_rounds": 4, "convergence_epsilon": 2.5}"#).unwrap();

        assert_eq!(config.max_rounds, 4);
        assert_eq!(config.epsilon_for(1000.0), 2.5);
        assert_eq!(config.seller_profit_margin, 0.10);
        assert!(config.detect_stalls);
    }

    #[test]
    fn test_multiplier_from_json() {
        let config: NegotiationConfig =
            serde_json::from_str(r#"{"multiplier": {"seeded": 7}}"#).unwrap();
        assert_eq!(config.multiplier, MultiplierRule::Seeded(7));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = NegotiationConfig {
            max_rounds: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(NegotiationError::InvalidConfig(_))
        ));

        let config = NegotiationConfig {
            max_rounds: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(NegotiationError::InvalidConfig(_))
        ));

        let config = NegotiationConfig {
            max_rounds: MAX_ROUNDS_LIMIT,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = NegotiationConfig {
            buyer_close_band: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = NegotiationConfig {
            convergence_epsilon: Some(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = NegotiationConfig::from_file("/nonexistent/bargain.json");
        assert!(matches!(result, Err(NegotiationError::Io(_))));
    }
}
