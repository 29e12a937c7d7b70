//! Aggregation configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::ahp::{AggregationMethod, Aggregator, DEFAULT_ALPHA, DEFAULT_EPSILON};

/// How room scores are rolled up
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Method used when the caller does not pick one
    #[serde(default)]
    pub method: AggregationMethod,

    /// Weighted-sum share of the combined method
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Floor for zero scores in the weighted product
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            method: AggregationMethod::default(),
            alpha: default_alpha(),
            epsilon: default_epsilon(),
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ValidationError::AlphaOutOfRange(self.alpha));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(ValidationError::EpsilonOutOfRange(self.epsilon));
        }
        Ok(())
    }

    /// Builds the configured aggregator
    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new()
            .with_alpha(self.alpha)
            .with_epsilon(self.epsilon)
    }
}
