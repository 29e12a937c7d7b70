//! Weighting configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::ahp::{PriorityWeightSolver, WeightMethod, CR_THRESHOLD};

/// How priority weights are derived from comparison matrices
#[derive(Debug, Clone, Deserialize)]
pub struct WeightingConfig {
    #[serde(default)]
    pub method: WeightMethod,

    /// CR below which a matrix counts as consistent
    #[serde(default = "default_cr_threshold")]
    pub cr_threshold: f64,
}

fn default_cr_threshold() -> f64 {
    CR_THRESHOLD
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            method: WeightMethod::default(),
            cr_threshold: default_cr_threshold(),
        }
    }
}

impl WeightingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.cr_threshold > 0.0 && self.cr_threshold <= 1.0) {
            return Err(ValidationError::ThresholdOutOfRange(self.cr_threshold));
        }
        Ok(())
    }

    pub fn solver(&self) -> PriorityWeightSolver {
        PriorityWeightSolver::new().with_threshold(self.cr_threshold)
    }
}
