//! GetWeightsHandler - Query handler for the current criteria weights.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::ahp::{
    ConsistencyReport, HierarchyWeights, LeafCriterion, MainCriterion, PreferenceSet,
    WeightMethod,
};
use crate::domain::foundation::DomainError;

/// Query for the weights that result from a preference set.
#[derive(Debug, Clone, Default)]
pub struct GetWeightsQuery {
    pub preferences: PreferenceSet,
}

/// Weights and consistency diagnostics of the criteria hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct WeightsView {
    pub weight_method: WeightMethod,
    pub main_weights: BTreeMap<MainCriterion, f64>,
    pub local_weights: HierarchyWeights,
    pub global_weights: BTreeMap<LeafCriterion, f64>,
    pub consistency: BTreeMap<String, ConsistencyReport>,
    pub is_consistent: bool,
    /// Human-readable rendering of the above.
    #[serde(skip)]
    pub summary: String,
}

/// Handler for weight queries.
pub struct GetWeightsHandler {
    config: AppConfig,
}

impl GetWeightsHandler {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn handle(&self, query: GetWeightsQuery) -> Result<WeightsView, DomainError> {
        let mut hierarchy = self.config.hierarchy()?;
        if !query.preferences.is_empty() {
            hierarchy.set_preferences(&query.preferences.main, &query.preferences.sub)?;
        }

        Ok(WeightsView {
            weight_method: hierarchy.weight_method(),
            main_weights: hierarchy.main_weights().clone(),
            local_weights: hierarchy.weights(),
            global_weights: hierarchy.global_weights().clone(),
            consistency: hierarchy.consistency_reports(),
            is_consistent: hierarchy.is_consistent(),
            summary: hierarchy.summary(),
        })
    }
}
