//! Aggregation - Combining normalized scores with priority weights.
//!
//! Three interchangeable strategies:
//! - Weighted sum (compensatory)
//! - Weighted product (non-compensatory, low scores hurt more)
//! - Combined (alpha-blend of the two)
//!
//! Hierarchical aggregation rolls leaf scores up into main-criterion scores,
//! then main-criterion scores into the final score, with one method used
//! uniformly at both levels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::criteria::{LeafCriterion, MainCriterion};
use crate::domain::foundation::AhpError;

/// Default floor substituted for zero scores in the weighted product.
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Default share of the weighted sum in the combined method.
pub const DEFAULT_ALPHA: f64 = 0.7;

/// How scores are rolled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    WeightedSum,
    WeightedProduct,
    Combined,
}

impl AggregationMethod {
    pub const ALL: [AggregationMethod; 3] = [
        AggregationMethod::WeightedSum,
        AggregationMethod::WeightedProduct,
        AggregationMethod::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::WeightedSum => "weighted_sum",
            AggregationMethod::WeightedProduct => "weighted_product",
            AggregationMethod::Combined => "combined",
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMethod {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "weighted_sum" | "wsm" => Ok(AggregationMethod::WeightedSum),
            "weighted_product" | "wpm" => Ok(AggregationMethod::WeightedProduct),
            "combined" => Ok(AggregationMethod::Combined),
            _ => Err(AhpError::unknown_method("aggregation", s)),
        }
    }
}

/// Weight snapshot of the whole hierarchy, as consumed by aggregation.
///
/// `groups` holds local (within-group) leaf weights. A main criterion
/// missing from `groups` is skipped during aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyWeights {
    pub main: BTreeMap<MainCriterion, f64>,
    pub groups: BTreeMap<MainCriterion, BTreeMap<LeafCriterion, f64>>,
}

/// Result of rolling leaf scores up the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyScore {
    pub final_score: f64,
    pub main_scores: BTreeMap<MainCriterion, f64>,
}

/// Score aggregator with tunable epsilon and alpha.
///
/// Parameter ranges (alpha in [0, 1], epsilon in (0, 1)) are enforced by
/// configuration validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregator {
    epsilon: f64,
    alpha: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Σ(w_i × s_i), rescaled by the weight actually present when that
    /// weight does not sum to 1. Criteria without a weight count as weight 0.
    pub fn weighted_sum<K: Ord>(&self, scores: &BTreeMap<K, f64>, weights: &BTreeMap<K, f64>) -> f64 {
        if scores.is_empty() || weights.is_empty() {
            return 0.0;
        }

        let (total, weight_sum) = scores.iter().fold((0.0, 0.0), |(total, sum), (k, score)| {
            let w = weights.get(k).copied().unwrap_or(0.0);
            (total + w * score, sum + w)
        });

        if weight_sum > 0.0 && !is_close_to_one(weight_sum) {
            total / weight_sum
        } else {
            total
        }
    }

    /// Π(s_i ^ w_i) over criteria with nonzero weight.
    ///
    /// Scores below epsilon are floored to epsilon, so a single zero cannot
    /// zero the aggregate. Rescaled by ^(1/Σw) when the used weight does not
    /// sum to 1.
    pub fn weighted_product<K: Ord>(
        &self,
        scores: &BTreeMap<K, f64>,
        weights: &BTreeMap<K, f64>,
    ) -> f64 {
        if scores.is_empty() || weights.is_empty() {
            return 0.0;
        }

        let mut product = 1.0;
        let mut weight_sum = 0.0;
        for (k, score) in scores {
            let w = weights.get(k).copied().unwrap_or(0.0);
            if w == 0.0 {
                continue;
            }
            product *= score.max(self.epsilon).powf(w);
            weight_sum += w;
        }

        if weight_sum == 0.0 {
            return 0.0;
        }
        if !is_close_to_one(weight_sum) {
            product.powf(1.0 / weight_sum)
        } else {
            product
        }
    }

    /// α × weighted sum + (1 − α) × weighted product.
    pub fn combined<K: Ord>(&self, scores: &BTreeMap<K, f64>, weights: &BTreeMap<K, f64>) -> f64 {
        let sum = self.weighted_sum(scores, weights);
        let product = self.weighted_product(scores, weights);
        self.alpha * sum + (1.0 - self.alpha) * product
    }

    /// Dispatches to the chosen strategy.
    pub fn aggregate<K: Ord>(
        &self,
        method: AggregationMethod,
        scores: &BTreeMap<K, f64>,
        weights: &BTreeMap<K, f64>,
    ) -> f64 {
        match method {
            AggregationMethod::WeightedSum => self.weighted_sum(scores, weights),
            AggregationMethod::WeightedProduct => self.weighted_product(scores, weights),
            AggregationMethod::Combined => self.combined(scores, weights),
        }
    }

    /// Bottom-up aggregation: leaves to main criteria, main criteria to the
    /// final score.
    ///
    /// A leaf with a weight but no score counts as 0. A main criterion with
    /// no weight group is neither scored nor weighted.
    pub fn aggregate_hierarchy(
        &self,
        leaf_scores: &BTreeMap<LeafCriterion, f64>,
        weights: &HierarchyWeights,
        method: AggregationMethod,
    ) -> HierarchyScore {
        let main_scores: BTreeMap<MainCriterion, f64> = MainCriterion::ALL
            .iter()
            .filter_map(|main| {
                let group = weights.groups.get(main)?;
                let scores: BTreeMap<LeafCriterion, f64> = group
                    .keys()
                    .map(|leaf| (*leaf, leaf_scores.get(leaf).copied().unwrap_or(0.0)))
                    .collect();
                Some((*main, self.aggregate(method, &scores, group)))
            })
            .collect();

        let final_score = self.aggregate(method, &main_scores, &weights.main);

        HierarchyScore {
            final_score,
            main_scores,
        }
    }
}

/// Absolute 1e-8 plus relative 1e-5 tolerance around 1.
fn is_close_to_one(value: f64) -> bool {
    (value - 1.0).abs() <= 1e-8 + 1e-5
}
