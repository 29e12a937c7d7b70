//! Evaluation output: scored rooms and the evaluation snapshot.

use serde::Serialize;
use std::collections::BTreeMap;

use super::aggregation::{AggregationMethod, HierarchyWeights};
use super::consistency::ConsistencyReport;
use super::criteria::{LeafCriterion, MainCriterion};
use crate::domain::foundation::{EvaluationId, Timestamp};

/// Breakdown of one leaf criterion for one room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub criterion: LeafCriterion,
    /// None when the room had no reading for a sensor criterion.
    pub raw_value: Option<f64>,
    pub normalized_score: f64,
    pub global_weight: f64,
}

/// A room with its scores. `rank` is 0 until the batch is ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRoom {
    pub room_id: String,
    pub room_name: String,
    pub final_score: f64,
    pub rank: usize,
    pub main_scores: BTreeMap<MainCriterion, f64>,
    pub criteria: Vec<CriterionScore>,
}

impl ScoredRoom {
    /// Aggregate score of a main criterion, 0 when it was not scored.
    pub fn main_score(&self, criterion: MainCriterion) -> f64 {
        self.main_scores.get(&criterion).copied().unwrap_or(0.0)
    }

    pub fn criterion(&self, criterion: LeafCriterion) -> Option<&CriterionScore> {
        self.criteria.iter().find(|c| c.criterion == criterion)
    }
}

/// Ranked rooms plus the weights and diagnostics they were computed with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AhpResult {
    pub evaluation_id: EvaluationId,
    pub evaluated_at: Timestamp,
    pub method: AggregationMethod,
    pub rankings: Vec<ScoredRoom>,
    pub global_weights: BTreeMap<LeafCriterion, f64>,
    pub main_weights: BTreeMap<MainCriterion, f64>,
    pub local_weights: HierarchyWeights,
    /// CR per matrix, keyed "main" or by main criterion name.
    pub consistency_ratios: BTreeMap<String, f64>,
    pub consistency: BTreeMap<String, ConsistencyReport>,
    pub is_consistent: bool,
}

impl AhpResult {
    pub fn top(&self) -> Option<&ScoredRoom> {
        self.rankings.first()
    }
}
