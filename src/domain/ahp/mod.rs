//! AHP Module - Room ranking with the Analytic Hierarchy Process.
//!
//! Rooms are scored against a two-level criteria tree whose weights come
//! from pairwise comparison matrices.
//!
//! # Components
//!
//! - `PairwiseMatrix` - Reciprocal Saaty-scale comparisons for one sibling group
//! - `PriorityWeightSolver` - Weights plus consistency (λmax, CI, CR)
//! - `ScoreMapper` - Raw measurements and facilities to scores in [0, 1]
//! - `Aggregator` - Weighted sum, weighted product and combined roll-ups
//! - `CriteriaHierarchy` - All matrices with cached local and global weights
//! - `AhpEngine` - Scores, aggregates and ranks a batch of rooms
//! - `Ranker` - Competition ranking with tolerance-based ties
//!
//! # Design Philosophy
//!
//! Everything here is synchronous and free of I/O. Room data comes in as
//! plain records and results go out as plain values.

mod aggregation;
mod consistency;
mod criteria;
mod engine;
mod hierarchy;
mod pairwise_matrix;
mod priority;
mod ranking;
mod result;
mod room;
mod score_mapping;

pub use aggregation::{
    AggregationMethod, Aggregator, HierarchyScore, HierarchyWeights, DEFAULT_ALPHA,
    DEFAULT_EPSILON,
};
pub use consistency::{
    lambda_max, random_index, ConsistencyReport, CR_THRESHOLD, MAX_MATRIX_SIZE, RANDOM_INDEX,
};
pub use criteria::{Criterion, LeafCriterion, MainCriterion};
pub use engine::AhpEngine;
pub use hierarchy::{CriteriaHierarchy, PairwiseEdit, PreferenceSet, MAIN_GROUP};
pub use pairwise_matrix::{MatrixDefect, PairwiseMatrix};
pub use priority::{
    EigenBackend, Eigenpair, PowerIteration, PriorityAnalysis, PriorityWeightSolver, WeightMethod,
};
pub use ranking::{format_ranking, scores_tied, Ranker};
pub use result::{AhpResult, CriterionScore, ScoredRoom};
pub use room::{FacilityFilter, RoomRecord, UserRequirements};
pub use score_mapping::{
    av_score, centered_range_score, equipment_score, lower_is_better_score,
    missing_measurement_score, seating_score, BandShape, Measurement, MeasurementBand,
    ScoreMapper, ScoringBands, NEUTRAL_SCORE,
};
