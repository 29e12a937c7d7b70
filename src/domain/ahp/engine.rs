//! AHP Engine - Orchestrates scoring, aggregation and ranking.
//!
//! The engine owns the criteria hierarchy and the current requirements and
//! room set. Construction seeds the hierarchy, so a new engine can evaluate
//! immediately. Evaluation reads engine state only; preference edits are
//! the sole hierarchy writes.
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = AhpEngine::new()?;
//! engine.set_requirements(requirements);
//! engine.load_rooms(rooms);
//! let result = engine.evaluate(AggregationMethod::WeightedSum)?;
//! ```

use std::collections::BTreeMap;

use super::aggregation::{AggregationMethod, Aggregator, HierarchyWeights};
use super::criteria::{LeafCriterion, MainCriterion};
use super::hierarchy::{CriteriaHierarchy, PairwiseEdit};
use super::ranking::Ranker;
use super::result::{AhpResult, CriterionScore, ScoredRoom};
use super::room::{RoomRecord, UserRequirements};
use super::score_mapping::{av_score, equipment_score, seating_score, ScoreMapper};
use crate::domain::foundation::{AhpError, EvaluationId, Timestamp};

#[derive(Debug, Clone)]
pub struct AhpEngine {
    hierarchy: CriteriaHierarchy,
    mapper: ScoreMapper,
    aggregator: Aggregator,
    requirements: UserRequirements,
    rooms: Vec<RoomRecord>,
}

impl AhpEngine {
    /// Creates an engine with the default hierarchy, bands and aggregator.
    pub fn new() -> Result<Self, AhpError> {
        Ok(Self::with_components(
            CriteriaHierarchy::new()?,
            ScoreMapper::default(),
            Aggregator::default(),
        ))
    }

    /// Creates an engine from preconfigured parts.
    pub fn with_components(
        hierarchy: CriteriaHierarchy,
        mapper: ScoreMapper,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            hierarchy,
            mapper,
            aggregator,
            requirements: UserRequirements::default(),
            rooms: Vec::new(),
        }
    }

    pub fn hierarchy(&self) -> &CriteriaHierarchy {
        &self.hierarchy
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Applies pairwise edits. See [`CriteriaHierarchy::set_preferences`]
    /// for the partial-failure behaviour.
    pub fn set_preferences(
        &mut self,
        main_edits: &[PairwiseEdit],
        sub_edits: &BTreeMap<MainCriterion, Vec<PairwiseEdit>>,
    ) -> Result<(), AhpError> {
        self.hierarchy.set_preferences(main_edits, sub_edits)
    }

    pub fn set_requirements(&mut self, requirements: UserRequirements) {
        self.requirements = requirements;
    }

    pub fn requirements(&self) -> &UserRequirements {
        &self.requirements
    }

    /// Replaces the working room set.
    pub fn load_rooms(&mut self, rooms: Vec<RoomRecord>) {
        tracing::debug!(count = rooms.len(), "Loaded rooms");
        self.rooms = rooms;
    }

    pub fn rooms(&self) -> &[RoomRecord] {
        &self.rooms
    }

    /// Normalized score of every leaf criterion for a room.
    ///
    /// Missing sensor readings score neutral; facility scores come from the
    /// current requirements.
    pub fn leaf_scores(&self, room: &RoomRecord) -> BTreeMap<LeafCriterion, f64> {
        LeafCriterion::ALL
            .iter()
            .map(|&leaf| (leaf, self.leaf_score(room, leaf)))
            .collect()
    }

    fn leaf_score(&self, room: &RoomRecord, leaf: LeafCriterion) -> f64 {
        let req = &self.requirements;
        match leaf.measurement() {
            Some(m) => self.mapper.map_optional(m, room.measurement(m)),
            None => match leaf {
                LeafCriterion::SeatingCapacity => {
                    seating_score(room.seating_capacity, req.required_seats)
                }
                LeafCriterion::Equipment => equipment_score(room.computers, req.need_computers),
                _ => av_score(room.has_projector, req.need_projector),
            },
        }
    }

    fn raw_value(room: &RoomRecord, leaf: LeafCriterion) -> Option<f64> {
        match leaf.measurement() {
            Some(m) => room.measurement(m),
            None => match leaf {
                LeafCriterion::SeatingCapacity => Some(f64::from(room.seating_capacity)),
                LeafCriterion::Equipment => Some(f64::from(room.computers)),
                _ => Some(if room.has_projector { 1.0 } else { 0.0 }),
            },
        }
    }

    /// Scores one room without ranking it.
    pub fn score_room(&self, room: &RoomRecord, method: AggregationMethod) -> ScoredRoom {
        self.score_with(room, &self.hierarchy.weights(), method)
    }

    fn score_with(
        &self,
        room: &RoomRecord,
        weights: &HierarchyWeights,
        method: AggregationMethod,
    ) -> ScoredRoom {
        let leaf_scores = self.leaf_scores(room);
        let rolled = self
            .aggregator
            .aggregate_hierarchy(&leaf_scores, weights, method);

        let criteria = leaf_scores
            .iter()
            .map(|(&leaf, &score)| CriterionScore {
                criterion: leaf,
                raw_value: Self::raw_value(room, leaf),
                normalized_score: score,
                global_weight: self.hierarchy.global_weight(leaf),
            })
            .collect();

        ScoredRoom {
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            final_score: rolled.final_score,
            rank: 0,
            main_scores: rolled.main_scores,
            criteria,
        }
    }

    /// Scores and ranks every loaded room.
    ///
    /// # Errors
    ///
    /// - `NoRoomsLoaded` if no rooms were loaded
    pub fn evaluate(&self, method: AggregationMethod) -> Result<AhpResult, AhpError> {
        if self.rooms.is_empty() {
            return Err(AhpError::NoRoomsLoaded);
        }

        let evaluation_id = EvaluationId::new();
        tracing::info!(
            evaluation_id = %evaluation_id,
            rooms = self.rooms.len(),
            method = %method,
            "Evaluating rooms"
        );

        let weights = self.hierarchy.weights();
        let scored: Vec<ScoredRoom> = self
            .rooms
            .iter()
            .map(|room| self.score_with(room, &weights, method))
            .collect();
        let rankings = Ranker::rank(scored);

        let is_consistent = self.hierarchy.is_consistent();
        tracing::info!(
            evaluation_id = %evaluation_id,
            top = rankings.first().map(|r| r.room_id.as_str()).unwrap_or_default(),
            is_consistent,
            "Evaluation finished"
        );

        Ok(AhpResult {
            evaluation_id,
            evaluated_at: Timestamp::now(),
            method,
            rankings,
            global_weights: self.hierarchy.global_weights().clone(),
            main_weights: self.hierarchy.main_weights().clone(),
            local_weights: weights,
            consistency_ratios: self.hierarchy.consistency_ratios(),
            consistency: self.hierarchy.consistency_reports(),
            is_consistent,
        })
    }

    /// Text summary of all weights and consistency ratios.
    pub fn weights_summary(&self) -> String {
        self.hierarchy.summary()
    }
}
