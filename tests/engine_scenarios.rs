//! End-to-end scenarios for the AHP engine.
//!
//! Exercises the public domain API the way an embedding application would:
//! build an engine, load rooms, edit preferences, evaluate.

use std::collections::BTreeMap;

use room_ahp::domain::ahp::{
    centered_range_score, lower_is_better_score, seating_score, AggregationMethod, Aggregator,
    AhpEngine, LeafCriterion, MainCriterion, Measurement, PairwiseEdit, PairwiseMatrix,
    PriorityWeightSolver, Ranker, RoomRecord, ScoredRoom, ScoringBands, UserRequirements,
    WeightMethod,
};
use room_ahp::domain::foundation::AhpError;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn campus_rooms() -> Vec<RoomRecord> {
    vec![
        RoomRecord::new("A-101", "Seminar A-101")
            .with_measurement(Measurement::Temperature, 21.5)
            .with_measurement(Measurement::Co2, 520.0)
            .with_measurement(Measurement::Humidity, 45.0)
            .with_measurement(Measurement::Light, 420.0)
            .with_measurement(Measurement::Noise, 32.0)
            .with_measurement(Measurement::Voc, 150.0)
            .with_measurement(Measurement::AirQuality, 30.0)
            .with_seating(30)
            .with_projector(true),
        RoomRecord::new("B-204", "Lab B-204")
            .with_measurement(Measurement::Temperature, 25.5)
            .with_measurement(Measurement::Co2, 950.0)
            .with_measurement(Measurement::Humidity, 65.0)
            .with_measurement(Measurement::Light, 600.0)
            .with_measurement(Measurement::Noise, 44.0)
            .with_seating(28)
            .with_projector(true)
            .with_computers(28),
        RoomRecord::new("C-001", "Basement C-001")
            .with_measurement(Measurement::Temperature, 17.0)
            .with_measurement(Measurement::Co2, 1300.0)
            .with_measurement(Measurement::Light, 150.0)
            .with_seating(80),
    ]
}

fn scored(id: &str, score: f64) -> ScoredRoom {
    ScoredRoom {
        room_id: id.to_string(),
        room_name: id.to_string(),
        final_score: score,
        rank: 0,
        main_scores: BTreeMap::new(),
        criteria: Vec::new(),
    }
}

// =============================================================================
// Score mapping
// =============================================================================

#[test]
fn temperature_band_scores() {
    let band = ScoringBands::default().temperature;
    assert_eq!(centered_range_score(22.0, &band), 1.0);
    assert!(approx(centered_range_score(19.0, &band), 0.75));
    // One degree past the acceptable band, decayed over the 8 degree width.
    assert!(approx(centered_range_score(27.0, &band), 0.4375));
    assert_eq!(centered_range_score(34.0, &band), 0.0);
}

#[test]
fn co2_band_scores() {
    assert_eq!(lower_is_better_score(500.0, 600.0, 1000.0), 1.0);
    assert!(approx(lower_is_better_score(800.0, 600.0, 1000.0), 0.75));
    assert!(approx(lower_is_better_score(1500.0, 600.0, 1000.0), 0.25));
    assert_eq!(lower_is_better_score(2000.0, 600.0, 1000.0), 0.0);
}

#[test]
fn seating_for_fifty_people() {
    assert_eq!(seating_score(50, 50), 1.0);
    let short = seating_score(30, 50);
    assert!(short > 0.0 && short < 1.0);
    assert!(approx(seating_score(100, 50), 0.95));
}

// =============================================================================
// Weights and aggregation
// =============================================================================

#[test]
fn identity_matrix_gives_uniform_weights_under_every_method() {
    let solver = PriorityWeightSolver::new();
    let matrix = PairwiseMatrix::new(["a", "b", "c", "d"]).unwrap();

    for method in [
        WeightMethod::PrincipalEigenvector,
        WeightMethod::GeometricMean,
        WeightMethod::NormalizedColumnSum,
    ] {
        let analysis = solver.analyze_with(&matrix, method).unwrap();
        for w in &analysis.weights {
            assert!(approx(*w, 0.25), "{}: {:?}", method, analysis.weights);
        }
        assert!(approx(analysis.consistency.cr, 0.0));
    }
}

#[test]
fn combined_interpolates_between_sum_and_product() {
    let scores: BTreeMap<&str, f64> = [("x", 0.9), ("y", 0.2)].into_iter().collect();
    let weights: BTreeMap<&str, f64> = [("x", 0.6), ("y", 0.4)].into_iter().collect();

    let sum = Aggregator::new().weighted_sum(&scores, &weights);
    let product = Aggregator::new().weighted_product(&scores, &weights);
    assert!(approx(Aggregator::new().with_alpha(1.0).combined(&scores, &weights), sum));
    assert!(approx(Aggregator::new().with_alpha(0.0).combined(&scores, &weights), product));
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn tied_rooms_share_rank() {
    let ranked = Ranker::rank(vec![scored("a", 0.82), scored("b", 0.82), scored("c", 0.60)]);
    let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 1, 3]);
}

// =============================================================================
// Engine
// =============================================================================

#[test]
fn engine_ranks_campus_rooms() {
    let mut engine = AhpEngine::new().unwrap();
    engine.set_requirements(UserRequirements {
        required_seats: 25,
        need_projector: true,
        ..UserRequirements::default()
    });
    engine.load_rooms(campus_rooms());

    for method in AggregationMethod::ALL {
        let result = engine.evaluate(method).unwrap();
        assert_eq!(result.rankings.len(), 3);
        assert_eq!(result.top().unwrap().room_id, "A-101", "{}", method);
        assert_eq!(result.rankings[2].room_id, "C-001", "{}", method);
        for room in &result.rankings {
            assert!((0.0..=1.0).contains(&room.final_score));
        }
    }
}

#[test]
fn global_weights_are_products_of_local_weights() {
    let engine = AhpEngine::new().unwrap();
    let hierarchy = engine.hierarchy();

    for main in MainCriterion::ALL {
        let main_weight = hierarchy.main_weights()[&main];
        for (leaf, local) in hierarchy.local_weights(main).unwrap() {
            assert!(approx(hierarchy.global_weight(*leaf), main_weight * local));
        }
    }
    let total: f64 = hierarchy.global_weights().values().sum();
    assert!(approx(total, 1.0));
}

#[test]
fn failed_edit_keeps_earlier_edits_applied() {
    let mut engine = AhpEngine::new().unwrap();
    let before = engine.hierarchy().main_weights()[&MainCriterion::Usability];

    let err = engine
        .set_preferences(
            &[
                PairwiseEdit::new("Usability", "Comfort", 7.0),
                PairwiseEdit::new("Usability", "Usability", 3.0),
            ],
            &BTreeMap::new(),
        )
        .unwrap_err();
    assert!(matches!(err, AhpError::SelfComparison { .. }));

    let after = engine.hierarchy().main_weights()[&MainCriterion::Usability];
    assert!(after > before);
    let total: f64 = engine.hierarchy().global_weights().values().sum();
    assert!(approx(total, 1.0));
}

#[test]
fn sub_criteria_edits_move_leaf_weight() {
    let mut engine = AhpEngine::new().unwrap();
    let before = engine.hierarchy().global_weight(LeafCriterion::Noise);

    let mut sub = BTreeMap::new();
    sub.insert(
        MainCriterion::Comfort,
        vec![
            PairwiseEdit::new("Noise", "Temperature", 5.0),
            PairwiseEdit::new("Noise", "Lighting", 5.0),
            PairwiseEdit::new("Noise", "Humidity", 5.0),
        ],
    );
    engine.set_preferences(&[], &sub).unwrap();

    assert!(engine.hierarchy().global_weight(LeafCriterion::Noise) > before);
}

#[test]
fn evaluation_is_repeatable() {
    let mut engine = AhpEngine::new().unwrap();
    engine.load_rooms(campus_rooms());

    let first = engine.evaluate(AggregationMethod::Combined).unwrap();
    let second = engine.evaluate(AggregationMethod::Combined).unwrap();
    assert_ne!(first.evaluation_id, second.evaluation_id);
    assert_eq!(first.rankings, second.rankings);
}
