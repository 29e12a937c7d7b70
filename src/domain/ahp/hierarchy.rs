//! Criteria Hierarchy - Comparison matrices and their derived weights.
//!
//! One matrix compares the main criteria; one matrix per main criterion
//! compares its leaves. Weights and consistency are recomputed whenever a
//! matrix is written, and global weights follow every change.
//!
//! Callers never get mutable access to a matrix. All writes go through
//! [`CriteriaHierarchy::set_preferences`], which keeps the caches in step
//! with the matrices even when an edit is rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

use super::aggregation::HierarchyWeights;
use super::consistency::ConsistencyReport;
use super::criteria::{Criterion, LeafCriterion, MainCriterion};
use super::pairwise_matrix::PairwiseMatrix;
use super::priority::{PriorityWeightSolver, WeightMethod};
use crate::domain::foundation::AhpError;

/// Label of the main-criteria matrix in diagnostics.
pub const MAIN_GROUP: &str = "main";

/// Seed comparisons for the main criteria, upper triangle in row-major order.
const MAIN_SEED: [f64; 3] = [1.2, 2.0, 1.5];

/// Seed comparisons for a leaf group, upper triangle in row-major order.
fn group_seed(main: MainCriterion) -> &'static [f64] {
    match main {
        // Temperature, Lighting, Noise, Humidity
        MainCriterion::Comfort => &[2.0, 2.0, 3.0, 1.0, 2.0, 2.0],
        // CO2, AirQuality, VOC
        MainCriterion::Health => &[2.0, 2.0, 1.5],
        // SeatingCapacity, Equipment, AVFacilities
        MainCriterion::Usability => &[2.0, 3.0, 2.0],
    }
}

/// One pairwise comparison: `a` is `value` times as important as `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseEdit {
    pub a: String,
    pub b: String,
    pub value: f64,
}

impl PairwiseEdit {
    pub fn new(a: impl Into<String>, b: impl Into<String>, value: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            value,
        }
    }
}

/// A batch of edits: main-level comparisons plus comparisons per group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceSet {
    pub main: Vec<PairwiseEdit>,
    pub sub: BTreeMap<MainCriterion, Vec<PairwiseEdit>>,
}

impl PreferenceSet {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.sub.values().all(Vec::is_empty)
    }
}

/// A sibling group: its matrix and the weights derived from it.
#[derive(Debug, Clone)]
struct GroupState<C: Criterion> {
    label: &'static str,
    members: Vec<C>,
    matrix: PairwiseMatrix,
    weights: BTreeMap<C, f64>,
    consistency: ConsistencyReport,
}

impl<C: Criterion> GroupState<C> {
    fn seeded(
        label: &'static str,
        members: &[C],
        seed: &[f64],
        solver: &PriorityWeightSolver,
        method: WeightMethod,
    ) -> Result<Self, AhpError> {
        let mut matrix = PairwiseMatrix::new(members.iter().map(|c| c.name()))?;
        matrix.load_upper_triangle(seed)?;

        let analysis = solver.analyze_with(&matrix, method)?;
        let mut group = Self {
            label,
            members: members.to_vec(),
            matrix,
            weights: BTreeMap::new(),
            consistency: analysis.consistency,
        };
        group.store(analysis.weights, analysis.consistency);
        Ok(group)
    }

    /// Applies edits in order, stopping at the first invalid one.
    ///
    /// Weights are recomputed whether or not an edit failed, so earlier
    /// edits of the batch are reflected.
    fn apply(
        &mut self,
        edits: &[PairwiseEdit],
        solver: &PriorityWeightSolver,
        method: WeightMethod,
    ) -> Result<(), AhpError> {
        let applied = edits.iter().try_for_each(|edit| {
            let a: C = edit.a.parse()?;
            let b: C = edit.b.parse()?;
            self.matrix.set(a.name(), b.name(), edit.value)
        });
        self.recompute(solver, method)?;
        applied
    }

    fn recompute(
        &mut self,
        solver: &PriorityWeightSolver,
        method: WeightMethod,
    ) -> Result<(), AhpError> {
        let analysis = solver.analyze_with(&self.matrix, method)?;
        self.store(analysis.weights, analysis.consistency);
        Ok(())
    }

    fn store(&mut self, weights: Vec<f64>, consistency: ConsistencyReport) {
        self.weights = self.members.iter().copied().zip(weights).collect();
        self.consistency = consistency;

        tracing::debug!(
            group = self.label,
            cr = consistency.cr,
            lambda_max = consistency.lambda_max,
            "Recomputed group weights"
        );
        if !consistency.is_acceptable {
            tracing::warn!(
                group = self.label,
                cr = consistency.cr,
                "Comparisons are inconsistent; consider revising them"
            );
        }
    }
}

/// The two-level criteria tree with cached weights.
#[derive(Debug, Clone)]
pub struct CriteriaHierarchy {
    solver: PriorityWeightSolver,
    method: WeightMethod,
    main: GroupState<MainCriterion>,
    groups: BTreeMap<MainCriterion, GroupState<LeafCriterion>>,
    global: BTreeMap<LeafCriterion, f64>,
}

impl CriteriaHierarchy {
    /// Builds the hierarchy from the default seed comparisons using
    /// principal-eigenvector weights.
    pub fn new() -> Result<Self, AhpError> {
        Self::with_solver(PriorityWeightSolver::new(), WeightMethod::default())
    }

    pub fn with_method(method: WeightMethod) -> Result<Self, AhpError> {
        Self::with_solver(PriorityWeightSolver::new(), method)
    }

    pub fn with_solver(solver: PriorityWeightSolver, method: WeightMethod) -> Result<Self, AhpError> {
        let main = GroupState::seeded(MAIN_GROUP, &MainCriterion::ALL, &MAIN_SEED, &solver, method)?;
        let groups = MainCriterion::ALL
            .iter()
            .map(|&m| {
                GroupState::seeded(m.name(), m.sub_criteria(), group_seed(m), &solver, method)
                    .map(|group| (m, group))
            })
            .collect::<Result<BTreeMap<_, _>, AhpError>>()?;

        let mut hierarchy = Self {
            solver,
            method,
            main,
            groups,
            global: BTreeMap::new(),
        };
        hierarchy.recompute_global();
        Ok(hierarchy)
    }

    pub fn weight_method(&self) -> WeightMethod {
        self.method
    }

    /// Applies main-level and per-group edits, then refreshes global weights.
    ///
    /// Processing stops at the first invalid edit. Edits already applied stay
    /// applied and all caches reflect them when the error is returned.
    pub fn set_preferences(
        &mut self,
        main_edits: &[PairwiseEdit],
        sub_edits: &BTreeMap<MainCriterion, Vec<PairwiseEdit>>,
    ) -> Result<(), AhpError> {
        let result = self.apply_all(main_edits, sub_edits);
        self.recompute_global();
        result
    }

    fn apply_all(
        &mut self,
        main_edits: &[PairwiseEdit],
        sub_edits: &BTreeMap<MainCriterion, Vec<PairwiseEdit>>,
    ) -> Result<(), AhpError> {
        if !main_edits.is_empty() {
            self.main.apply(main_edits, &self.solver, self.method)?;
        }
        for (main, edits) in sub_edits.iter().filter(|(_, e)| !e.is_empty()) {
            if let Some(group) = self.groups.get_mut(main) {
                group.apply(edits, &self.solver, self.method)?;
            }
        }
        Ok(())
    }

    fn recompute_global(&mut self) {
        self.global = self
            .groups
            .iter()
            .flat_map(|(main, group)| {
                let main_weight = self.main.weights.get(main).copied().unwrap_or(0.0);
                group
                    .weights
                    .iter()
                    .map(move |(leaf, w)| (*leaf, main_weight * w))
            })
            .collect();
    }

    pub fn main_weights(&self) -> &BTreeMap<MainCriterion, f64> {
        &self.main.weights
    }

    /// Weights of a group's leaves relative to each other.
    pub fn local_weights(&self, main: MainCriterion) -> Option<&BTreeMap<LeafCriterion, f64>> {
        self.groups.get(&main).map(|g| &g.weights)
    }

    /// Leaf weight relative to the whole hierarchy (main × local).
    pub fn global_weights(&self) -> &BTreeMap<LeafCriterion, f64> {
        &self.global
    }

    pub fn global_weight(&self, leaf: LeafCriterion) -> f64 {
        self.global.get(&leaf).copied().unwrap_or(0.0)
    }

    /// Snapshot consumed by aggregation.
    pub fn weights(&self) -> HierarchyWeights {
        HierarchyWeights {
            main: self.main.weights.clone(),
            groups: self
                .groups
                .iter()
                .map(|(m, g)| (*m, g.weights.clone()))
                .collect(),
        }
    }

    pub fn main_matrix(&self) -> &PairwiseMatrix {
        &self.main.matrix
    }

    pub fn group_matrix(&self, main: MainCriterion) -> Option<&PairwiseMatrix> {
        self.groups.get(&main).map(|g| &g.matrix)
    }

    /// Full diagnostics per matrix, keyed "main" or by main criterion.
    pub fn consistency_reports(&self) -> BTreeMap<String, ConsistencyReport> {
        std::iter::once((MAIN_GROUP.to_string(), self.main.consistency))
            .chain(
                self.groups
                    .values()
                    .map(|g| (g.label.to_string(), g.consistency)),
            )
            .collect()
    }

    pub fn consistency_ratios(&self) -> BTreeMap<String, f64> {
        self.consistency_reports()
            .into_iter()
            .map(|(k, r)| (k, r.cr))
            .collect()
    }

    /// False when any matrix in the hierarchy is inconsistent.
    pub fn is_consistent(&self) -> bool {
        self.main.consistency.is_acceptable
            && self.groups.values().all(|g| g.consistency.is_acceptable)
    }

    /// Text report of main, local and global weights plus consistency.
    pub fn summary(&self) -> String {
        let rule = "=".repeat(40);
        let mut out = String::new();
        let _ = writeln!(out, "{}\nAHP WEIGHTS SUMMARY\n{}\n", rule, rule);

        let _ = writeln!(out, "MAIN CRITERIA:");
        for (main, w) in &self.main.weights {
            let _ = writeln!(out, "  {}: {:.4} ({:.1}%)", main, w, w * 100.0);
        }

        let _ = writeln!(out, "\nSUB-CRITERIA:");
        for (main, group) in &self.groups {
            let _ = writeln!(out, "\n  {}:", main);
            for (leaf, w) in &group.weights {
                let _ = writeln!(
                    out,
                    "    {}: {:.4} (global: {:.4})",
                    leaf,
                    w,
                    self.global_weight(*leaf)
                );
            }
        }

        let _ = writeln!(out, "\nCONSISTENCY RATIOS:");
        let mut reports = vec![(MAIN_GROUP, self.main.consistency)];
        reports.extend(self.groups.values().map(|g| (g.label, g.consistency)));
        for (label, report) in reports {
            let status = if report.is_acceptable { "ok" } else { "INCONSISTENT" };
            let _ = writeln!(out, "  {}: {:.4} {}", label, report.cr, status);
        }

        out
    }
}
