//! Priority Weight Solver - Weight extraction from comparison matrices.
//!
//! The principal eigenvector is the canonical AHP weighting. The row
//! geometric mean and normalized column sum methods are cheaper
//! approximations kept for validation; they are never substituted silently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::consistency::{self, ConsistencyReport, CR_THRESHOLD};
use super::PairwiseMatrix;
use crate::domain::foundation::AhpError;

/// How priority weights are derived from a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMethod {
    #[default]
    PrincipalEigenvector,
    GeometricMean,
    NormalizedColumnSum,
}

impl WeightMethod {
    /// Canonical name used in configuration and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightMethod::PrincipalEigenvector => "principal_eigenvector",
            WeightMethod::GeometricMean => "geometric_mean",
            WeightMethod::NormalizedColumnSum => "normalized_column_sum",
        }
    }
}

impl fmt::Display for WeightMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightMethod {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "principal_eigenvector" | "eigenvector" => Ok(WeightMethod::PrincipalEigenvector),
            "geometric_mean" => Ok(WeightMethod::GeometricMean),
            "normalized_column_sum" | "normalized_sum" => Ok(WeightMethod::NormalizedColumnSum),
            _ => Err(AhpError::unknown_method("weighting", s)),
        }
    }
}

/// An eigenvalue together with its eigenvector.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenpair {
    pub value: f64,
    pub vector: Vec<f64>,
}

/// Linear-algebra backend producing the principal eigenpair of a square matrix.
///
/// "Principal" means the eigenvalue with the largest real part. Sign and
/// scale of the returned vector are unspecified; the solver normalizes them.
pub trait EigenBackend {
    fn principal_eigenpair(&self, matrix: &[Vec<f64>]) -> Result<Eigenpair, AhpError>;
}

/// Power iteration.
///
/// For a positive matrix the Perron root is real, simple, and strictly
/// dominant in modulus, so it is also the eigenvalue with the largest real
/// part and power iteration converges to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerIteration {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for PowerIteration {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            tolerance: 1e-12,
        }
    }
}

impl EigenBackend for PowerIteration {
    fn principal_eigenpair(&self, matrix: &[Vec<f64>]) -> Result<Eigenpair, AhpError> {
        let n = matrix.len();
        let mut vector = vec![1.0 / n as f64; n];

        for _ in 0..self.max_iterations {
            let next = multiply(matrix, &vector);
            let norm: f64 = next.iter().map(|v| v.abs()).sum();
            if !norm.is_finite() || norm <= f64::EPSILON {
                return Err(AhpError::DegenerateEigenvector);
            }

            let next: Vec<f64> = next.into_iter().map(|v| v / norm).collect();
            let delta = next
                .iter()
                .zip(&vector)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            vector = next;
            if delta < self.tolerance {
                break;
            }
        }

        let product = multiply(matrix, &vector);
        let value = dot(&vector, &product) / dot(&vector, &vector);
        Ok(Eigenpair { value, vector })
    }
}

/// Weights plus the consistency diagnostics of one matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityAnalysis {
    pub weights: Vec<f64>,
    pub consistency: ConsistencyReport,
}

/// Derives normalized weight vectors and consistency diagnostics.
#[derive(Debug, Clone)]
pub struct PriorityWeightSolver<B = PowerIteration> {
    backend: B,
    threshold: f64,
}

impl PriorityWeightSolver<PowerIteration> {
    /// Creates a solver using power iteration and the 0.10 CR threshold.
    pub fn new() -> Self {
        Self::with_backend(PowerIteration::default())
    }
}

impl Default for PriorityWeightSolver<PowerIteration> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: EigenBackend> PriorityWeightSolver<B> {
    /// Creates a solver around another linear-algebra backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            threshold: CR_THRESHOLD,
        }
    }

    /// Overrides the CR acceptability threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Computes weights summing to 1 for a square matrix.
    ///
    /// # Errors
    /// - Matrix not square (or empty)
    /// - Degenerate principal eigenvector
    pub fn weights(&self, matrix: &[Vec<f64>], method: WeightMethod) -> Result<Vec<f64>, AhpError> {
        let n = square_size(matrix)?;

        let raw = match method {
            WeightMethod::PrincipalEigenvector => {
                let mut vector = self.backend.principal_eigenpair(matrix)?.vector;
                if vector.iter().any(|&v| v < 0.0) {
                    vector.iter_mut().for_each(|v| *v = -*v);
                }
                let weights = normalize(vector)?;
                // A mixed-sign eigenvector has no valid orientation.
                if weights.iter().any(|&w| w < 0.0) {
                    return Err(AhpError::DegenerateEigenvector);
                }
                return Ok(weights);
            }
            WeightMethod::GeometricMean => matrix
                .iter()
                .map(|row| row.iter().product::<f64>().powf(1.0 / n as f64))
                .collect(),
            WeightMethod::NormalizedColumnSum => {
                let column_sums: Vec<f64> = (0..n)
                    .map(|j| matrix.iter().map(|row| row[j]).sum())
                    .collect();
                matrix
                    .iter()
                    .map(|row| {
                        row.iter()
                            .zip(&column_sums)
                            .map(|(v, sum)| v / sum)
                            .sum::<f64>()
                            / n as f64
                    })
                    .collect()
            }
        };

        normalize(raw)
    }

    /// Computes consistency diagnostics, deriving eigenvector weights when
    /// none are supplied.
    ///
    /// # Errors
    /// - Matrix not square, or larger than 15
    /// - Supplied weights of the wrong length
    pub fn consistency(
        &self,
        matrix: &[Vec<f64>],
        weights: Option<&[f64]>,
    ) -> Result<ConsistencyReport, AhpError> {
        let n = square_size(matrix)?;
        let ri = consistency::random_index(n)?;

        let owned;
        let weights = match weights {
            Some(w) => w,
            None => {
                owned = self.weights(matrix, WeightMethod::PrincipalEigenvector)?;
                &owned
            }
        };
        if weights.len() != n {
            return Err(AhpError::WeightLengthMismatch {
                expected: n,
                actual: weights.len(),
            });
        }

        Ok(ConsistencyReport::from_lambda_max(
            consistency::lambda_max(matrix, weights),
            n,
            ri,
            self.threshold,
        ))
    }

    /// Canonical weights and consistency for a pairwise matrix in one pass.
    pub fn analyze(&self, matrix: &PairwiseMatrix) -> Result<PriorityAnalysis, AhpError> {
        self.analyze_with(matrix, WeightMethod::PrincipalEigenvector)
    }

    /// Like [`analyze`](Self::analyze) with an explicitly chosen method.
    ///
    /// λmax is evaluated against the weights the method produced.
    pub fn analyze_with(
        &self,
        matrix: &PairwiseMatrix,
        method: WeightMethod,
    ) -> Result<PriorityAnalysis, AhpError> {
        let rows = matrix.rows();
        let weights = self.weights(rows, method)?;
        let consistency = self.consistency(rows, Some(&weights))?;
        Ok(PriorityAnalysis {
            weights,
            consistency,
        })
    }
}

/// Returns n for an n x n matrix.
fn square_size(matrix: &[Vec<f64>]) -> Result<usize, AhpError> {
    let n = matrix.len();
    if n == 0 {
        return Err(AhpError::TooFewCriteria { count: 0 });
    }
    if let Some((row, cols)) = matrix
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != n)
        .map(|(i, r)| (i, r.len()))
    {
        return Err(AhpError::NonSquareMatrix { rows: n, row, cols });
    }
    Ok(n)
}

fn normalize(vector: Vec<f64>) -> Result<Vec<f64>, AhpError> {
    let sum: f64 = vector.iter().sum();
    if !sum.is_finite() || sum.abs() <= f64::EPSILON {
        return Err(AhpError::DegenerateEigenvector);
    }
    Ok(vector.into_iter().map(|v| v / sum).collect())
}

pub(crate) fn multiply(matrix: &[Vec<f64>], vector: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| dot(row, vector)).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const METHODS: [WeightMethod; 3] = [
        WeightMethod::PrincipalEigenvector,
        WeightMethod::GeometricMean,
        WeightMethod::NormalizedColumnSum,
    ];

    fn ones(n: usize) -> Vec<Vec<f64>> {
        vec![vec![1.0; n]; n]
    }

    /// Perfectly consistent matrix built from known weights: a[i][j] = w_i / w_j.
    fn consistent(weights: &[f64]) -> Vec<Vec<f64>> {
        weights
            .iter()
            .map(|wi| weights.iter().map(|wj| wi / wj).collect())
            .collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tol, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn identity_matrix_gives_uniform_weights_for_every_method() {
        let solver = PriorityWeightSolver::new();
        for method in METHODS {
            let w = solver.weights(&ones(4), method).unwrap();
            assert_close(&w, &[0.25; 4], 1e-12);
        }
    }

    #[test]
    fn identity_matrix_is_perfectly_consistent() {
        let report = PriorityWeightSolver::new().consistency(&ones(5), None).unwrap();
        assert_eq!(report.cr, 0.0);
        assert!((report.lambda_max - 5.0).abs() < 1e-9);
        assert!(report.is_acceptable);
    }

    #[test]
    fn consistent_matrix_recovers_generating_weights() {
        let expected = [0.5, 0.3, 0.2];
        let solver = PriorityWeightSolver::new();
        for method in METHODS {
            let w = solver.weights(&consistent(&expected), method).unwrap();
            assert_close(&w, &expected, 1e-9);
        }
    }

    #[test]
    fn eigenvector_matches_saaty_textbook_example() {
        // Saaty's 3x3 example: [[1, 3, 5], [1/3, 1, 3], [1/5, 1/3, 1]]
        let m = vec![
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 3.0],
            vec![0.2, 1.0 / 3.0, 1.0],
        ];
        let solver = PriorityWeightSolver::new();
        let w = solver.weights(&m, WeightMethod::PrincipalEigenvector).unwrap();
        assert_close(&w, &[0.6370, 0.2583, 0.1047], 1e-4);

        let report = solver.consistency(&m, Some(&w)).unwrap();
        assert!((report.lambda_max - 3.0385).abs() < 1e-3);
        assert!((report.cr - 0.0332).abs() < 1e-3);
        assert!(report.is_acceptable);
    }

    #[test]
    fn contradictory_judgements_are_flagged_not_rejected() {
        // A > B, B > C, but C > A.
        let m = vec![
            vec![1.0, 5.0, 1.0 / 5.0],
            vec![1.0 / 5.0, 1.0, 5.0],
            vec![5.0, 1.0 / 5.0, 1.0],
        ];
        let report = PriorityWeightSolver::new().consistency(&m, None).unwrap();
        assert!(report.cr > CR_THRESHOLD);
        assert!(!report.is_acceptable);
    }

    #[test]
    fn two_by_two_has_zero_cr() {
        let m = vec![vec![1.0, 7.0], vec![1.0 / 7.0, 1.0]];
        let report = PriorityWeightSolver::new().consistency(&m, None).unwrap();
        assert_eq!(report.cr, 0.0);
        assert_eq!(report.ri, 0.0);
        assert!(report.is_acceptable);
    }

    #[test]
    fn custom_threshold_changes_acceptability() {
        let m = vec![
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 3.0],
            vec![0.2, 1.0 / 3.0, 1.0],
        ];
        let strict = PriorityWeightSolver::new().with_threshold(0.01);
        assert!(!strict.consistency(&m, None).unwrap().is_acceptable);
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let m = vec![vec![1.0, 2.0], vec![0.5]];
        let solver = PriorityWeightSolver::new();
        assert!(matches!(
            solver.weights(&m, WeightMethod::GeometricMean),
            Err(AhpError::NonSquareMatrix { .. })
        ));
        assert!(matches!(
            solver.consistency(&m, None),
            Err(AhpError::NonSquareMatrix { .. })
        ));
    }

    #[test]
    fn oversized_matrix_has_no_consistency() {
        let err = PriorityWeightSolver::new()
            .consistency(&ones(16), None)
            .unwrap_err();
        assert_eq!(err, AhpError::MatrixTooLarge { size: 16 });
    }

    #[test]
    fn oversized_matrix_still_has_weights() {
        let w = PriorityWeightSolver::new()
            .weights(&ones(16), WeightMethod::PrincipalEigenvector)
            .unwrap();
        assert_eq!(w.len(), 16);
    }

    #[test]
    fn weight_length_mismatch_is_rejected() {
        let err = PriorityWeightSolver::new()
            .consistency(&ones(3), Some(&[0.5, 0.5]))
            .unwrap_err();
        assert_eq!(
            err,
            AhpError::WeightLengthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn unknown_method_name_is_rejected() {
        assert!(matches!(
            "power_mean".parse::<WeightMethod>(),
            Err(AhpError::UnknownMethod { kind: "weighting", .. })
        ));
        assert_eq!(
            "eigenvector".parse::<WeightMethod>().unwrap(),
            WeightMethod::PrincipalEigenvector
        );
        assert_eq!(
            "normalized_sum".parse::<WeightMethod>().unwrap(),
            WeightMethod::NormalizedColumnSum
        );
    }

    struct NegatedBackend;

    impl EigenBackend for NegatedBackend {
        fn principal_eigenpair(&self, matrix: &[Vec<f64>]) -> Result<Eigenpair, AhpError> {
            let mut pair = PowerIteration::default().principal_eigenpair(matrix)?;
            pair.vector.iter_mut().for_each(|v| *v = -*v * 3.0);
            Ok(pair)
        }
    }

    #[test]
    fn backend_sign_and_scale_are_normalized_away() {
        let expected = [0.6, 0.4];
        let solver = PriorityWeightSolver::with_backend(NegatedBackend);
        let w = solver
            .weights(&consistent(&expected), WeightMethod::PrincipalEigenvector)
            .unwrap();
        assert_close(&w, &expected, 1e-9);
    }

    struct MixedSignBackend;

    impl EigenBackend for MixedSignBackend {
        fn principal_eigenpair(&self, _matrix: &[Vec<f64>]) -> Result<Eigenpair, AhpError> {
            Ok(Eigenpair {
                value: 2.0,
                vector: vec![0.7, -0.1],
            })
        }
    }

    #[test]
    fn mixed_sign_eigenvector_is_degenerate() {
        let solver = PriorityWeightSolver::with_backend(MixedSignBackend);
        let err = solver
            .weights(&consistent(&[0.6, 0.4]), WeightMethod::PrincipalEigenvector)
            .unwrap_err();
        assert_eq!(err, AhpError::DegenerateEigenvector);
    }

    #[test]
    fn analyze_combines_weights_and_consistency() {
        let mut m = PairwiseMatrix::new(["A", "B", "C"]).unwrap();
        m.load_upper_triangle(&[2.0, 4.0, 2.0]).unwrap();

        let analysis = PriorityWeightSolver::new().analyze(&m).unwrap();
        assert_close(&analysis.weights, &[4.0 / 7.0, 2.0 / 7.0, 1.0 / 7.0], 1e-9);
        assert_eq!(analysis.consistency.n, 3);
        assert!(analysis.consistency.cr.abs() < 1e-9);
    }

    fn reciprocal_matrix(n: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
        prop::collection::vec(1.0f64 / 9.0..=9.0, n * (n - 1) / 2).prop_map(move |upper| {
            let mut m = vec![vec![1.0; n]; n];
            let mut k = 0;
            for i in 0..n {
                for j in (i + 1)..n {
                    m[i][j] = upper[k];
                    m[j][i] = 1.0 / upper[k];
                    k += 1;
                }
            }
            m
        })
    }

    proptest! {
        #[test]
        fn weights_sum_to_one_for_all_methods(m in (2usize..=8).prop_flat_map(reciprocal_matrix)) {
            let solver = PriorityWeightSolver::new();
            for method in METHODS {
                let w = solver.weights(&m, method).unwrap();
                let sum: f64 = w.iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-6);
                prop_assert!(w.iter().all(|&x| x >= 0.0));
            }
        }

        #[test]
        fn lambda_max_never_below_n(m in (3usize..=8).prop_flat_map(reciprocal_matrix)) {
            let report = PriorityWeightSolver::new().consistency(&m, None).unwrap();
            prop_assert!(report.lambda_max >= report.n as f64 - 1e-6);
            prop_assert!(report.ci >= -1e-6);
        }
    }
}
