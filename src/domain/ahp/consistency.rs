//! Consistency diagnostics (λmax, CI, CR) for comparison matrices.

use serde::{Deserialize, Serialize};

use super::priority::multiply;
use crate::domain::foundation::AhpError;

/// Largest matrix with a tabulated Random Index.
pub const MAX_MATRIX_SIZE: usize = 15;

/// Standard AHP acceptability threshold for the consistency ratio.
pub const CR_THRESHOLD: f64 = 0.10;

/// Saaty's Random Index for n = 1..=15.
pub const RANDOM_INDEX: [f64; MAX_MATRIX_SIZE] = [
    0.00, 0.00, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.53, 1.56, 1.57, 1.59,
];

/// Weights at or below this are too small to divide by.
const NEAR_ZERO_WEIGHT: f64 = 1e-10;

/// CI magnitudes below this are floating-point noise from a consistent matrix.
const CI_NOISE_FLOOR: f64 = 1e-12;

/// Consistency diagnostics of one comparison matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub lambda_max: f64,
    pub ci: f64,
    pub cr: f64,
    pub is_acceptable: bool,
    pub n: usize,
    pub ri: f64,
}

impl ConsistencyReport {
    /// Derives CI and CR from λmax.
    ///
    /// Matrices of size 2 or less are consistent by construction, so their
    /// CR is exactly 0.
    pub fn from_lambda_max(lambda_max: f64, n: usize, ri: f64, threshold: f64) -> Self {
        let ci = if n <= 1 {
            0.0
        } else {
            let ci = (lambda_max - n as f64) / (n as f64 - 1.0);
            if ci.abs() < CI_NOISE_FLOOR {
                0.0
            } else {
                ci
            }
        };

        let cr = if n <= 2 || ri == 0.0 { 0.0 } else { ci / ri };

        Self {
            lambda_max,
            ci,
            cr,
            is_acceptable: cr < threshold,
            n,
            ri,
        }
    }
}

/// Random Index for an n x n matrix.
pub fn random_index(n: usize) -> Result<f64, AhpError> {
    match n {
        0 => Err(AhpError::TooFewCriteria { count: 0 }),
        n if n > MAX_MATRIX_SIZE => Err(AhpError::MatrixTooLarge { size: n }),
        n => Ok(RANDOM_INDEX[n - 1]),
    }
}

/// λmax = mean over i of (A·w)_i / w_i.
///
/// A near-zero weight contributes n instead of a division by ~0.
pub fn lambda_max(matrix: &[Vec<f64>], weights: &[f64]) -> f64 {
    let n = matrix.len();
    if n == 0 {
        return 0.0;
    }

    let product = multiply(matrix, weights);
    let total: f64 = product
        .iter()
        .zip(weights)
        .map(|(aw, &w)| if w > NEAR_ZERO_WEIGHT { aw / w } else { n as f64 })
        .sum();
    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_index_matches_table() {
        assert_eq!(random_index(1).unwrap(), 0.0);
        assert_eq!(random_index(3).unwrap(), 0.58);
        assert_eq!(random_index(4).unwrap(), 0.90);
        assert_eq!(random_index(15).unwrap(), 1.59);
    }

    #[test]
    fn random_index_undefined_above_fifteen() {
        assert_eq!(
            random_index(16).unwrap_err(),
            AhpError::MatrixTooLarge { size: 16 }
        );
    }

    #[test]
    fn lambda_max_of_consistent_matrix_is_n() {
        let m = vec![
            vec![1.0, 2.0, 4.0],
            vec![0.5, 1.0, 2.0],
            vec![0.25, 0.5, 1.0],
        ];
        let w = [4.0 / 7.0, 2.0 / 7.0, 1.0 / 7.0];
        assert!((lambda_max(&m, &w) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn near_zero_weight_contributes_n() {
        let m = vec![vec![1.0, 9.0], vec![1.0 / 9.0, 1.0]];
        let lm = lambda_max(&m, &[1.0, 0.0]);
        // Row 0: (1*1 + 9*0) / 1 = 1; row 1 contributes n = 2.
        assert!((lm - 1.5).abs() < 1e-12);
        assert!(lm.is_finite());
    }

    #[test]
    fn single_criterion_has_zero_ci() {
        let report = ConsistencyReport::from_lambda_max(1.0, 1, 0.0, CR_THRESHOLD);
        assert_eq!(report.ci, 0.0);
        assert_eq!(report.cr, 0.0);
    }

    #[test]
    fn cr_is_ci_over_ri() {
        let report = ConsistencyReport::from_lambda_max(4.27, 4, 0.90, CR_THRESHOLD);
        assert!((report.ci - 0.09).abs() < 1e-12);
        assert!((report.cr - 0.1).abs() < 1e-12);
        assert!(!report.is_acceptable);
    }

    #[test]
    fn report_serializes_all_fields() {
        let report = ConsistencyReport::from_lambda_max(3.0, 3, 0.58, CR_THRESHOLD);
        let json = serde_json::to_value(report).unwrap();
        for key in ["lambda_max", "ci", "cr", "is_acceptable", "n", "ri"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
