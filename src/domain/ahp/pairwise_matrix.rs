//! Pairwise Matrix - Reciprocal Saaty-scale comparison matrix for one criteria group.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{AhpError, SaatyValue};

/// Relative tolerance used when checking reciprocity.
const RECIPROCITY_RTOL: f64 = 1e-5;

/// Absolute tolerance used when checking unit diagonals and reciprocity.
const MATRIX_ATOL: f64 = 1e-8;

/// Why a matrix failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixDefect {
    #[error("Diagonal element {index} must be 1, got {value}")]
    NonUnitDiagonal { index: usize, value: f64 },

    #[error("Entry ({row},{col}) must be positive, got {value}")]
    NonPositiveEntry { row: usize, col: usize, value: f64 },

    #[error("Reciprocity violated at ({row},{col}): {value} vs {mirror}")]
    BrokenReciprocity {
        row: usize,
        col: usize,
        value: f64,
        mirror: f64,
    },
}

/// A reciprocal comparison matrix over one sibling group of criteria.
///
/// Entry (i, j) states how many times more important criterion i is than
/// criterion j. Every mutation writes both (i, j) and (j, i), so the
/// reciprocal property always holds for matrices built through this API.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    criteria: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
}

impl PairwiseMatrix {
    /// Creates an indifferent matrix (all entries 1) over the given criteria.
    ///
    /// # Errors
    /// - Fewer than 2 criteria
    /// - Duplicate criterion names
    pub fn new<I, S>(criteria: I) -> Result<Self, AhpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let criteria: Vec<String> = criteria.into_iter().map(Into::into).collect();
        if criteria.len() < 2 {
            return Err(AhpError::TooFewCriteria {
                count: criteria.len(),
            });
        }

        let mut index = HashMap::with_capacity(criteria.len());
        for (i, name) in criteria.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(AhpError::DuplicateCriterion { name: name.clone() });
            }
        }

        let n = criteria.len();
        Ok(Self {
            criteria,
            index,
            values: vec![vec![1.0; n]; n],
        })
    }

    /// Creates a matrix from raw rows without enforcing reciprocity.
    ///
    /// Useful for importing externally produced matrices; call
    /// [`PairwiseMatrix::validate`] to check them.
    pub fn from_rows<I, S>(criteria: I, rows: Vec<Vec<f64>>) -> Result<Self, AhpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matrix = Self::new(criteria)?;
        let n = matrix.len();
        if rows.len() != n {
            return Err(AhpError::NonSquareMatrix {
                rows: rows.len(),
                row: 0,
                cols: n,
            });
        }
        if let Some((row, cols)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != n)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(AhpError::NonSquareMatrix { rows: n, row, cols });
        }
        matrix.values = rows;
        Ok(matrix)
    }

    /// Number of criteria in the group.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Always false; a matrix holds at least two criteria.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Criterion names in matrix order.
    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    /// Position of a criterion in the matrix.
    pub fn index_of(&self, name: &str) -> Result<usize, AhpError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| AhpError::unknown_criterion(name))
    }

    /// Sets how many times more important `a` is than `b`.
    ///
    /// Writes `value` at (a, b) and `1/value` at (b, a) in one step; nothing
    /// is written when the value is out of range.
    pub fn set(&mut self, a: &str, b: &str, value: f64) -> Result<(), AhpError> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.set_by_index(i, j, value)
    }

    /// Sets a comparison by matrix indices.
    pub fn set_by_index(&mut self, i: usize, j: usize, value: f64) -> Result<(), AhpError> {
        let n = self.len();
        if i >= n || j >= n {
            return Err(AhpError::IndexOutOfRange {
                row: i,
                col: j,
                size: n,
            });
        }
        if i == j {
            return Err(AhpError::SelfComparison {
                name: self.criteria[i].clone(),
            });
        }

        let value = SaatyValue::try_new(value)?;
        self.values[i][j] = value.value();
        self.values[j][i] = value.reciprocal().value();
        Ok(())
    }

    /// Reads the comparison of `a` against `b`.
    pub fn get(&self, a: &str, b: &str) -> Result<f64, AhpError> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.values[i][j])
    }

    /// Reads an entry by indices.
    pub fn entry(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Read-only view of the matrix rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Populates the matrix from its upper triangle.
    ///
    /// Values are consumed row by row over (0,1), (0,2), ..., (n-2,n-1).
    /// The whole load is rejected if the length is wrong or any value is out
    /// of range; the matrix is left untouched in that case.
    pub fn load_upper_triangle(&mut self, values: &[f64]) -> Result<(), AhpError> {
        let n = self.len();
        let expected = n * (n - 1) / 2;
        if values.len() != expected {
            return Err(AhpError::UpperTriangleLength {
                expected,
                actual: values.len(),
            });
        }

        let judgements = values
            .iter()
            .map(|&v| SaatyValue::try_new(v))
            .collect::<Result<Vec<_>, _>>()?;

        let mut judgements = judgements.into_iter();
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(v) = judgements.next() {
                    self.values[i][j] = v.value();
                    self.values[j][i] = v.reciprocal().value();
                }
            }
        }
        Ok(())
    }

    /// Reads back the upper triangle in the order accepted by
    /// [`PairwiseMatrix::load_upper_triangle`].
    pub fn upper_triangle(&self) -> Vec<f64> {
        let n = self.len();
        let mut out = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                out.push(self.values[i][j]);
            }
        }
        out
    }

    /// Checks the unit diagonal, positivity, and reciprocity.
    pub fn validate(&self) -> Result<(), MatrixDefect> {
        let n = self.len();

        for i in 0..n {
            let value = self.values[i][i];
            if (value - 1.0).abs() > MATRIX_ATOL {
                return Err(MatrixDefect::NonUnitDiagonal { index: i, value });
            }
        }

        for (row, values) in self.values.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value.is_nan() || value <= 0.0 {
                    return Err(MatrixDefect::NonPositiveEntry { row, col, value });
                }
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let expected = 1.0 / self.values[i][j];
                let mirror = self.values[j][i];
                if (mirror - expected).abs() > MATRIX_ATOL + RECIPROCITY_RTOL * expected.abs() {
                    return Err(MatrixDefect::BrokenReciprocity {
                        row: i,
                        col: j,
                        value: self.values[i][j],
                        mirror,
                    });
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for PairwiseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "      ")?;
        for name in &self.criteria {
            write!(f, "  {:>6}", short_label(name))?;
        }
        for (name, row) in self.criteria.iter().zip(&self.values) {
            writeln!(f)?;
            write!(f, "{:>6}", short_label(name))?;
            for value in row {
                write!(f, "  {:6.3}", value)?;
            }
        }
        Ok(())
    }
}

fn short_label(name: &str) -> String {
    name.chars().take(6).collect()
}
