//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Structured failures raised by the AHP engine.
///
/// Consistency violations (CR >= 0.10) are not errors; they are reported
/// alongside normal results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AhpError {
    #[error("No rooms loaded; load rooms before evaluating")]
    NoRoomsLoaded,

    #[error("Matrix must be square: {rows} rows but row {row} has {cols} columns")]
    NonSquareMatrix { rows: usize, row: usize, cols: usize },

    #[error("Unknown {kind} method '{name}'")]
    UnknownMethod { kind: &'static str, name: String },

    #[error("Comparison value must be between 1/9 and 9, got {value}")]
    ComparisonOutOfRange { value: f64 },

    #[error("Expected {expected} weights, got {actual}")]
    WeightLengthMismatch { expected: usize, actual: usize },

    #[error("Matrix size {size} exceeds the maximum supported size of 15")]
    MatrixTooLarge { size: usize },

    #[error("Expected {expected} upper-triangle values, got {actual}")]
    UpperTriangleLength { expected: usize, actual: usize },

    #[error("Criterion '{name}' not found")]
    UnknownCriterion { name: String },

    #[error("Indices out of range: ({row}, {col}) for a {size}x{size} matrix")]
    IndexOutOfRange { row: usize, col: usize, size: usize },

    #[error("At least 2 criteria are required for pairwise comparison, got {count}")]
    TooFewCriteria { count: usize },

    #[error("Criterion '{name}' appears more than once")]
    DuplicateCriterion { name: String },

    #[error("Criterion '{name}' cannot be compared with itself")]
    SelfComparison { name: String },

    #[error("Invalid band for {measurement}: {reason}")]
    InvalidBand { measurement: String, reason: String },

    #[error("Principal eigenvector has no usable direction")]
    DegenerateEigenvector,
}

impl AhpError {
    /// Creates an unknown method error.
    pub fn unknown_method(kind: &'static str, name: impl Into<String>) -> Self {
        AhpError::UnknownMethod {
            kind,
            name: name.into(),
        }
    }

    /// Creates an unknown criterion error.
    pub fn unknown_criterion(name: impl Into<String>) -> Self {
        AhpError::UnknownCriterion { name: name.into() }
    }

    /// Creates an invalid band error.
    pub fn invalid_band(measurement: impl Into<String>, reason: impl Into<String>) -> Self {
        AhpError::InvalidBand {
            measurement: measurement.into(),
            reason: reason.into(),
        }
    }

    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AhpError::NoRoomsLoaded => ErrorCode::NoRoomsLoaded,
            AhpError::NonSquareMatrix { .. } => ErrorCode::NonSquareMatrix,
            AhpError::UnknownMethod { .. } => ErrorCode::UnknownMethod,
            AhpError::ComparisonOutOfRange { .. } => ErrorCode::OutOfRange,
            AhpError::MatrixTooLarge { .. } => ErrorCode::MatrixTooLarge,
            AhpError::WeightLengthMismatch { .. } => ErrorCode::LengthMismatch,
            AhpError::UpperTriangleLength { .. } => ErrorCode::LengthMismatch,
            AhpError::UnknownCriterion { .. } => ErrorCode::CriterionNotFound,
            AhpError::IndexOutOfRange { .. } => ErrorCode::OutOfRange,
            AhpError::TooFewCriteria { .. } => ErrorCode::ValidationFailed,
            AhpError::DuplicateCriterion { .. } => ErrorCode::ValidationFailed,
            AhpError::SelfComparison { .. } => ErrorCode::ValidationFailed,
            AhpError::InvalidBand { .. } => ErrorCode::ValidationFailed,
            AhpError::DegenerateEigenvector => ErrorCode::NumericalFailure,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    OutOfRange,
    LengthMismatch,
    NonSquareMatrix,
    MatrixTooLarge,
    UnknownMethod,

    // Lookup errors
    CriterionNotFound,

    // Precondition errors
    NoRoomsLoaded,

    // Computation errors
    NumericalFailure,

    // Infrastructure errors
    SourceUnavailable,
    InvalidInput,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::LengthMismatch => "LENGTH_MISMATCH",
            ErrorCode::NonSquareMatrix => "NON_SQUARE_MATRIX",
            ErrorCode::MatrixTooLarge => "MATRIX_TOO_LARGE",
            ErrorCode::UnknownMethod => "UNKNOWN_METHOD",
            ErrorCode::CriterionNotFound => "CRITERION_NOT_FOUND",
            ErrorCode::NoRoomsLoaded => "NO_ROOMS_LOADED",
            ErrorCode::NumericalFailure => "NUMERICAL_FAILURE",
            ErrorCode::SourceUnavailable => "SOURCE_UNAVAILABLE",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<AhpError> for DomainError {
    fn from(err: AhpError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
