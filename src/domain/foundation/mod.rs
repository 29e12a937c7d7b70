//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the room ranking domain.

mod errors;
mod ids;
mod saaty;
mod timestamp;

pub use errors::{AhpError, DomainError, ErrorCode};
pub use ids::EvaluationId;
pub use saaty::{SaatyValue, SAATY_MAX, SAATY_MIN};
pub use timestamp::{TimeWindow, Timestamp};
