//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (Saaty values, IDs, timestamps, errors)
//! - `ahp` - Criteria hierarchy, scoring, aggregation, ranking and the engine

pub mod ahp;
pub mod foundation;
