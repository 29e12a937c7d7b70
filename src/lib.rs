//! Room AHP - Multi-criteria room ranking
//!
//! This crate ranks candidate rooms with the Analytic Hierarchy Process:
//! pairwise comparisons yield criteria weights, sensor and facility data map
//! to normalized scores, and an aggregation method rolls them up into a
//! final score per room.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
