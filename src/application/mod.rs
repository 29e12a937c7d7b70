//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer wires the room source port and configuration to the AHP
//! engine. Ranking is a command; the weights view is a query.

pub mod handlers;

pub use handlers::{
    GetWeightsHandler, GetWeightsQuery, RankRoomsCommand, RankRoomsHandler, RankRoomsResult,
    WeightsView,
};
