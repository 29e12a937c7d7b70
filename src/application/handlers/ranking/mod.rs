//! Room ranking handlers.

mod get_weights;
mod rank_rooms;

pub use get_weights::{GetWeightsHandler, GetWeightsQuery, WeightsView};
pub use rank_rooms::{RankRoomsCommand, RankRoomsHandler, RankRoomsResult};
