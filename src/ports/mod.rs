//! Ports - Interfaces for external dependencies.
//!
//! The engine itself never performs I/O. Room data enters through these
//! contracts, implemented by adapters.
//!
//! - `RoomSource` - Supplies room records and optional requirements

mod room_source;

pub use room_source::{RoomBatch, RoomSource, RoomSourceError};
