//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external data:
//! - `json` - Room and preference documents on disk
//! - `memory` - In-memory room source (testing/embedding)

pub mod json;
pub mod memory;

pub use json::{JsonRoomFile, PreferenceFile};
pub use memory::InMemoryRoomSource;
