//! In-Memory Adapters

mod in_memory_room_source;

pub use in_memory_room_source::InMemoryRoomSource;
