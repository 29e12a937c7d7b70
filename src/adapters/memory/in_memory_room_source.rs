//! In-Memory Room Source Adapter
//!
//! Serves a fixed batch of rooms. Useful for testing and for embedding the
//! ranking pipeline behind another data layer.

use crate::domain::ahp::{RoomRecord, UserRequirements};
use crate::ports::{RoomBatch, RoomSource, RoomSourceError};

/// In-memory room source
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoomSource {
    batch: RoomBatch,
}

impl InMemoryRoomSource {
    pub fn new(rooms: Vec<RoomRecord>) -> Self {
        Self {
            batch: RoomBatch::new(rooms),
        }
    }

    pub fn with_requirements(mut self, requirements: UserRequirements) -> Self {
        self.batch.requirements = Some(requirements);
        self
    }
}

impl RoomSource for InMemoryRoomSource {
    fn load(&self) -> Result<RoomBatch, RoomSourceError> {
        Ok(self.batch.clone())
    }
}
