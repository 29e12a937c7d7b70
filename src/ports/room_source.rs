//! Room Source Port - Interface for supplying room records.
//!
//! A data-access layer (sensor database, file export, test fixture)
//! implements this to hand the ranking pipeline a batch of rooms.

use crate::domain::ahp::{RoomRecord, UserRequirements};
use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors that can occur while loading rooms
#[derive(Debug, thiserror::Error)]
pub enum RoomSourceError {
    #[error("Room source not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Failed to parse room data: {0}")]
    ParseFailed(String),
}

impl From<RoomSourceError> for DomainError {
    fn from(err: RoomSourceError) -> Self {
        let code = match err {
            RoomSourceError::NotFound(_) | RoomSourceError::IoError(_) => {
                ErrorCode::SourceUnavailable
            }
            RoomSourceError::ParseFailed(_) => ErrorCode::InvalidInput,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Rooms plus requirements stored alongside them, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomBatch {
    pub rooms: Vec<RoomRecord>,
    pub requirements: Option<UserRequirements>,
}

impl RoomBatch {
    pub fn new(rooms: Vec<RoomRecord>) -> Self {
        Self {
            rooms,
            requirements: None,
        }
    }
}

/// Port for loading candidate rooms. Implementations are synchronous.
pub trait RoomSource: Send + Sync {
    /// Loads the current room batch.
    ///
    /// # Errors
    /// Returns `RoomSourceError` if the data cannot be read or parsed
    fn load(&self) -> Result<RoomBatch, RoomSourceError>;
}
