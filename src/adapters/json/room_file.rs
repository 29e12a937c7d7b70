//! JSON Room File Adapter
//!
//! Accepts either a bare array of rooms or an object with `rooms` and an
//! optional `requirements` block.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ahp::{RoomRecord, UserRequirements};
use crate::ports::{RoomBatch, RoomSource, RoomSourceError};

/// Room document on disk
#[derive(Debug, Clone)]
pub struct JsonRoomFile {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoomFileContents {
    List(Vec<RoomRecord>),
    Batch {
        rooms: Vec<RoomRecord>,
        #[serde(default)]
        requirements: Option<UserRequirements>,
    },
}

impl JsonRoomFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses a room document from text.
    pub fn parse(json: &str) -> Result<RoomBatch, RoomSourceError> {
        let contents: RoomFileContents =
            serde_json::from_str(json).map_err(|e| RoomSourceError::ParseFailed(e.to_string()))?;

        Ok(match contents {
            RoomFileContents::List(rooms) => RoomBatch::new(rooms),
            RoomFileContents::Batch {
                rooms,
                requirements,
            } => RoomBatch {
                rooms,
                requirements,
            },
        })
    }
}

impl RoomSource for JsonRoomFile {
    fn load(&self) -> Result<RoomBatch, RoomSourceError> {
        if !self.path.exists() {
            return Err(RoomSourceError::NotFound(self.path.display().to_string()));
        }

        let json =
            fs::read_to_string(&self.path).map_err(|e| RoomSourceError::IoError(e.to_string()))?;
        let batch = Self::parse(&json)?;

        tracing::debug!(
            path = %self.path.display(),
            rooms = batch.rooms.len(),
            has_requirements = batch.requirements.is_some(),
            "Loaded room file"
        );
        Ok(batch)
    }
}
