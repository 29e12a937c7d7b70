//! JSON File Adapters
//!
//! ## Available Adapters
//!
//! - **JsonRoomFile** - `RoomSource` over a JSON room document
//! - **PreferenceFile** - Pairwise comparison edits from a JSON document
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::json::{JsonRoomFile, PreferenceFile};
//!
//! let source = JsonRoomFile::new("./data/rooms.json");
//! let preferences = PreferenceFile::new("./prefs.json").load()?;
//! ```

mod preference_file;
mod room_file;

pub use preference_file::PreferenceFile;
pub use room_file::JsonRoomFile;
