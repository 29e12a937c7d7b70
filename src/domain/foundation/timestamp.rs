//! Timestamp value object and time windows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }
}

/// A desired booking window. Carried with the requirements but not scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = DomainError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        TimeWindow::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Creates a window, rejecting empty or inverted ranges.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, DomainError> {
        if !start.is_before(&end) {
            return Err(DomainError::validation(
                "time_window",
                "Window start must be before its end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        self.end.duration_since(&self.start)
    }
}
