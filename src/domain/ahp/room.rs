//! Room records, user requirements, and the facility pre-filter.

use serde::{Deserialize, Serialize};

use super::score_mapping::Measurement;
use crate::domain::foundation::TimeWindow;

/// Immutable snapshot of one candidate room.
///
/// Every sensor measurement is optional. When deserialized, a missing `id`
/// falls back to the room name and facility fields default to 0/false.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RoomDocument")]
pub struct RoomRecord {
    pub id: String,
    pub name: String,

    pub temperature: Option<f64>,
    pub co2: Option<f64>,
    pub humidity: Option<f64>,
    pub light: Option<f64>,
    pub noise: Option<f64>,
    pub voc: Option<f64>,
    pub air_quality: Option<f64>,

    pub seating_capacity: u32,
    pub has_projector: bool,
    pub computers: u32,
    pub has_robots: bool,
}

impl RoomRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Raw reading for a measurement, if the room has one.
    pub fn measurement(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::Co2 => self.co2,
            Measurement::Humidity => self.humidity,
            Measurement::Light => self.light,
            Measurement::Noise => self.noise,
            Measurement::Voc => self.voc,
            Measurement::AirQuality => self.air_quality,
        }
    }

    pub fn with_measurement(mut self, measurement: Measurement, value: f64) -> Self {
        let slot = match measurement {
            Measurement::Temperature => &mut self.temperature,
            Measurement::Co2 => &mut self.co2,
            Measurement::Humidity => &mut self.humidity,
            Measurement::Light => &mut self.light,
            Measurement::Noise => &mut self.noise,
            Measurement::Voc => &mut self.voc,
            Measurement::AirQuality => &mut self.air_quality,
        };
        *slot = Some(value);
        self
    }

    pub fn with_seating(mut self, seats: u32) -> Self {
        self.seating_capacity = seats;
        self
    }

    pub fn with_projector(mut self, has_projector: bool) -> Self {
        self.has_projector = has_projector;
        self
    }

    pub fn with_computers(mut self, computers: u32) -> Self {
        self.computers = computers;
        self
    }
}

/// Wire shape of a room, before the id fallback is applied.
#[derive(Deserialize)]
struct RoomDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    co2: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default)]
    light: Option<f64>,
    #[serde(default)]
    noise: Option<f64>,
    #[serde(default)]
    voc: Option<f64>,
    #[serde(default)]
    air_quality: Option<f64>,
    #[serde(default)]
    seating_capacity: u32,
    #[serde(default)]
    has_projector: bool,
    #[serde(default)]
    computers: u32,
    #[serde(default)]
    has_robots: bool,
}

impl From<RoomDocument> for RoomRecord {
    fn from(doc: RoomDocument) -> Self {
        Self {
            id: doc
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| doc.name.clone()),
            name: doc.name,
            temperature: doc.temperature,
            co2: doc.co2,
            humidity: doc.humidity,
            light: doc.light,
            noise: doc.noise,
            voc: doc.voc,
            air_quality: doc.air_quality,
            seating_capacity: doc.seating_capacity,
            has_projector: doc.has_projector,
            computers: doc.computers,
            has_robots: doc.has_robots,
        }
    }
}

/// What the user asked for. Drives the facility scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRequirements {
    pub required_seats: u32,
    pub need_projector: bool,
    pub need_computers: u32,
    /// Desired booking window. Not used for scoring.
    pub time_window: Option<TimeWindow>,
}

/// Hard facility requirements applied before ranking.
///
/// Rooms that fail the filter are excluded, not scored 0. `None` means the
/// attribute is not filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityFilter {
    pub min_seating: Option<u32>,
    pub projector: Option<bool>,
    pub computers: Option<bool>,
}

impl FacilityFilter {
    /// True when no attribute is filtered on.
    pub fn is_empty(&self) -> bool {
        self.min_seating.is_none() && self.projector.is_none() && self.computers.is_none()
    }

    pub fn admits(&self, room: &RoomRecord) -> bool {
        if let Some(min) = self.min_seating {
            if room.seating_capacity < min {
                return false;
            }
        }
        if let Some(projector) = self.projector {
            if room.has_projector != projector {
                return false;
            }
        }
        if let Some(computers) = self.computers {
            if (room.computers > 0) != computers {
                return false;
            }
        }
        true
    }

    /// Keeps the rooms that satisfy every filtered attribute.
    pub fn apply(&self, rooms: Vec<RoomRecord>) -> Vec<RoomRecord> {
        rooms.into_iter().filter(|room| self.admits(room)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_falls_back_to_name() {
        let room: RoomRecord = serde_json::from_str(r#"{"name": "B-201"}"#).unwrap();
        assert_eq!(room.id, "B-201");
        assert_eq!(room.name, "B-201");
    }

    #[test]
    fn explicit_id_is_kept() {
        let room: RoomRecord = serde_json::from_str(r#"{"id": "r1", "name": "B-201"}"#).unwrap();
        assert_eq!(room.id, "r1");
    }

    #[test]
    fn missing_fields_default() {
        let room: RoomRecord =
            serde_json::from_str(r#"{"name": "Lab", "temperature": 21.5}"#).unwrap();
        assert_eq!(room.temperature, Some(21.5));
        assert_eq!(room.co2, None);
        assert_eq!(room.seating_capacity, 0);
        assert!(!room.has_projector);
        assert_eq!(room.computers, 0);
    }

    #[test]
    fn null_measurement_is_absent() {
        let room: RoomRecord = serde_json::from_str(r#"{"name": "Lab", "voc": null}"#).unwrap();
        assert_eq!(room.measurement(Measurement::Voc), None);
    }

    #[test]
    fn builder_sets_measurements() {
        let room = RoomRecord::new("r1", "Room 1")
            .with_measurement(Measurement::AirQuality, 40.0)
            .with_seating(30);
        assert_eq!(room.measurement(Measurement::AirQuality), Some(40.0));
        assert_eq!(room.seating_capacity, 30);
    }

    #[test]
    fn requirements_deserialize_partially() {
        let req: UserRequirements = serde_json::from_str(r#"{"required_seats": 25}"#).unwrap();
        assert_eq!(req.required_seats, 25);
        assert!(!req.need_projector);
        assert!(req.time_window.is_none());
    }

    #[test]
    fn empty_filter_admits_everything() {
        let filter = FacilityFilter::default();
        assert!(filter.is_empty());
        assert!(filter.admits(&RoomRecord::new("r", "r")));
    }

    #[test]
    fn filter_excludes_small_rooms() {
        let filter = FacilityFilter {
            min_seating: Some(50),
            ..FacilityFilter::default()
        };
        let rooms = vec![
            RoomRecord::new("a", "a").with_seating(20),
            RoomRecord::new("b", "b").with_seating(50),
            RoomRecord::new("c", "c").with_seating(120),
        ];
        let kept: Vec<_> = filter.apply(rooms).into_iter().map(|r| r.id).collect();
        assert_eq!(kept, vec!["b", "c"]);
    }

    #[test]
    fn filter_matches_projector_and_computers_exactly() {
        let filter = FacilityFilter {
            projector: Some(true),
            computers: Some(false),
            ..FacilityFilter::default()
        };
        assert!(filter.admits(&RoomRecord::new("a", "a").with_projector(true)));
        assert!(!filter.admits(&RoomRecord::new("b", "b")));
        assert!(!filter.admits(
            &RoomRecord::new("c", "c")
                .with_projector(true)
                .with_computers(4)
        ));
    }
}
