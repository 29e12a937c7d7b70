//! The two-level criteria tree: main criteria and their leaf criteria.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::score_mapping::Measurement;
use crate::domain::foundation::AhpError;

/// A named node in the criteria tree.
///
/// Implemented by both levels so that a sibling group can be handled
/// generically by the hierarchy.
pub trait Criterion:
    Copy + Ord + fmt::Debug + fmt::Display + FromStr<Err = AhpError> + 'static
{
    /// Canonical name, unique within the sibling group.
    fn name(&self) -> &'static str;
}

/// Level-1 criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MainCriterion {
    Comfort,
    Health,
    Usability,
}

impl MainCriterion {
    /// All main criteria in hierarchy order.
    pub const ALL: [MainCriterion; 3] = [
        MainCriterion::Comfort,
        MainCriterion::Health,
        MainCriterion::Usability,
    ];

    /// The leaf criteria grouped under this criterion, in matrix order.
    pub fn sub_criteria(&self) -> &'static [LeafCriterion] {
        match self {
            MainCriterion::Comfort => &[
                LeafCriterion::Temperature,
                LeafCriterion::Lighting,
                LeafCriterion::Noise,
                LeafCriterion::Humidity,
            ],
            MainCriterion::Health => &[
                LeafCriterion::Co2,
                LeafCriterion::AirQuality,
                LeafCriterion::Voc,
            ],
            MainCriterion::Usability => &[
                LeafCriterion::SeatingCapacity,
                LeafCriterion::Equipment,
                LeafCriterion::AvFacilities,
            ],
        }
    }
}

impl Criterion for MainCriterion {
    fn name(&self) -> &'static str {
        match self {
            MainCriterion::Comfort => "Comfort",
            MainCriterion::Health => "Health",
            MainCriterion::Usability => "Usability",
        }
    }
}

/// Level-2 criteria, scored directly from room data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeafCriterion {
    Temperature,
    Lighting,
    Noise,
    Humidity,
    #[serde(rename = "CO2")]
    Co2,
    AirQuality,
    #[serde(rename = "VOC")]
    Voc,
    SeatingCapacity,
    Equipment,
    #[serde(rename = "AVFacilities")]
    AvFacilities,
}

impl LeafCriterion {
    /// All leaf criteria in hierarchy order.
    pub const ALL: [LeafCriterion; 10] = [
        LeafCriterion::Temperature,
        LeafCriterion::Lighting,
        LeafCriterion::Noise,
        LeafCriterion::Humidity,
        LeafCriterion::Co2,
        LeafCriterion::AirQuality,
        LeafCriterion::Voc,
        LeafCriterion::SeatingCapacity,
        LeafCriterion::Equipment,
        LeafCriterion::AvFacilities,
    ];

    /// The main criterion this leaf belongs to.
    pub fn parent(&self) -> MainCriterion {
        match self {
            LeafCriterion::Temperature
            | LeafCriterion::Lighting
            | LeafCriterion::Noise
            | LeafCriterion::Humidity => MainCriterion::Comfort,
            LeafCriterion::Co2 | LeafCriterion::AirQuality | LeafCriterion::Voc => {
                MainCriterion::Health
            }
            LeafCriterion::SeatingCapacity
            | LeafCriterion::Equipment
            | LeafCriterion::AvFacilities => MainCriterion::Usability,
        }
    }

    /// The sensor measurement feeding this leaf, or None for facility leaves.
    pub fn measurement(&self) -> Option<Measurement> {
        match self {
            LeafCriterion::Temperature => Some(Measurement::Temperature),
            LeafCriterion::Lighting => Some(Measurement::Light),
            LeafCriterion::Noise => Some(Measurement::Noise),
            LeafCriterion::Humidity => Some(Measurement::Humidity),
            LeafCriterion::Co2 => Some(Measurement::Co2),
            LeafCriterion::AirQuality => Some(Measurement::AirQuality),
            LeafCriterion::Voc => Some(Measurement::Voc),
            LeafCriterion::SeatingCapacity
            | LeafCriterion::Equipment
            | LeafCriterion::AvFacilities => None,
        }
    }
}

impl Criterion for LeafCriterion {
    fn name(&self) -> &'static str {
        match self {
            LeafCriterion::Temperature => "Temperature",
            LeafCriterion::Lighting => "Lighting",
            LeafCriterion::Noise => "Noise",
            LeafCriterion::Humidity => "Humidity",
            LeafCriterion::Co2 => "CO2",
            LeafCriterion::AirQuality => "AirQuality",
            LeafCriterion::Voc => "VOC",
            LeafCriterion::SeatingCapacity => "SeatingCapacity",
            LeafCriterion::Equipment => "Equipment",
            LeafCriterion::AvFacilities => "AVFacilities",
        }
    }
}

macro_rules! criterion_text {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = AhpError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| AhpError::unknown_criterion(s))
            }
        }
    };
}

criterion_text!(MainCriterion);
criterion_text!(LeafCriterion);
