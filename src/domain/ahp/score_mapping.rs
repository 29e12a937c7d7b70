//! Score Mapping - Raw measurements and facility attributes to scores in [0, 1].
//!
//! Score interpretation:
//! - 1.0 = optimal
//! - 0.5 = acceptable (also the neutral score for missing data)
//! - 0.0 = unacceptable
//!
//! Continuous measurements use piecewise-linear interpolation against a
//! [`MeasurementBand`]. Bands are configuration: defaults come from
//! EN 16798-1 (Category II), EN 12464-1, WHO guidance, the WELL Building
//! Standard and the US EPA AQI, and any of them can be overridden.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::AhpError;

/// Score given to a criterion when the room has no data for it.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Seating ratio band (available / required) that scores 1.0.
const SEATING_IDEAL_MIN: f64 = 0.8;
const SEATING_IDEAL_MAX: f64 = 1.5;

/// Score lost per unit of seating ratio above the ideal band.
const SEATING_SURPLUS_SLOPE: f64 = 0.1;

/// Lowest score an oversized room can reach.
const SEATING_SURPLUS_FLOOR: f64 = 0.5;

/// AV score when a projector is neither required nor present.
const AV_UNREQUIRED_ABSENT: f64 = 0.8;

/// Policy for criteria without a raw measurement.
///
/// A missing value scores neutral instead of being dropped, because dropping
/// it would silently reweight the remaining criteria.
pub fn missing_measurement_score() -> f64 {
    NEUTRAL_SCORE
}

/// The continuous sensor measurements a room can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Temperature,
    Co2,
    Humidity,
    Light,
    Noise,
    Voc,
    AirQuality,
}

/// Which side(s) of the band are penalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandShape {
    /// Both too low and too high are bad.
    CenteredRange,
    /// Lower is always at least as good.
    LowerIsBetter,
}

impl Measurement {
    pub const ALL: [Measurement; 7] = [
        Measurement::Temperature,
        Measurement::Co2,
        Measurement::Humidity,
        Measurement::Light,
        Measurement::Noise,
        Measurement::Voc,
        Measurement::AirQuality,
    ];

    pub fn shape(&self) -> BandShape {
        match self {
            Measurement::Temperature | Measurement::Humidity | Measurement::Light => {
                BandShape::CenteredRange
            }
            Measurement::Co2 | Measurement::Noise | Measurement::Voc | Measurement::AirQuality => {
                BandShape::LowerIsBetter
            }
        }
    }

    /// Configuration key of the measurement.
    pub fn key(&self) -> &'static str {
        match self {
            Measurement::Temperature => "temperature",
            Measurement::Co2 => "co2",
            Measurement::Humidity => "humidity",
            Measurement::Light => "light",
            Measurement::Noise => "noise",
            Measurement::Voc => "voc",
            Measurement::AirQuality => "air_quality",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Measurement {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Measurement::ALL
            .iter()
            .copied()
            .find(|m| m.key() == key)
            .ok_or_else(|| AhpError::unknown_criterion(s))
    }
}

/// Optimal and acceptable ranges for one measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementBand {
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub acceptable_min: f64,
    pub acceptable_max: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

impl MeasurementBand {
    fn new(
        optimal: (f64, f64),
        acceptable: (f64, f64),
        unit: &str,
        description: &str,
    ) -> Self {
        Self {
            optimal_min: optimal.0,
            optimal_max: optimal.1,
            acceptable_min: acceptable.0,
            acceptable_max: acceptable.1,
            unit: unit.to_string(),
            description: description.to_string(),
        }
    }

    /// Requires acceptable_min <= optimal_min <= optimal_max <= acceptable_max.
    pub fn validate(&self, measurement: Measurement) -> Result<(), AhpError> {
        let bounds = [
            self.acceptable_min,
            self.optimal_min,
            self.optimal_max,
            self.acceptable_max,
        ];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(AhpError::invalid_band(
                measurement.key(),
                "bounds must be finite numbers",
            ));
        }
        if !bounds.windows(2).all(|w| w[0] <= w[1]) {
            return Err(AhpError::invalid_band(
                measurement.key(),
                format!(
                    "expected acceptable_min <= optimal_min <= optimal_max <= acceptable_max, got {} / {} / {} / {}",
                    self.acceptable_min, self.optimal_min, self.optimal_max, self.acceptable_max
                ),
            ));
        }
        Ok(())
    }
}

/// One band per measurement. Every field falls back to its standard default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringBands {
    pub temperature: MeasurementBand,
    pub co2: MeasurementBand,
    pub humidity: MeasurementBand,
    pub light: MeasurementBand,
    pub noise: MeasurementBand,
    pub voc: MeasurementBand,
    pub air_quality: MeasurementBand,
}

impl Default for ScoringBands {
    fn default() -> Self {
        Self {
            temperature: MeasurementBand::new(
                (20.0, 24.0),
                (18.0, 26.0),
                "°C",
                "EN 16798-1, Category II for office spaces",
            ),
            co2: MeasurementBand::new(
                (0.0, 600.0),
                (0.0, 1000.0),
                "ppm",
                "EN 16798-1, Category II (800 ppm above outdoor ~400)",
            ),
            humidity: MeasurementBand::new(
                (40.0, 60.0),
                (30.0, 70.0),
                "%RH",
                "EN 16798-1 and health research",
            ),
            light: MeasurementBand::new(
                (300.0, 500.0),
                (200.0, 750.0),
                "lux",
                "EN 12464-1 for office and classroom lighting",
            ),
            noise: MeasurementBand::new(
                (0.0, 35.0),
                (0.0, 45.0),
                "dBA",
                "WHO guidelines and EN 16798-1",
            ),
            voc: MeasurementBand::new(
                (0.0, 200.0),
                (0.0, 400.0),
                "ppb",
                "WELL Building Standard",
            ),
            air_quality: MeasurementBand::new(
                (0.0, 50.0),
                (0.0, 100.0),
                "AQI",
                "US EPA AQI scale adapted for indoor use",
            ),
        }
    }
}

impl ScoringBands {
    pub fn band(&self, measurement: Measurement) -> &MeasurementBand {
        match measurement {
            Measurement::Temperature => &self.temperature,
            Measurement::Co2 => &self.co2,
            Measurement::Humidity => &self.humidity,
            Measurement::Light => &self.light,
            Measurement::Noise => &self.noise,
            Measurement::Voc => &self.voc,
            Measurement::AirQuality => &self.air_quality,
        }
    }

    /// Validates every band.
    pub fn validate(&self) -> Result<(), AhpError> {
        Measurement::ALL
            .iter()
            .try_for_each(|&m| self.band(m).validate(m))
    }
}

/// Maps raw room data to normalized criterion scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMapper {
    bands: ScoringBands,
}

impl ScoreMapper {
    /// Creates a mapper over validated bands.
    pub fn new(bands: ScoringBands) -> Result<Self, AhpError> {
        bands.validate()?;
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &ScoringBands {
        &self.bands
    }

    /// Scores a raw measurement against its configured band.
    pub fn map(&self, measurement: Measurement, value: f64) -> f64 {
        let band = self.bands.band(measurement);
        match measurement.shape() {
            BandShape::CenteredRange => centered_range_score(value, band),
            BandShape::LowerIsBetter => {
                lower_is_better_score(value, band.optimal_max, band.acceptable_max)
            }
        }
    }

    /// Scores a possibly missing measurement.
    ///
    /// Absent and non-finite readings get [`missing_measurement_score`].
    pub fn map_optional(&self, measurement: Measurement, value: Option<f64>) -> f64 {
        match value.filter(|v| v.is_finite()) {
            Some(v) => self.map(measurement, v),
            None => missing_measurement_score(),
        }
    }
}

/// Score for a value whose optimum lies inside a band.
///
/// 1.0 inside the optimal band, linear from 0.5 at the acceptable boundary
/// to 1.0 at the optimal boundary, then decaying from 0.5 to 0 over one
/// acceptable-band width beyond it.
pub fn centered_range_score(value: f64, band: &MeasurementBand) -> f64 {
    let MeasurementBand {
        optimal_min,
        optimal_max,
        acceptable_min,
        acceptable_max,
        ..
    } = *band;

    if (optimal_min..=optimal_max).contains(&value) {
        return 1.0;
    }

    if acceptable_min <= value && value < optimal_min {
        return 0.5 + 0.5 * (value - acceptable_min) / (optimal_min - acceptable_min);
    }

    if optimal_max < value && value <= acceptable_max {
        return 1.0 - 0.5 * (value - optimal_max) / (acceptable_max - optimal_max);
    }

    let width = acceptable_max - acceptable_min;
    if width <= 0.0 {
        return 0.0;
    }
    let distance = if value < acceptable_min {
        acceptable_min - value
    } else {
        value - acceptable_max
    };
    decayed(distance, width)
}

/// Score for a value where lower is better.
///
/// 1.0 up to the optimal maximum (including anything <= 0), linear down to
/// 0.5 at the acceptable maximum, then decaying to 0 over one
/// acceptable-maximum beyond it.
pub fn lower_is_better_score(value: f64, optimal_max: f64, acceptable_max: f64) -> f64 {
    if value <= 0.0 || value <= optimal_max {
        return 1.0;
    }

    if value <= acceptable_max {
        return 1.0 - 0.5 * (value - optimal_max) / (acceptable_max - optimal_max);
    }

    if acceptable_max <= 0.0 {
        return 0.0;
    }
    decayed(value - acceptable_max, acceptable_max)
}

fn decayed(distance: f64, scale: f64) -> f64 {
    let decay = (distance / scale).min(1.0);
    (0.5 * (1.0 - decay)).max(0.0)
}

/// Score for seating capacity relative to the requested head count.
///
/// # Edge Cases
/// - No requirement: 1.0 if the room has any seats, otherwise neutral
/// - Too few seats: proportional to the ratio below 0.8
/// - Too many seats: loses 0.1 per unit of ratio above 1.5, never below 0.5
pub fn seating_score(available: u32, required: u32) -> f64 {
    if required == 0 {
        return if available > 0 { 1.0 } else { NEUTRAL_SCORE };
    }

    let ratio = f64::from(available) / f64::from(required);
    if (SEATING_IDEAL_MIN..=SEATING_IDEAL_MAX).contains(&ratio) {
        1.0
    } else if ratio < SEATING_IDEAL_MIN {
        (ratio / SEATING_IDEAL_MIN).max(0.0)
    } else {
        (1.0 - (ratio - SEATING_IDEAL_MAX) * SEATING_SURPLUS_SLOPE).max(SEATING_SURPLUS_FLOOR)
    }
}

/// Score for computer equipment. Extra equipment is never penalized.
pub fn equipment_score(available: u32, required: u32) -> f64 {
    if required == 0 {
        return 1.0;
    }
    if available == 0 {
        return 0.0;
    }
    (f64::from(available) / f64::from(required)).min(1.0)
}

/// Score for audio-visual facilities (projector).
pub fn av_score(has_projector: bool, required: bool) -> f64 {
    match (required, has_projector) {
        (true, true) => 1.0,
        (true, false) => 0.0,
        (false, true) => 1.0,
        (false, false) => AV_UNREQUIRED_ABSENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn mapper() -> ScoreMapper {
        ScoreMapper::default()
    }

    // Centered range

    #[test]
    fn temperature_inside_optimal_band_is_perfect() {
        assert_eq!(mapper().map(Measurement::Temperature, 22.0), 1.0);
        assert_eq!(mapper().map(Measurement::Temperature, 20.0), 1.0);
        assert_eq!(mapper().map(Measurement::Temperature, 24.0), 1.0);
    }

    #[test]
    fn temperature_interpolates_below_optimal() {
        // Halfway between 0.5 at 18 and 1.0 at 20.
        assert!(approx(mapper().map(Measurement::Temperature, 19.0), 0.75));
        assert!(approx(mapper().map(Measurement::Temperature, 18.0), 0.5));
    }

    #[test]
    fn temperature_interpolates_above_optimal() {
        assert!(approx(mapper().map(Measurement::Temperature, 25.0), 0.75));
        assert!(approx(mapper().map(Measurement::Temperature, 26.0), 0.5));
    }

    #[test]
    fn temperature_beyond_acceptable_decays_below_half() {
        // One degree past 26 over an 8-degree acceptable width.
        let score = mapper().map(Measurement::Temperature, 27.0);
        assert!(approx(score, 0.4375));
        assert!(score < 0.5);
    }

    #[test]
    fn temperature_far_outside_reaches_floor() {
        assert_eq!(mapper().map(Measurement::Temperature, 34.0), 0.0);
        assert_eq!(mapper().map(Measurement::Temperature, -40.0), 0.0);
    }

    #[test]
    fn humidity_and_light_use_centered_shape() {
        assert_eq!(mapper().map(Measurement::Humidity, 50.0), 1.0);
        assert!(approx(mapper().map(Measurement::Humidity, 35.0), 0.75));
        assert!(approx(mapper().map(Measurement::Light, 250.0), 0.75));
        assert!(approx(mapper().map(Measurement::Light, 625.0), 0.75));
    }

    #[test]
    fn collapsed_lower_margin_skips_interpolation() {
        let band = MeasurementBand::new((20.0, 24.0), (20.0, 26.0), "°C", "");
        assert!(centered_range_score(19.0, &band) < 0.5);
        assert_eq!(centered_range_score(20.0, &band), 1.0);
    }

    // Lower is better

    #[test]
    fn co2_below_optimal_is_perfect() {
        assert_eq!(mapper().map(Measurement::Co2, 500.0), 1.0);
        assert_eq!(mapper().map(Measurement::Co2, 0.0), 1.0);
        assert_eq!(mapper().map(Measurement::Co2, -5.0), 1.0);
    }

    #[test]
    fn co2_interpolates_between_optimal_and_acceptable() {
        assert!(approx(mapper().map(Measurement::Co2, 800.0), 0.75));
        assert!(approx(mapper().map(Measurement::Co2, 1000.0), 0.5));
    }

    #[test]
    fn co2_beyond_acceptable_decays() {
        assert!(approx(mapper().map(Measurement::Co2, 1500.0), 0.25));
        assert_eq!(mapper().map(Measurement::Co2, 2000.0), 0.0);
        assert_eq!(mapper().map(Measurement::Co2, 5000.0), 0.0);
    }

    #[test]
    fn noise_voc_and_air_quality_use_lower_is_better() {
        assert!(approx(mapper().map(Measurement::Noise, 40.0), 0.75));
        assert!(approx(mapper().map(Measurement::Voc, 300.0), 0.75));
        assert!(approx(mapper().map(Measurement::AirQuality, 75.0), 0.75));
    }

    #[test]
    fn scores_never_leave_unit_interval() {
        let m = mapper();
        for measurement in Measurement::ALL {
            for raw in [-1e6, -10.0, 0.0, 15.0, 45.0, 300.0, 1200.0, 1e9] {
                let s = m.map(measurement, raw);
                assert!((0.0..=1.0).contains(&s), "{} {} -> {}", measurement, raw, s);
            }
        }
    }

    // Missing data

    #[test]
    fn missing_measurement_is_neutral() {
        assert_eq!(missing_measurement_score(), 0.5);
        assert_eq!(mapper().map_optional(Measurement::Voc, None), 0.5);
        assert_eq!(mapper().map_optional(Measurement::Voc, Some(f64::NAN)), 0.5);
        assert_eq!(mapper().map_optional(Measurement::Voc, Some(100.0)), 1.0);
    }

    // Bands

    #[test]
    fn default_bands_are_valid() {
        assert!(ScoringBands::default().validate().is_ok());
    }

    #[test]
    fn overridden_band_changes_mapping_not_algorithm() {
        let mut bands = ScoringBands::default();
        bands.temperature = MeasurementBand::new((18.0, 21.0), (16.0, 23.0), "°C", "cool office");
        let m = ScoreMapper::new(bands).unwrap();

        assert_eq!(m.map(Measurement::Temperature, 19.0), 1.0);
        assert!(approx(m.map(Measurement::Temperature, 22.0), 0.75));
    }

    #[test]
    fn misordered_band_is_rejected() {
        let mut bands = ScoringBands::default();
        bands.co2.optimal_max = 1200.0;
        assert!(matches!(
            ScoreMapper::new(bands),
            Err(AhpError::InvalidBand { .. })
        ));
    }

    #[test]
    fn partial_band_override_deserializes_with_defaults() {
        let yaml = r#"
noise:
  optimal_min: 0
  optimal_max: 30
  acceptable_min: 0
  acceptable_max: 40
"#;
        let bands: ScoringBands = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bands.noise.optimal_max, 30.0);
        assert_eq!(bands.temperature, ScoringBands::default().temperature);
    }

    #[test]
    fn measurement_parses_sensor_names() {
        assert_eq!("Air Quality".parse::<Measurement>().unwrap(), Measurement::AirQuality);
        assert_eq!("air-quality".parse::<Measurement>().unwrap(), Measurement::AirQuality);
        assert_eq!("CO2".parse::<Measurement>().unwrap(), Measurement::Co2);
        assert!("pressure".parse::<Measurement>().is_err());
    }

    // Facilities

    #[test]
    fn seating_exact_fit_is_perfect() {
        assert_eq!(seating_score(50, 50), 1.0);
        assert_eq!(seating_score(40, 50), 1.0);
        assert_eq!(seating_score(75, 50), 1.0);
    }

    #[test]
    fn seating_shortfall_scales_with_ratio() {
        let score = seating_score(30, 50);
        assert!(score > 0.0 && score < 1.0);
        assert!(approx(score, 0.75));
        assert_eq!(seating_score(0, 50), 0.0);
    }

    #[test]
    fn seating_surplus_decays_slowly_with_floor() {
        assert!(approx(seating_score(100, 50), 0.95));
        assert_eq!(seating_score(1000, 50), 0.5);
    }

    #[test]
    fn seating_without_requirement() {
        assert_eq!(seating_score(12, 0), 1.0);
        assert_eq!(seating_score(0, 0), 0.5);
    }

    #[test]
    fn equipment_not_required_is_always_perfect() {
        assert_eq!(equipment_score(0, 0), 1.0);
        assert_eq!(equipment_score(20, 0), 1.0);
    }

    #[test]
    fn equipment_required_scores_by_coverage() {
        assert_eq!(equipment_score(0, 10), 0.0);
        assert!(approx(equipment_score(5, 10), 0.5));
        assert_eq!(equipment_score(30, 10), 1.0);
    }

    #[test]
    fn av_truth_table() {
        assert_eq!(av_score(true, true), 1.0);
        assert_eq!(av_score(false, true), 0.0);
        assert_eq!(av_score(true, false), 1.0);
        assert_eq!(av_score(false, false), 0.8);
    }
}
