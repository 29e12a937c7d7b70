//! Saaty scale value object (1/9 to 9).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AhpError;

/// Smallest admissible comparison value.
pub const SAATY_MIN: f64 = 1.0 / 9.0;

/// Largest admissible comparison value.
pub const SAATY_MAX: f64 = 9.0;

const INTENSITY_LABELS: [&str; 9] = [
    "Equal importance",
    "Weak importance",
    "Moderate importance",
    "Moderate plus",
    "Strong importance",
    "Strong plus",
    "Very strong importance",
    "Very, very strong",
    "Absolute importance",
];

/// How many times more important one criterion is than another.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SaatyValue(f64);

impl SaatyValue {
    /// Indifference between two criteria.
    pub const EQUAL: Self = Self(1.0);

    /// Creates a SaatyValue, returning error if outside [1/9, 9].
    pub fn try_new(value: f64) -> Result<Self, AhpError> {
        if !(SAATY_MIN..=SAATY_MAX).contains(&value) {
            return Err(AhpError::ComparisonOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value seen from the other criterion.
    pub fn reciprocal(&self) -> Self {
        Self(1.0 / self.0)
    }

    /// The integer intensity 1-9 of this judgement, if it sits on the scale.
    ///
    /// Reciprocals report the intensity of their inverse.
    pub fn intensity(&self) -> Option<u8> {
        let magnitude = if self.0 >= 1.0 { self.0 } else { 1.0 / self.0 };
        let rounded = magnitude.round();
        if (magnitude - rounded).abs() < 1e-9 {
            Some(rounded as u8)
        } else {
            None
        }
    }

    /// Verbal description of the judgement's intensity.
    pub fn label(&self) -> Option<&'static str> {
        self.intensity()
            .map(|i| INTENSITY_LABELS[usize::from(i) - 1])
    }
}

impl Default for SaatyValue {
    fn default() -> Self {
        Self::EQUAL
    }
}

impl TryFrom<f64> for SaatyValue {
    type Error = AhpError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<SaatyValue> for f64 {
    fn from(value: SaatyValue) -> Self {
        value.0
    }
}

impl fmt::Display for SaatyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.intensity() {
            Some(i) if self.0 < 1.0 => write!(f, "1/{}", i),
            Some(i) => write!(f, "{}", i),
            None => write!(f, "{:.3}", self.0),
        }
    }
}
