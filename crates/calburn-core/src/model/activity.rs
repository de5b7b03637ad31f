use serde::{Deserialize, Serialize};

/// Number of features the regressor consumes
pub const FEATURE_COUNT: usize = 7;

/// Feature names in the fixed order the regressor was trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "age",
    "height",
    "weight",
    "duration",
    "heart_rate",
    "body_temp",
];

/// Gender options offered by the input form
pub const GENDER_OPTIONS: [&str; 2] = ["Male", "Female"];

/// Encode a submitted gender string for the regressor
///
/// `"male"` in any case maps to 0; every other string, including ones not
/// offered by the form, maps to 1. Unknown values are not rejected.
pub fn gender_code(gender: &str) -> u8 {
    if gender.to_lowercase() == "male" {
        0
    } else {
        1
    }
}

/// One set of physical-activity measurements, as submitted through the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInput {
    /// Gender exactly as submitted
    pub gender: String,
    /// Age in years
    pub age: u32,
    /// Height in cm
    pub height: f64,
    /// Weight in kg
    pub weight: f64,
    /// Exercise duration in minutes
    pub duration: f64,
    /// Heart rate in bpm
    pub heart_rate: f64,
    /// Body temperature in °C
    pub body_temp: f64,
}

impl ActivityInput {
    /// Build the fixed-order feature vector for this input
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            f64::from(gender_code(&self.gender)),
            f64::from(self.age),
            self.height,
            self.weight,
            self.duration,
            self.heart_rate,
            self.body_temp,
        ])
    }
}

/// Feature vector passed to the regressor unchanged
///
/// Order: `[gender_code, age, height, weight, duration, heart_rate, body_temp]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// First feature that is NaN or infinite, with its name
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .zip(self.0.iter())
            .find(|(_, v)| !v.is_finite())
            .map(|(name, v)| (*name, *v))
    }
}
