use serde::{Deserialize, Serialize};

use super::activity::ActivityInput;

/// A prediction about to be persisted; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrediction {
    pub input: ActivityInput,
    /// Calories, already rounded to 2 decimal digits
    pub prediction: f64,
}

impl NewPrediction {
    pub fn new(input: ActivityInput, prediction: f64) -> Self {
        Self { input, prediction }
    }
}

/// A stored request/response pair
///
/// Rows are written once and never updated or deleted. Values returned by
/// the store are read-only copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Auto-assigned, monotonically increasing
    pub id: i64,
    pub gender: String,
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub duration: f64,
    pub heart_rate: f64,
    pub body_temp: f64,
    pub prediction: f64,
}

impl PredictionRecord {
    /// Materialize a stored row from a pending prediction and its id
    pub fn from_new(id: i64, new: &NewPrediction) -> Self {
        let input = &new.input;
        Self {
            id,
            gender: input.gender.clone(),
            age: input.age,
            height: input.height,
            weight: input.weight,
            duration: input.duration,
            heart_rate: input.heart_rate,
            body_temp: input.body_temp,
            prediction: new.prediction,
        }
    }
}
