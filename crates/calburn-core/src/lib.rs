//! calburn Core - domain model, model adapter, and shared facilities
//!
//! This crate provides:
//! - The persisted `PredictionRecord` and the form-level `ActivityInput`
//! - Gender encoding and the fixed-order feature vector
//! - The Model Adapter: artifact loading and `predict`
//! - The `PredictionLog` seam implemented by the storage crate
//! - The error facility (`ExError`, `ExErrorKind`, `CalburnError`)
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod prediction_log;
pub mod predictor;

pub use calburn_core_types::schema;

// Re-export commonly used types
pub use errors::{CalburnError, ExError, ExErrorKind, Result};
pub use model::{gender_code, ActivityInput, FeatureVector, NewPrediction, PredictionRecord};
pub use prediction_log::{InMemoryPredictionLog, PredictionLog};
pub use predictor::ModelAdapter;
