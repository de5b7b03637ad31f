pub mod activity;
pub mod record;

pub use activity::{
    gender_code, ActivityInput, FeatureVector, FEATURE_COUNT, FEATURE_NAMES,
    GENDER_OPTIONS,
};
pub use record::{NewPrediction, PredictionRecord};
