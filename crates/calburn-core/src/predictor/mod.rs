//! Model Adapter
//!
//! Wraps the pre-trained regressor behind the `Regressor` trait. The
//! regressor is loaded once from a JSON artifact at startup and is read-only
//! afterwards, so it is shared between requests without synchronization.

pub mod adapter;
pub mod artifact;
pub mod linear;
pub mod tree;

pub use adapter::{round_to_cents, ModelAdapter};
pub use artifact::{load_artifact, parse_artifact, ARTIFACT_FORMAT, ARTIFACT_VERSION};
pub use linear::LinearRegressor;
pub use tree::{TreeEnsemble, TreeNode};

use crate::errors::CalburnError;

/// An opaque trained regressor
pub trait Regressor: Send + Sync + std::fmt::Debug {
    /// Short label for diagnostics (e.g. "linear")
    fn kind(&self) -> &'static str;

    /// Number of features the regressor expects
    fn n_features(&self) -> usize;

    /// Raw, unrounded prediction for one feature vector
    ///
    /// # Errors
    ///
    /// Returns `CalburnError::FeatureCount` when `features` has the wrong
    /// length, or a model-specific error when evaluation fails.
    fn predict(&self, features: &[f64]) -> Result<f64, CalburnError>;
}

pub(crate) fn check_feature_count(expected: usize, features: &[f64]) -> Result<(), CalburnError> {
    if features.len() != expected {
        return Err(CalburnError::FeatureCount {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}
