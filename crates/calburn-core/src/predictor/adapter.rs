use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::{load_artifact, Regressor};
use crate::errors::{CalburnError, ExError, Result};
use crate::model::{ActivityInput, FeatureVector};

/// Round to 2 decimal digits, exact ties going to the even digit
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Adapter around the loaded regressor
///
/// Cheap to clone; all clones share the same read-only regressor.
#[derive(Debug, Clone)]
pub struct ModelAdapter {
    regressor: Arc<dyn Regressor>,
}

impl ModelAdapter {
    /// Load the regressor artifact at `path`
    ///
    /// # Errors
    ///
    /// Returns an `ExErrorKind::ModelArtifact` error if the file is missing
    /// or incompatible. Callers treat this as fatal at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let regressor = load_artifact(path)?;
        info!(
            component = module_path!(),
            path = %path.display(),
            kind = regressor.kind(),
            "model artifact loaded"
        );
        Ok(Self::from_regressor(regressor))
    }

    /// Wrap an already constructed regressor
    pub fn from_regressor(regressor: Box<dyn Regressor>) -> Self {
        Self {
            regressor: Arc::from(regressor),
        }
    }

    /// Kind of the wrapped regressor
    pub fn kind(&self) -> &'static str {
        self.regressor.kind()
    }

    /// Predict calories burnt, rounded to 2 decimal digits
    ///
    /// The feature vector `[gender_code, age, height, weight, duration,
    /// heart_rate, body_temp]` is passed to the regressor unchanged.
    ///
    /// # Errors
    ///
    /// Returns an `ExErrorKind::Model` error if a feature is not finite, the
    /// regressor fails, or its output is not finite.
    #[allow(clippy::too_many_arguments)]
    pub fn predict(
        &self,
        gender_code: u8,
        age: u32,
        height: f64,
        weight: f64,
        duration: f64,
        heart_rate: f64,
        body_temp: f64,
    ) -> Result<f64> {
        self.predict_features(&FeatureVector([
            f64::from(gender_code),
            f64::from(age),
            height,
            weight,
            duration,
            heart_rate,
            body_temp,
        ]))
    }

    /// Predict for a parsed form submission
    ///
    /// # Errors
    ///
    /// Same as [`ModelAdapter::predict`].
    pub fn predict_input(&self, input: &ActivityInput) -> Result<f64> {
        self.predict_features(&input.features())
    }

    fn predict_features(&self, features: &FeatureVector) -> Result<f64> {
        if let Some((feature, value)) = features.first_non_finite() {
            return Err(CalburnError::NonFiniteFeature {
                feature: feature.to_string(),
                value,
            }
            .into());
        }

        let raw = self
            .regressor
            .predict(features.as_slice())
            .map_err(ExError::from)?;
        if !raw.is_finite() {
            return Err(CalburnError::NonFiniteOutput { value: raw }.into());
        }

        let prediction = round_to_cents(raw);
        debug!(
            component = module_path!(),
            prediction, "Predicted Calories Burnt: {:?}", prediction
        );
        Ok(prediction)
    }
}
