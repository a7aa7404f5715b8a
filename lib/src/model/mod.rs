//! Trained models for the two prediction tasks.
//!
//! Each model follows the fit / fitted split of the preprocessing layer:
//! [`PriceRegressor`] and [`TierClassifier`] hold hyperparameters, and
//! `fit` returns an immutable [`FittedPriceRegressor`] or
//! [`FittedTierClassifier`]. A fitted model owns its own fitted
//! transformer, so two models never share vocabulary state, and it is
//! `Send + Sync` for sharing behind `Arc` across request handlers.

pub mod classifier;
pub mod regressor;

pub use classifier::{FittedTierClassifier, TierClassifier, TierClassifierParams};
pub use regressor::{FittedPriceRegressor, PriceRegressor, PriceRegressorParams};

use crate::error::EstateError;
use crate::preprocessing::{FeatureVector, PropertyFeatures};

/// Inference interface shared by the fitted models.
pub trait InferenceModel {
    type Output;

    /// Feature vector width the model was fitted on.
    fn n_features_in(&self) -> usize;

    /// Predict from an already-encoded feature vector.
    ///
    /// # Errors
    /// [`EstateError::SchemaMismatch`] if `features` has the wrong width.
    /// The vector is never padded or truncated.
    fn predict(&self, features: &FeatureVector) -> Result<Self::Output, EstateError>;

    /// Encode a raw request with the fit-time vocabulary.
    fn encode(&self, features: &PropertyFeatures) -> Result<FeatureVector, EstateError>;

    /// Encode then predict one raw request.
    fn predict_features(&self, features: &PropertyFeatures) -> Result<Self::Output, EstateError> {
        let vector = self.encode(features)?;
        self.predict(&vector)
    }

    fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<Self::Output>, EstateError> {
        batch.iter().map(|v| self.predict(v)).collect()
    }
}
