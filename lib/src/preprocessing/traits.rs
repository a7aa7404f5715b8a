//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; learns state from training data.
//! - [`FittedTransformer`]: After fitting; immutable, ready for inference and serialization.

use crate::error::EstateError;
use crate::serialization::SerializableParams;
use ndarray::Array2;

/// Trait for unfitted transformers.
///
/// # Example
/// ```ignore
/// use estate_ml::preprocessing::{CityEncoder, Transformer, FittedTransformer};
///
/// let fitted = CityEncoder::new().fit(["Pune", "Mumbai"])?;
/// let row = fitted.transform_one("Pune")?;
/// ```
pub trait Transformer: Clone {
    /// Input item type (one row).
    type Input: ?Sized;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Input = Self::Input>;

    /// Fit the transformer to the training rows.
    ///
    /// # Errors
    /// Returns [`EstateError::EmptyData`] if there are no rows, or another
    /// variant if a row cannot be used for fitting.
    fn fit<'a, I>(&self, data: I) -> Result<Self::Fitted, EstateError>
    where
        I: IntoIterator<Item = &'a Self::Input>,
        Self::Input: 'a;

    /// Fit the transformer and transform the same rows in one step.
    fn fit_transform<'a, I>(&self, data: I) -> Result<(Self::Fitted, Array2<f64>), EstateError>
    where
        I: IntoIterator<Item = &'a Self::Input> + Clone,
        Self::Input: 'a,
    {
        let fitted = self.fit(data.clone())?;
        let transformed = fitted.transform(data)?;
        Ok((fitted, transformed))
    }
}

/// Trait for fitted transformers ready for inference.
///
/// A fitted transformer never changes its learned state. The output width
/// returned by [`n_features_out`](FittedTransformer::n_features_out) is fixed
/// for its whole lifetime.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
pub trait FittedTransformer: Clone {
    /// Input item type (one row).
    type Input: ?Sized;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Width of one output row.
    fn n_features_out(&self) -> usize;

    /// Encode one row into `out`, which must be exactly `n_features_out()` long.
    fn transform_into(&self, input: &Self::Input, out: &mut [f64]) -> Result<(), EstateError>;

    /// Encode one row into a fresh vector.
    fn transform_one(&self, input: &Self::Input) -> Result<Vec<f64>, EstateError> {
        let mut out = vec![0.0; self.n_features_out()];
        self.transform_into(input, &mut out)?;
        Ok(out)
    }

    /// Encode many rows into a `(rows, n_features_out)` matrix.
    fn transform<'a, I>(&self, data: I) -> Result<Array2<f64>, EstateError>
    where
        I: IntoIterator<Item = &'a Self::Input>,
        Self::Input: 'a,
    {
        let width = self.n_features_out();
        let mut flat = Vec::new();
        let mut rows = 0;
        for item in data {
            let start = flat.len();
            flat.resize(start + width, 0.0);
            self.transform_into(item, &mut flat[start..])?;
            rows += 1;
        }
        Array2::from_shape_vec((rows, width), flat)
            .map_err(|e| EstateError::InvalidParameter(e.to_string()))
    }

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    ///
    /// # Errors
    /// Returns [`EstateError::InvalidArtifact`] if the parameters are inconsistent.
    fn from_params(params: Self::Params) -> Result<Self, EstateError>
    where
        Self: Sized;
}
