//! One-hot encoding for the city feature.
//!
//! Transforms a city string into a one-hot segment whose width equals the
//! size of the vocabulary learned at fit time.

use crate::error::EstateError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::vocabulary::CategoryVocabulary;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// One-hot encoder for a single string-valued categorical column.
///
/// # Example
/// ```ignore
/// use estate_ml::preprocessing::{CityEncoder, FittedTransformer, Transformer};
///
/// let fitted = CityEncoder::new().fit(["Pune", "Mumbai", "Pune"])?;
/// assert_eq!(fitted.transform_one("Pune")?, vec![0.0, 1.0]);
/// // Unseen city: all-zero segment, no error.
/// assert_eq!(fitted.transform_one("Nagpur")?, vec![0.0, 0.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CityEncoder;

impl CityEncoder {
    pub fn new() -> Self {
        Self
    }
}

/// Serializable parameters for a fitted [`CityEncoder`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CityEncoderParams {
    pub vocabulary: CategoryVocabulary,
}

/// Fitted city encoder.
///
/// Unknown cities are encoded as an all-zero segment. Each such miss is
/// logged and counted; the counter is observability state only and never
/// affects the encoding.
#[derive(Debug)]
pub struct FittedCityEncoder {
    vocabulary: CategoryVocabulary,
    unseen: AtomicU64,
}

impl FittedCityEncoder {
    fn new(vocabulary: CategoryVocabulary) -> Self {
        Self {
            vocabulary,
            unseen: AtomicU64::new(0),
        }
    }

    /// Vocabulary learned at fit time.
    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocabulary
    }

    /// Number of inputs so far whose city was not in the vocabulary.
    pub fn unseen_category_count(&self) -> u64 {
        self.unseen.load(Ordering::Relaxed)
    }
}

impl Clone for FittedCityEncoder {
    fn clone(&self) -> Self {
        Self {
            vocabulary: self.vocabulary.clone(),
            unseen: AtomicU64::new(self.unseen_category_count()),
        }
    }
}

impl Transformer for CityEncoder {
    type Input = str;
    type Fitted = FittedCityEncoder;

    fn fit<'a, I>(&self, data: I) -> Result<Self::Fitted, EstateError>
    where
        I: IntoIterator<Item = &'a Self::Input>,
        Self::Input: 'a,
    {
        let mut rows = 0usize;
        let vocabulary = CategoryVocabulary::from_values(data.into_iter().inspect(|_| rows += 1));
        if rows == 0 {
            return Err(EstateError::EmptyData(
                "Cannot fit CityEncoder on empty data".to_string(),
            ));
        }
        tracing::debug!(rows, categories = vocabulary.len(), "fitted city vocabulary");
        Ok(FittedCityEncoder::new(vocabulary))
    }
}

impl FittedTransformer for FittedCityEncoder {
    type Input = str;
    type Params = CityEncoderParams;

    fn n_features_out(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform_into(&self, city: &str, out: &mut [f64]) -> Result<(), EstateError> {
        if out.len() != self.vocabulary.len() {
            return Err(EstateError::SchemaMismatch {
                expected_features: self.vocabulary.len(),
                got_features: out.len(),
            });
        }

        out.fill(0.0);
        match self.vocabulary.index_of(city) {
            Some(idx) => out[idx] = 1.0,
            None => {
                let total = self.unseen.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    city,
                    unseen_total = total,
                    "city not in fit-time vocabulary; encoding as all-zero segment"
                );
            }
        }
        Ok(())
    }

    fn extract_params(&self) -> Self::Params {
        CityEncoderParams {
            vocabulary: self.vocabulary.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, EstateError> {
        params.vocabulary.validate()?;
        Ok(Self::new(params.vocabulary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> FittedCityEncoder {
        CityEncoder::new()
            .fit(["Pune", "Mumbai", "Pune", "Thane"])
            .unwrap()
    }

    #[test]
    fn test_city_encoder_known_categories() {
        let enc = fitted();
        assert_eq!(enc.n_features_out(), 3);
        assert_eq!(enc.transform_one("Mumbai").unwrap(), vec![1.0, 0.0, 0.0]);
        assert_eq!(enc.transform_one("Pune").unwrap(), vec![0.0, 1.0, 0.0]);
        assert_eq!(enc.transform_one("Thane").unwrap(), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_city_encoder_unseen_is_zero_and_counted() {
        let enc = fitted();
        assert_eq!(enc.unseen_category_count(), 0);

        let first = enc.transform_one("Nagpur").unwrap();
        let second = enc.transform_one("Nagpur").unwrap();
        assert_eq!(first, vec![0.0, 0.0, 0.0]);
        assert_eq!(first, second);
        assert_eq!(enc.unseen_category_count(), 2);
    }

    #[test]
    fn test_city_encoder_case_sensitive() {
        let enc = fitted();
        assert_eq!(enc.transform_one("pune").unwrap(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_city_encoder_clears_output_buffer() {
        let enc = fitted();
        let mut out = vec![7.0; 3];
        enc.transform_into("Unknown", &mut out).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_city_encoder_wrong_buffer_width() {
        let enc = fitted();
        let mut out = vec![0.0; 2];
        let result = enc.transform_into("Pune", &mut out);
        assert!(matches!(
            result,
            Err(EstateError::SchemaMismatch {
                expected_features: 3,
                got_features: 2
            })
        ));
    }

    #[test]
    fn test_city_encoder_empty_data() {
        let result = CityEncoder::new().fit(std::iter::empty::<&str>());
        assert!(matches!(result, Err(EstateError::EmptyData(_))));
    }

    #[test]
    fn test_city_encoder_params_roundtrip() {
        let enc = fitted();
        let restored = FittedCityEncoder::from_params(enc.extract_params()).unwrap();
        assert_eq!(restored.vocabulary(), enc.vocabulary());
        assert_eq!(restored.unseen_category_count(), 0);
    }

    #[test]
    fn test_city_encoder_transform_matrix() {
        let enc = fitted();
        let m = enc.transform(["Thane", "Mumbai"]).unwrap();
        assert_eq!(m.shape(), &[2, 3]);
        assert_eq!(m[[0, 2]], 1.0);
        assert_eq!(m[[1, 0]], 1.0);
    }
}
