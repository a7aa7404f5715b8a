//! PropertyTransformer implementation.
//!
//! One-hot encodes the city column and passes the four numeric columns
//! through unchanged, concatenating the results in a fixed order.

use crate::error::EstateError;
use crate::preprocessing::encoding::{CityEncoder, CityEncoderParams, FittedCityEncoder};
use crate::preprocessing::features::{FeatureVector, PropertyFeatures};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::vocabulary::CategoryVocabulary;
use serde::{Deserialize, Serialize};

/// Names of the passthrough columns, in output order.
pub const PASSTHROUGH_COLUMNS: [&str; 4] = ["total_area", "price_per_sqft", "baths", "balcony"];

/// Number of passthrough columns appended after the one-hot segment.
pub const N_PASSTHROUGH: usize = PASSTHROUGH_COLUMNS.len();

/// Column transformer for property rows.
///
/// Output layout: `[one-hot(city)..., total_area, price_per_sqft, baths, balcony]`.
///
/// # Example
/// ```ignore
/// use estate_ml::preprocessing::{PropertyTransformer, Transformer};
///
/// let fitted = PropertyTransformer::new().fit(&rows)?;
/// let vector = fitted.encode(&request)?;
/// assert_eq!(vector.len(), fitted.vocabulary().len() + 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropertyTransformer {
    city_encoder: CityEncoder,
}

impl PropertyTransformer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Serializable parameters of a fitted [`PropertyTransformer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyTransformerParams {
    pub city_encoder: CityEncoderParams,
    /// Output width recorded at fit time, checked again on load.
    pub n_features_out: usize,
}

/// Fitted property transformer.
#[derive(Clone, Debug)]
pub struct FittedPropertyTransformer {
    city_encoder: FittedCityEncoder,
}

impl FittedPropertyTransformer {
    /// City vocabulary learned at fit time.
    pub fn vocabulary(&self) -> &CategoryVocabulary {
        self.city_encoder.vocabulary()
    }

    /// How many inputs carried a city outside the vocabulary.
    pub fn unseen_category_count(&self) -> u64 {
        self.city_encoder.unseen_category_count()
    }

    /// Column names in output order, e.g. `city=Pune`, ..., `balcony`.
    pub fn feature_names(&self) -> Vec<String> {
        self.vocabulary()
            .iter()
            .map(|c| format!("city={}", c))
            .chain(PASSTHROUGH_COLUMNS.iter().map(|s| s.to_string()))
            .collect()
    }

    /// Validate and encode one row.
    pub fn encode(&self, features: &PropertyFeatures) -> Result<FeatureVector, EstateError> {
        self.transform_one(features).map(FeatureVector::new)
    }
}

impl Transformer for PropertyTransformer {
    type Input = PropertyFeatures;
    type Fitted = FittedPropertyTransformer;

    fn fit<'a, I>(&self, data: I) -> Result<Self::Fitted, EstateError>
    where
        I: IntoIterator<Item = &'a Self::Input>,
        Self::Input: 'a,
    {
        let rows: Vec<&PropertyFeatures> = data.into_iter().collect();
        if rows.is_empty() {
            return Err(EstateError::EmptyData(
                "Cannot fit PropertyTransformer on empty data".to_string(),
            ));
        }
        for row in &rows {
            row.validate()?;
        }

        let city_encoder = self
            .city_encoder
            .fit(rows.iter().map(|r| r.city.as_str()))?;
        tracing::info!(
            rows = rows.len(),
            cities = city_encoder.vocabulary().len(),
            width = city_encoder.n_features_out() + N_PASSTHROUGH,
            "fitted property transformer"
        );
        Ok(FittedPropertyTransformer { city_encoder })
    }
}

impl FittedTransformer for FittedPropertyTransformer {
    type Input = PropertyFeatures;
    type Params = PropertyTransformerParams;

    fn n_features_out(&self) -> usize {
        self.city_encoder.n_features_out() + N_PASSTHROUGH
    }

    fn transform_into(&self, input: &PropertyFeatures, out: &mut [f64]) -> Result<(), EstateError> {
        let width = self.n_features_out();
        if out.len() != width {
            return Err(EstateError::SchemaMismatch {
                expected_features: width,
                got_features: out.len(),
            });
        }
        input.validate()?;

        let n_cities = self.city_encoder.n_features_out();
        let (one_hot, numeric) = out.split_at_mut(n_cities);
        self.city_encoder.transform_into(&input.city, one_hot)?;

        numeric[0] = input.total_area;
        numeric[1] = input.price_per_sqft;
        numeric[2] = f64::from(input.baths);
        numeric[3] = if input.balcony { 1.0 } else { 0.0 };
        Ok(())
    }

    fn extract_params(&self) -> Self::Params {
        PropertyTransformerParams {
            city_encoder: self.city_encoder.extract_params(),
            n_features_out: self.n_features_out(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, EstateError> {
        let city_encoder = FittedCityEncoder::from_params(params.city_encoder)?;
        let fitted = Self { city_encoder };
        if fitted.n_features_out() != params.n_features_out {
            return Err(EstateError::InvalidArtifact(format!(
                "transformer width {} does not match vocabulary of {} cities",
                params.n_features_out,
                fitted.vocabulary().len()
            )));
        }
        Ok(fitted)
    }
}
