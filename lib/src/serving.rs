//! Request and response bodies for the prediction and search endpoints.
//!
//! Handlers take the already-loaded, immutable model or dataset by
//! reference, so one instance can serve concurrent requests from behind an
//! `Arc` without locking.

use crate::dataset::PropertyRecord;
use crate::error::EstateError;
use crate::labeling::PropertyTier;
use crate::model::{FittedPriceRegressor, FittedTierClassifier, InferenceModel};
use crate::preprocessing::PropertyFeatures;
use crate::search::{filter, FilterQuery};
use serde::{Deserialize, Serialize};

/// Price prediction request body.
pub type PredictionRequest = PropertyFeatures;

/// Filter request body.
pub type FilterRequest = FilterQuery;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub price_lakhs: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierResponse {
    pub label: PropertyTier,
}

/// Search outcome. No match is reported explicitly rather than as an
/// empty list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilterResponse {
    Matches {
        count: usize,
        properties: Vec<PropertyRecord>,
    },
    NoMatches,
}

pub fn predict_price(
    model: &FittedPriceRegressor,
    request: &PredictionRequest,
) -> Result<PriceResponse, EstateError> {
    Ok(PriceResponse {
        price_lakhs: model.predict_features(request)?,
    })
}

pub fn classify_tier(
    model: &FittedTierClassifier,
    request: &PredictionRequest,
) -> Result<TierResponse, EstateError> {
    Ok(TierResponse {
        label: model.predict_features(request)?,
    })
}

pub fn search<'a, I>(records: I, request: &FilterRequest) -> Result<FilterResponse, EstateError>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let result = filter(records, request)?;
    if result.is_empty() {
        return Ok(FilterResponse::NoMatches);
    }
    Ok(FilterResponse::Matches {
        count: result.len(),
        properties: result.to_records(),
    })
}
