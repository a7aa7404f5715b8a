//! Luxury / Budget label derivation.

use crate::error::EstateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Property segment predicted by the classifier.
///
/// The discriminant is the class index used by the forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyTier {
    Budget = 0,
    Luxury = 1,
}

impl PropertyTier {
    pub const ALL: [PropertyTier; 2] = [PropertyTier::Budget, PropertyTier::Luxury];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyTier::Budget => "Budget",
            PropertyTier::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for PropertyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyTier {
    type Err = EstateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Budget" => Ok(PropertyTier::Budget),
            "Luxury" => Ok(PropertyTier::Luxury),
            other => Err(EstateError::InvalidInput(format!(
                "unknown tier '{}', expected Luxury or Budget",
                other
            ))),
        }
    }
}

/// Thresholds that decide the Luxury label.
///
/// A property is Luxury when its price-per-sqft is strictly above
/// `price_per_sqft_threshold` OR its area is strictly above
/// `area_threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPolicy {
    pub price_per_sqft_threshold: f64,
    pub area_threshold: f64,
}

impl LabelPolicy {
    pub const DEFAULT_PRICE_PER_SQFT_THRESHOLD: f64 = 7500.0;
    pub const DEFAULT_AREA_THRESHOLD: f64 = 2000.0;

    pub fn new(price_per_sqft_threshold: f64, area_threshold: f64) -> Self {
        Self {
            price_per_sqft_threshold,
            area_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), EstateError> {
        for (name, value) in [
            ("price_per_sqft_threshold", self.price_per_sqft_threshold),
            ("area_threshold", self.area_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EstateError::InvalidParameter(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn derive(&self, price_per_sqft: f64, total_area: f64) -> PropertyTier {
        if price_per_sqft > self.price_per_sqft_threshold || total_area > self.area_threshold {
            PropertyTier::Luxury
        } else {
            PropertyTier::Budget
        }
    }
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_PRICE_PER_SQFT_THRESHOLD,
            Self::DEFAULT_AREA_THRESHOLD,
        )
    }
}
