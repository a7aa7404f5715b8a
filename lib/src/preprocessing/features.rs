//! Model input row and encoded feature vector.

use crate::dataset::PropertyRecord;
use crate::error::EstateError;
use serde::{Deserialize, Serialize};

/// The five raw features a model consumes.
///
/// This is also the body of a prediction request at the serving boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyFeatures {
    pub total_area: f64,
    pub price_per_sqft: f64,
    pub baths: u32,
    pub balcony: bool,
    pub city: String,
}

impl PropertyFeatures {
    /// Reject values the models were never meant to see.
    ///
    /// Area and price-per-sqft must be finite and strictly positive, and a
    /// property has at least one bathroom. The city is not checked here: an
    /// unknown city is a supported input.
    pub fn validate(&self) -> Result<(), EstateError> {
        if !(self.total_area.is_finite() && self.total_area > 0.0) {
            return Err(EstateError::InvalidInput(format!(
                "total_area must be a positive number, got {}",
                self.total_area
            )));
        }
        if !(self.price_per_sqft.is_finite() && self.price_per_sqft > 0.0) {
            return Err(EstateError::InvalidInput(format!(
                "price_per_sqft must be a positive number, got {}",
                self.price_per_sqft
            )));
        }
        if self.baths == 0 {
            return Err(EstateError::InvalidInput(
                "baths must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&PropertyRecord> for PropertyFeatures {
    fn from(record: &PropertyRecord) -> Self {
        Self {
            total_area: record.total_area,
            price_per_sqft: record.price_per_sqft,
            baths: record.baths,
            balcony: record.balcony,
            city: record.city.clone(),
        }
    }
}

/// A fixed-order numeric encoding of one property.
///
/// Layout: `[one-hot(city)..., total_area, price_per_sqft, baths, balcony]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> PropertyFeatures {
        PropertyFeatures {
            total_area: 1000.0,
            price_per_sqft: 5000.0,
            baths: 2,
            balcony: true,
            city: "Pune".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_normal_input() {
        assert!(features().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_area() {
        let mut f = features();
        f.total_area = 0.0;
        assert!(matches!(f.validate(), Err(EstateError::InvalidInput(_))));
        f.total_area = -5.0;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_price_per_sqft() {
        let mut f = features();
        f.price_per_sqft = f64::NAN;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_baths() {
        let mut f = features();
        f.baths = 0;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_from_record_uses_derived_city() {
        let record = PropertyRecord::new("x", "Baner, Pune", 900.0, 8000.0, 72.0, 2, false);
        let f = PropertyFeatures::from(&record);
        assert_eq!(f.city, "Pune");
        assert_eq!(f.baths, 2);
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{"total_area":1000,"price_per_sqft":5000,"baths":2,"balcony":false,"city":"Pune"}"#;
        let f: PropertyFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(f.city, "Pune");
        assert!(!f.balcony);
    }
}
