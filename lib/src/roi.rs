//! Rental return estimate for an investment property.

use crate::error::EstateError;
use serde::{Deserialize, Serialize};

/// Annual maintenance cost in rupees per square foot.
pub const MAINTENANCE_PER_SQFT: f64 = 15.0;

/// Rupees in one lakh.
pub const RUPEES_PER_LAKH: f64 = 100_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiInput {
    pub total_area: f64,
    /// Purchase price in lakhs.
    pub price_lakhs: f64,
    /// Expected monthly rent in rupees per square foot.
    pub rent_per_sqft: f64,
}

/// Rent, cost and yield figures, all in rupees except `roi_percent`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub monthly_rent: f64,
    pub annual_rent: f64,
    pub annual_maintenance: f64,
    pub roi_percent: f64,
}

/// Estimate the yearly return on the purchase price.
///
/// `roi = (12 * rent_per_sqft * area - 15 * area) / (price_lakhs * 100000) * 100`
///
/// ```rust
/// use estate_ml::roi::{estimate_roi, RoiInput};
///
/// let est = estimate_roi(RoiInput {
///     total_area: 1000.0,
///     price_lakhs: 50.0,
///     rent_per_sqft: 25.0,
/// })
/// .unwrap();
/// assert_eq!(est.annual_rent, 300_000.0);
/// assert!((est.roi_percent - 5.7).abs() < 1e-9);
/// ```
pub fn estimate_roi(input: RoiInput) -> Result<RoiEstimate, EstateError> {
    if !(input.total_area.is_finite() && input.total_area > 0.0) {
        return Err(EstateError::InvalidInput(format!(
            "total_area must be a positive number, got {}",
            input.total_area
        )));
    }
    if !(input.price_lakhs.is_finite() && input.price_lakhs > 0.0) {
        return Err(EstateError::InvalidInput(format!(
            "price_lakhs must be a positive number, got {}",
            input.price_lakhs
        )));
    }
    if !(input.rent_per_sqft.is_finite() && input.rent_per_sqft >= 0.0) {
        return Err(EstateError::InvalidInput(format!(
            "rent_per_sqft must be a non-negative number, got {}",
            input.rent_per_sqft
        )));
    }

    let monthly_rent = input.rent_per_sqft * input.total_area;
    let annual_rent = monthly_rent * 12.0;
    let annual_maintenance = input.total_area * MAINTENANCE_PER_SQFT;
    let roi_percent =
        (annual_rent - annual_maintenance) / (input.price_lakhs * RUPEES_PER_LAKH) * 100.0;

    Ok(RoiEstimate {
        monthly_rent,
        annual_rent,
        annual_maintenance,
        roi_percent,
    })
}
