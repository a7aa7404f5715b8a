//! Feature preprocessing for property listings.
//!
//! This module turns a [`PropertyFeatures`] row into the fixed-width numeric
//! [`FeatureVector`] the models consume, following the same fit/fitted split
//! as the models in this crate.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! - [`CityEncoder`]: One-hot encoding of the city, unknown cities map to zeros
//! - [`PropertyTransformer`]: City one-hot plus numeric passthrough
//!
//! # Example
//!
//! ```ignore
//! use estate_ml::preprocessing::{PropertyTransformer, Transformer, FittedTransformer};
//!
//! let fitted = PropertyTransformer::new().fit(&rows)?;
//! let matrix = fitted.transform(&rows)?;
//! assert_eq!(matrix.ncols(), fitted.vocabulary().len() + 4);
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod features;
pub mod traits;
pub mod vocabulary;

pub use column_transformer::{
    FittedPropertyTransformer, PropertyTransformer, PropertyTransformerParams,
};
pub use encoding::{CityEncoder, CityEncoderParams, FittedCityEncoder};
pub use features::{FeatureVector, PropertyFeatures};
pub use traits::{FittedTransformer, Transformer};
pub use vocabulary::CategoryVocabulary;

/// Interpret a raw balcony cell.
///
/// `"Yes"` in any case, with surrounding whitespace, means a balcony. Anything
/// else, including a missing cell, means none.
pub fn balcony_flag(raw: Option<&str>) -> bool {
    raw.map(|s| s.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balcony_flag() {
        assert!(balcony_flag(Some("Yes")));
        assert!(balcony_flag(Some(" yes ")));
        assert!(balcony_flag(Some("YES")));
        assert!(!balcony_flag(Some("No")));
        assert!(!balcony_flag(Some("maybe")));
        assert!(!balcony_flag(Some("")));
        assert!(!balcony_flag(None));
    }
}
