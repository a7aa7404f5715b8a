//! Categorical feature encoding.
//!
//! ## CityEncoder
//! Converts a city string to a one-hot segment.
//!
//! ```ignore
//! // Vocabulary: ["Mumbai", "Pune", "Thane"]
//! // "Pune"   -> [0, 1, 0]
//! // "Nagpur" -> [0, 0, 0]   (unseen: zero segment, counted and logged)
//! ```
//!
//! # Design Notes
//!
//! Categories are matched as exact strings against a sorted vocabulary. An
//! unseen category never widens the output and never fails the request.

mod one_hot;

pub use one_hot::{CityEncoder, CityEncoderParams, FittedCityEncoder};
