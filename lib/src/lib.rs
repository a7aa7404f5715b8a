//! # estate-ml
//!
//! Property price estimation, Luxury / Budget classification and budget
//! search over tabular real-estate listings.
//!
//! ## Core Design Principles
//!
//! - **Fit / fitted separation**: unfitted types hold hyperparameters only;
//!   `fit` returns an immutable fitted type that is the only thing able to
//!   predict or be saved.
//! - **One transformation, two phases**: the fitted transformer (with its
//!   city vocabulary) is stored inside each model, so serving encodes
//!   requests exactly as training did.
//! - **Determinism**: vocabulary order, data splits and forests depend only
//!   on the input rows and the configured seeds.
//!
//! ## Quick Start
//!
//! ```rust
//! use estate_ml::dataset::PropertyDataset;
//! use estate_ml::model::{InferenceModel, PriceRegressor};
//! use estate_ml::preprocessing::PropertyFeatures;
//! use estate_ml::tree::ForestParams;
//!
//! let csv = "\
//! Name,Location,Price_Lakhs,Total_Area,Price_per_SQFT,Baths,Balcony
//! A,\"Baner, Pune\",72,900,8000,2,Yes
//! B,\"Wakad, Pune\",55,800,6875,1,No
//! C,\"Worli, Mumbai\",180,1000,18000,2,Yes
//! D,\"Andheri, Mumbai\",150,900,16666,2,No
//! ";
//! let dataset = PropertyDataset::from_reader(csv.as_bytes()).unwrap();
//! let model = PriceRegressor::new(ForestParams::default().with_n_estimators(10))
//!     .fit(&dataset)
//!     .unwrap();
//!
//! let request = PropertyFeatures {
//!     total_area: 950.0,
//!     price_per_sqft: 17000.0,
//!     baths: 2,
//!     balcony: true,
//!     city: "Mumbai".to_string(),
//! };
//! let price = model.predict_features(&request).unwrap();
//! assert!(price.is_finite());
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: CSV loading, city derivation, seeded train/test splits
//! - `preprocessing`: city one-hot encoding and the property transformer
//! - `labeling`: Luxury / Budget label policy
//! - `tree`: CART trees and random forests
//! - `model`: price regressor and tier classifier
//! - `search`: budget filter with stable ordering
//! - `pipeline`: split, fit and evaluate in one call
//! - `serialization`: versioned model artifacts
//! - `cleaning`, `insights`, `roi`: data preparation and market summaries

pub mod cleaning;
pub mod config;
pub mod dataset;
pub mod error;
pub mod insights;
pub mod labeling;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod preprocessing;
pub mod roi;
pub mod search;
pub mod serialization;
pub mod serving;
pub mod tree;

pub use config::PipelineConfig;
pub use dataset::{PropertyDataset, PropertyRecord};
pub use error::EstateError;
pub use labeling::{LabelPolicy, PropertyTier};
pub use model::{FittedPriceRegressor, FittedTierClassifier, InferenceModel};
pub use search::{filter, FilterQuery, SortKey};
