//! Benchmark fixtures for estate-ml.
//!
//! Listings are generated synthetically from a fixed seed so runs are
//! comparable without shipping a dataset.

pub mod data;

pub use data::synthetic_listings;
