//! Column transformer for property rows.
//!
//! This module provides [`PropertyTransformer`], which one-hot encodes the
//! city column and passes the numeric columns through, producing a feature
//! vector of fixed width.

#[allow(clippy::module_inception)]
mod column_transformer;

pub use column_transformer::{
    FittedPropertyTransformer, PropertyTransformer, PropertyTransformerParams, N_PASSTHROUGH,
    PASSTHROUGH_COLUMNS,
};
