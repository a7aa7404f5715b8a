//! Training configuration loaded from TOML.
//!
//! Every key is optional. A missing file section or key falls back to the
//! defaults below.
//!
//! ```toml
//! [forest]
//! n_estimators = 100
//! random_state = 42
//! # max_depth = 12
//! min_samples_split = 2
//! min_samples_leaf = 1
//!
//! [split]
//! test_size = 0.2
//! random_state = 42
//!
//! [labels]
//! price_per_sqft_threshold = 7500.0
//! area_threshold = 2000.0
//! ```

use crate::error::EstateError;
use crate::labeling::LabelPolicy;
use crate::tree::ForestParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Hold-out split settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows held out for evaluation, in `(0, 1)`.
    pub test_size: f64,
    pub random_state: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
        }
    }
}

/// Pipeline configuration.
///
/// # Examples
///
/// ```
/// use estate_ml::config::PipelineConfig;
///
/// let config = PipelineConfig::from_toml_str("[forest]\nn_estimators = 10\n").unwrap();
/// assert_eq!(config.forest.n_estimators, 10);
/// assert_eq!(config.split.test_size, 0.2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub forest: ForestParams,
    pub split: SplitConfig,
    pub labels: LabelPolicy,
}

impl PipelineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EstateError> {
        let contents = fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.as_ref().display(), "loaded pipeline config");
        Ok(config)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, EstateError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EstateError> {
        self.forest
            .validate()
            .map_err(|e| EstateError::Config(format!("[forest] {}", e)))?;
        let t = self.split.test_size;
        if !(t > 0.0 && t < 1.0) {
            return Err(EstateError::Config(format!(
                "[split] test_size must be in (0, 1), got {}",
                t
            )));
        }
        self.labels
            .validate()
            .map_err(|e| EstateError::Config(format!("[labels] {}", e)))?;
        Ok(())
    }
}
