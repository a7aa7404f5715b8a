//! Bagged random forests over [`DecisionTree`]s.
//!
//! Tree `i` draws its bootstrap sample and its per-node feature subsets from
//! `StdRng::seed_from_u64(random_state + i)`, so a forest is a pure function
//! of its inputs and parameters.

use super::{grow_classification_tree, grow_regression_tree, DecisionTree, MaxFeatures, TreeParams};
use crate::error::EstateError;
use ndarray::ArrayView2;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Hyperparameters shared by both forests.
///
/// `max_features` left unset means every feature for regression and
/// `sqrt(n_features)` for classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub random_state: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: Option<MaxFeatures>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            random_state: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

impl ForestParams {
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn validate(&self) -> Result<(), EstateError> {
        if self.n_estimators == 0 {
            return Err(EstateError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(EstateError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(EstateError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn tree_params(&self, default_features: MaxFeatures) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features.unwrap_or(default_features),
        }
    }

    fn tree_rng(&self, tree: usize) -> StdRng {
        StdRng::seed_from_u64(self.random_state.wrapping_add(tree as u64))
    }
}

/// Sample `n_samples` row indices with replacement.
fn bootstrap_sample(n_samples: usize, rng: &mut StdRng) -> Vec<usize> {
    let dist = Uniform::from(0..n_samples);
    (0..n_samples).map(|_| dist.sample(rng)).collect()
}

fn check_training_shape(x: &ArrayView2<'_, f64>, n_targets: usize) -> Result<(), EstateError> {
    if x.nrows() == 0 {
        return Err(EstateError::EmptyData(
            "Cannot fit a forest with zero samples".to_string(),
        ));
    }
    if x.nrows() != n_targets {
        return Err(EstateError::InvalidParameter(format!(
            "feature matrix has {} rows but {} targets were given",
            x.nrows(),
            n_targets
        )));
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(EstateError::InvalidInput(
            "feature matrix contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

fn check_width(expected: usize, row: &[f64]) -> Result<(), EstateError> {
    if row.len() != expected {
        return Err(EstateError::SchemaMismatch {
            expected_features: expected,
            got_features: row.len(),
        });
    }
    Ok(())
}

/// Random forest of regression trees.
#[derive(Clone, Debug, Default)]
pub struct RandomForestRegressor {
    params: ForestParams,
}

impl RandomForestRegressor {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Fit on a `(n_samples, n_features)` matrix and one target per row.
    pub fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[f64],
    ) -> Result<FittedRandomForestRegressor, EstateError> {
        self.params.validate()?;
        check_training_shape(&x, y.len())?;
        if y.iter().any(|v| !v.is_finite()) {
            return Err(EstateError::InvalidInput(
                "regression targets contain non-finite values".to_string(),
            ));
        }

        let tree_params = self.params.tree_params(MaxFeatures::All);
        let trees: Vec<DecisionTree<f64>> = (0..self.params.n_estimators)
            .map(|i| {
                let mut rng = self.params.tree_rng(i);
                let mut rows = bootstrap_sample(x.nrows(), &mut rng);
                let tree = grow_regression_tree(x, y, &mut rows, &tree_params, &mut rng);
                tracing::debug!(
                    tree = i,
                    depth = tree.depth(),
                    leaves = tree.n_leaves(),
                    "grew regression tree"
                );
                tree
            })
            .collect();

        tracing::info!(
            n_estimators = trees.len(),
            samples = x.nrows(),
            features = x.ncols(),
            "fitted random forest regressor"
        );
        Ok(FittedRandomForestRegressor {
            trees,
            n_features: x.ncols(),
        })
    }
}

/// Fitted regression forest. Prediction is the mean of the tree outputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedRandomForestRegressor {
    trees: Vec<DecisionTree<f64>>,
    n_features: usize,
}

impl FittedRandomForestRegressor {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn predict_row(&self, row: &[f64]) -> Result<f64, EstateError> {
        check_width(self.n_features, row)?;
        let sum: f64 = self.trees.iter().map(|t| *t.leaf_for(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>, EstateError> {
        x.rows()
            .into_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict_row(slice),
                None => self.predict_row(&row.to_vec()),
            })
            .collect()
    }

    /// Structural check for a forest read back from an artifact.
    pub fn validate(&self) -> Result<(), EstateError> {
        if self.trees.is_empty() {
            return Err(EstateError::InvalidArtifact(
                "regression forest has no trees".to_string(),
            ));
        }
        for tree in &self.trees {
            tree.validate(self.n_features, |v| v.is_finite())?;
        }
        Ok(())
    }
}

/// Random forest of classification trees over labels `0..n_classes`.
#[derive(Clone, Debug)]
pub struct RandomForestClassifier {
    params: ForestParams,
    n_classes: usize,
}

impl RandomForestClassifier {
    pub fn new(params: ForestParams, n_classes: usize) -> Self {
        Self { params, n_classes }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: &[usize],
    ) -> Result<FittedRandomForestClassifier, EstateError> {
        self.params.validate()?;
        if self.n_classes < 2 {
            return Err(EstateError::InvalidParameter(format!(
                "a classifier needs at least 2 classes, got {}",
                self.n_classes
            )));
        }
        check_training_shape(&x, y.len())?;
        if let Some(&bad) = y.iter().find(|&&c| c >= self.n_classes) {
            return Err(EstateError::InvalidParameter(format!(
                "label {} is out of range for {} classes",
                bad, self.n_classes
            )));
        }

        let tree_params = self.params.tree_params(MaxFeatures::Sqrt);
        let trees: Vec<DecisionTree<Vec<f64>>> = (0..self.params.n_estimators)
            .map(|i| {
                let mut rng = self.params.tree_rng(i);
                let mut rows = bootstrap_sample(x.nrows(), &mut rng);
                let tree = grow_classification_tree(
                    x,
                    y,
                    self.n_classes,
                    &mut rows,
                    &tree_params,
                    &mut rng,
                );
                tracing::debug!(
                    tree = i,
                    depth = tree.depth(),
                    leaves = tree.n_leaves(),
                    "grew classification tree"
                );
                tree
            })
            .collect();

        tracing::info!(
            n_estimators = trees.len(),
            samples = x.nrows(),
            features = x.ncols(),
            classes = self.n_classes,
            "fitted random forest classifier"
        );
        Ok(FittedRandomForestClassifier {
            trees,
            n_features: x.ncols(),
            n_classes: self.n_classes,
        })
    }
}

/// Fitted classification forest. Class probabilities are the mean of the
/// tree leaf distributions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedRandomForestClassifier {
    trees: Vec<DecisionTree<Vec<f64>>>,
    n_features: usize,
    n_classes: usize,
}

impl FittedRandomForestClassifier {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn predict_proba_row(&self, row: &[f64]) -> Result<Vec<f64>, EstateError> {
        check_width(self.n_features, row)?;
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, leaf) in proba.iter_mut().zip(tree.leaf_for(row)) {
                *p += leaf;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }

    /// Most probable class; ties go to the lower class index.
    pub fn predict_row(&self, row: &[f64]) -> Result<usize, EstateError> {
        let proba = self.predict_proba_row(row)?;
        let mut best = 0;
        for (class, &p) in proba.iter().enumerate().skip(1) {
            if p > proba[best] {
                best = class;
            }
        }
        Ok(best)
    }

    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<usize>, EstateError> {
        x.rows()
            .into_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict_row(slice),
                None => self.predict_row(&row.to_vec()),
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), EstateError> {
        if self.trees.is_empty() {
            return Err(EstateError::InvalidArtifact(
                "classification forest has no trees".to_string(),
            ));
        }
        if self.n_classes < 2 {
            return Err(EstateError::InvalidArtifact(format!(
                "classification forest declares {} classes",
                self.n_classes
            )));
        }
        let n_classes = self.n_classes;
        for tree in &self.trees {
            tree.validate(self.n_features, |leaf| {
                leaf.len() == n_classes && leaf.iter().all(|p| p.is_finite())
            })?;
        }
        Ok(())
    }
}
