//! CART decision trees and random forests.
//!
//! Trees are grown on row indices into a shared feature matrix, so a
//! bootstrap sample is just a list of (possibly repeated) row indices and
//! no data is copied per tree.
//!
//! - Regression trees minimise squared error; leaves hold the mean target.
//! - Classification trees minimise Gini impurity; leaves hold class
//!   probabilities.
//!
//! Thresholds are midpoints between consecutive distinct feature values.
//! A sample goes left when `x[feature] <= threshold`.

mod criterion;
pub mod forest;

pub use forest::{
    FittedRandomForestClassifier, FittedRandomForestRegressor, ForestParams,
    RandomForestClassifier, RandomForestRegressor,
};

use crate::error::EstateError;
use criterion::{Criterion, Gini, SquaredError};
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How many features are considered at each split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// Every feature, in column order.
    All,
    /// `max(1, floor(sqrt(n_features)))` features drawn at random per node.
    Sqrt,
}

impl MaxFeatures {
    fn count(self, n_features: usize) -> usize {
        match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => ((n_features as f64).sqrt() as usize).clamp(1, n_features.max(1)),
        }
    }
}

/// Growth limits for a single tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
        }
    }
}

/// A node of a flattened tree. Children always have larger indices than
/// their parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode<L> {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(L),
}

/// A fitted decision tree stored as a flat node array rooted at index 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree<L> {
    nodes: Vec<TreeNode<L>>,
}

impl<L> DecisionTree<L> {
    pub fn nodes(&self) -> &[TreeNode<L>] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf(_)))
            .count()
    }

    /// Longest root-to-leaf path; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        fn walk<L>(nodes: &[TreeNode<L>], id: usize) -> usize {
            match &nodes[id] {
                TreeNode::Leaf(_) => 0,
                TreeNode::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Leaf reached by `x`. `x` must have at least as many entries as the
    /// largest feature index used by the tree; callers check the width.
    pub fn leaf_for(&self, x: &[f64]) -> &L {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                TreeNode::Leaf(value) => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Check structural consistency of a deserialized tree.
    ///
    /// Every split must reference an in-range feature and two child nodes
    /// located after it, so traversal always terminates in bounds.
    pub fn validate(
        &self,
        n_features: usize,
        check_leaf: impl Fn(&L) -> bool,
    ) -> Result<(), EstateError> {
        if self.nodes.is_empty() {
            return Err(EstateError::InvalidArtifact("tree has no nodes".to_string()));
        }
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(EstateError::InvalidArtifact(format!(
                            "node {} splits on feature {} but the model has {} features",
                            id, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(EstateError::InvalidArtifact(format!(
                            "node {} has a NaN threshold",
                            id
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= self.nodes.len() {
                            return Err(EstateError::InvalidArtifact(format!(
                                "node {} has out-of-order child {}",
                                id, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf(value) => {
                    if !check_leaf(value) {
                        return Err(EstateError::InvalidArtifact(format!(
                            "node {} has an invalid leaf value",
                            id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Grow a regression tree on the rows listed in `indices`.
pub fn grow_regression_tree(
    x: ArrayView2<'_, f64>,
    y: &[f64],
    indices: &mut [usize],
    params: &TreeParams,
    rng: &mut StdRng,
) -> DecisionTree<f64> {
    let criterion = SquaredError::new(y);
    TreeBuilder::new(x.reborrow(), &criterion, params, rng).grow(indices)
}

/// Grow a classification tree on the rows listed in `indices`.
///
/// Every label must be `< n_classes`.
pub fn grow_classification_tree(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    n_classes: usize,
    indices: &mut [usize],
    params: &TreeParams,
    rng: &mut StdRng,
) -> DecisionTree<Vec<f64>> {
    let criterion = Gini::new(y, n_classes);
    TreeBuilder::new(x.reborrow(), &criterion, params, rng).grow(indices)
}

struct Split {
    feature: usize,
    threshold: f64,
}

struct TreeBuilder<'a, C: Criterion> {
    x: ArrayView2<'a, f64>,
    criterion: &'a C,
    params: &'a TreeParams,
    rng: &'a mut StdRng,
    nodes: Vec<TreeNode<C::Leaf>>,
}

impl<'a, C: Criterion> TreeBuilder<'a, C> {
    fn new(
        x: ArrayView2<'a, f64>,
        criterion: &'a C,
        params: &'a TreeParams,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            x,
            criterion,
            params,
            rng,
            nodes: Vec::new(),
        }
    }

    fn grow(mut self, indices: &mut [usize]) -> DecisionTree<C::Leaf> {
        self.build(indices, 0);
        DecisionTree { nodes: self.nodes }
    }

    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let stats = self.criterion.stats(indices);
        let id = self.nodes.len();
        let n = indices.len();

        let stop = n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf
            || self.params.max_depth.is_some_and(|d| depth >= d)
            || self.criterion.is_pure(indices);
        let split = if stop {
            None
        } else {
            self.best_split(indices, &stats)
        };

        let Some(Split { feature, threshold }) = split else {
            self.nodes.push(TreeNode::Leaf(self.criterion.leaf(&stats)));
            return id;
        };

        self.nodes.push(TreeNode::Split {
            feature,
            threshold,
            left: 0,
            right: 0,
        });

        let mut n_left = 0;
        for i in 0..n {
            if self.x[[indices[i], feature]] <= threshold {
                indices.swap(i, n_left);
                n_left += 1;
            }
        }
        let (left_rows, right_rows) = indices.split_at_mut(n_left);
        let left_id = self.build(left_rows, depth + 1);
        let right_id = self.build(right_rows, depth + 1);

        if let TreeNode::Split { left, right, .. } = &mut self.nodes[id] {
            *left = left_id;
            *right = right_id;
        }
        id
    }

    /// Every feature index, in random order when sampling, together with how
    /// many of them make up the sampled subset.
    fn candidate_features(&mut self) -> (Vec<usize>, usize) {
        let n_features = self.x.ncols();
        let mut features: Vec<usize> = (0..n_features).collect();
        if self.params.max_features == MaxFeatures::Sqrt {
            features.shuffle(&mut *self.rng);
        }
        (features, self.params.max_features.count(n_features))
    }

    fn best_split(&mut self, indices: &[usize], parent: &C::Stats) -> Option<Split> {
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;
        let parent_impurity = self.criterion.impurity(parent);
        // require a real decrease, not float noise from the running sums
        let mut best_impurity = parent_impurity - 1e-12 * parent_impurity.abs().max(1.0);
        let mut best: Option<Split> = None;

        let mut order = indices.to_vec();
        let (features, n_sampled) = self.candidate_features();
        for (visited, feature) in features.into_iter().enumerate() {
            // past the sampled subset, keep drawing only until a split is found
            if visited >= n_sampled && best.is_some() {
                break;
            }
            let x = &self.x;
            order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

            let mut left = self.criterion.empty();
            let mut right = parent.clone();
            for pos in 0..n - 1 {
                self.criterion.shift(&mut left, &mut right, order[pos]);
                let n_left = pos + 1;
                if n_left < min_leaf || n - n_left < min_leaf {
                    continue;
                }
                let here = x[[order[pos], feature]];
                let next = x[[order[pos + 1], feature]];
                if here >= next {
                    continue;
                }
                let impurity = self.criterion.impurity(&left) + self.criterion.impurity(&right);
                if impurity < best_impurity {
                    best_impurity = impurity;
                    best = Some(Split {
                        feature,
                        threshold: midpoint(here, next),
                    });
                }
            }
        }
        best
    }
}

/// A threshold `t` with `lo <= t < hi`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid < hi {
        mid
    } else {
        lo
    }
}
