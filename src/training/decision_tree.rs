//! Decision-tree surrogate
//!
//! Binary-split classification tree with impurity-decrease feature
//! importances. Serves as the `tree` surrogate kind for distillation; the
//! normalized importances are the tree-style signal read by direct
//! extraction.

use crate::error::{GlassboxError, Result};
use crate::training::models::{Classifier, ImportanceSignal};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Split impurity criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    Gini,
    Entropy,
}

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node predicting the majority class
    Leaf { value: f64, n_samples: usize },
    /// Binary split on `feature_idx` at `threshold`
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
    },
}

/// Decision tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum tree depth; unbounded when `None`
    pub max_depth: Option<usize>,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples each child must retain
    pub min_samples_leaf: usize,
    /// Impurity criterion
    pub criterion: Criterion,
    n_features: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Create an unfitted classifier tree
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples required to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples per leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set impurity criterion
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Fit the tree to labels in {0, 1, ...}
    ///
    /// Refitting discards the previous tree entirely. Importances are the
    /// total impurity decrease each feature's splits contribute, normalized
    /// to sum to one.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(GlassboxError::DimensionMismatch {
                expected: format!("{} labels", n_samples),
                actual: format!("{}", y.len()),
            });
        }
        if n_samples < self.min_samples_split.max(1) {
            return Err(GlassboxError::ValidationError(format!(
                "need at least {} samples to fit, got {}",
                self.min_samples_split.max(1),
                n_samples
            )));
        }

        self.n_features = x.ncols();

        let mut importances = vec![0.0; self.n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.grow(x, y, &indices, 0, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn grow(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n_samples = indices.len();
        let labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();

        let at_depth_limit = self.max_depth.is_some_and(|d| depth >= d);
        if n_samples < self.min_samples_split || at_depth_limit || Self::is_pure(&labels) {
            return TreeNode::Leaf {
                value: Self::majority_class(&labels),
                n_samples,
            };
        }

        let Some((feature_idx, threshold, gain)) = self.best_split(x, y, indices) else {
            return TreeNode::Leaf {
                value: Self::majority_class(&labels),
                n_samples,
            };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature_idx]] <= threshold);

        if left_indices.len() < self.min_samples_leaf || right_indices.len() < self.min_samples_leaf
        {
            return TreeNode::Leaf {
                value: Self::majority_class(&labels),
                n_samples,
            };
        }

        // Gain is already weighted by the parent's sample share of the split
        // search; scale by sample count so importances weight big splits more.
        importances[feature_idx] += n_samples as f64 * gain;

        let left = Box::new(self.grow(x, y, &left_indices, depth + 1, importances));
        let right = Box::new(self.grow(x, y, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature_idx,
            threshold,
            left,
            right,
            n_samples,
        }
    }

    /// Scan every feature for the threshold with the largest impurity
    /// decrease. Features are scanned in parallel; each candidate threshold
    /// is the midpoint between adjacent distinct values.
    fn best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Option<(usize, f64, f64)> {
        let labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let parent_impurity = self.impurity(&labels);
        let n = indices.len() as f64;

        let per_feature: Vec<Option<(usize, f64, f64)>> = (0..x.ncols())
            .into_par_iter()
            .map(|feature_idx| {
                let mut values: Vec<f64> =
                    indices.iter().map(|&i| x[[i, feature_idx]]).collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                values.dedup();

                let mut best: Option<(f64, f64)> = None; // (threshold, gain)

                for pair in values.windows(2) {
                    let threshold = (pair[0] + pair[1]) / 2.0;

                    let mut left = Vec::new();
                    let mut right = Vec::new();
                    for &i in indices {
                        if x[[i, feature_idx]] <= threshold {
                            left.push(y[i]);
                        } else {
                            right.push(y[i]);
                        }
                    }

                    if left.len() < self.min_samples_leaf || right.len() < self.min_samples_leaf {
                        continue;
                    }

                    let weighted = (left.len() as f64 * self.impurity(&left)
                        + right.len() as f64 * self.impurity(&right))
                        / n;
                    let gain = parent_impurity - weighted;

                    if gain > 0.0 && best.map_or(true, |(_, g)| gain > g) {
                        best = Some((threshold, gain));
                    }
                }

                best.map(|(threshold, gain)| (feature_idx, threshold, gain))
            })
            .collect();

        per_feature
            .into_iter()
            .flatten()
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
    }

    fn impurity(&self, labels: &[f64]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let n = labels.len() as f64;
        let counts = Self::class_counts(labels);

        match self.criterion {
            Criterion::Gini => {
                1.0 - counts
                    .values()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            Criterion::Entropy => -counts
                .values()
                .map(|&c| {
                    let p = c as f64 / n;
                    p * p.ln()
                })
                .sum::<f64>(),
        }
    }

    fn class_counts(labels: &[f64]) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for &label in labels {
            *counts.entry(label.round() as i64).or_insert(0) += 1;
        }
        counts
    }

    fn is_pure(labels: &[f64]) -> bool {
        labels
            .first()
            .map_or(true, |&first| labels.iter().all(|&v| (v - first).abs() < 1e-10))
    }

    fn majority_class(labels: &[f64]) -> f64 {
        Self::class_counts(labels)
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(class, _)| class as f64)
            .unwrap_or(0.0)
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(GlassboxError::ModelNotFitted)?;

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| {
                let sample = x.row(i).to_vec();
                Self::traverse(root, &sample)
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    fn traverse(node: &TreeNode, sample: &[f64]) -> f64 {
        match node {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
                ..
            } => {
                if sample[*feature_idx] <= *threshold {
                    Self::traverse(left, sample)
                } else {
                    Self::traverse(right, sample)
                }
            }
        }
    }

    /// Normalized impurity-decrease importances, one per feature
    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    /// Depth of the fitted tree (0 when unfitted)
    pub fn get_depth(&self) -> usize {
        fn depth_of(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        self.root.as_ref().map_or(0, depth_of)
    }

    /// Number of leaves in the fitted tree (0 when unfitted)
    pub fn get_n_leaves(&self) -> usize {
        fn leaves_of(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => leaves_of(left) + leaves_of(right),
            }
        }
        self.root.as_ref().map_or(0, leaves_of)
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        DecisionTree::predict(self, x)
    }

    fn importance_signal(&self) -> Option<ImportanceSignal> {
        self.feature_importances
            .clone()
            .map(ImportanceSignal::TreeStyle)
    }
}
