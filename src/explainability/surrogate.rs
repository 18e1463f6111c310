//! Two-stage surrogate distillation
//!
//! Distills a complex target classifier into an interpretable surrogate
//! restricted to its most influential features:
//!
//! 1. Fit the surrogate on the *target model's own predictions* over the
//!    full training matrix. The surrogate learns to mimic the target's
//!    decision function, not the ground-truth labels.
//! 2. Rank the stage-1 surrogate's importances and select the top
//!    `num_features` feature names.
//! 3. Refit the same surrogate on the reduced matrix against the same
//!    target predictions, so the reported coefficients/importances are
//!    meaningful in the reduced model rather than confounded by
//!    now-dropped features.
//!
//! The stage-1 surrogate and its importances exist only to pick the
//! feature subset; they are discarded from the result.

use crate::error::{GlassboxError, Result};
use crate::explainability::importance::{extract, ExtractOptions, ImportanceRecord};
use crate::training::{
    Classifier, DecisionTree, ImportanceSignal, LogisticRegression, ProbabilisticClassifier,
};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

/// Kind of interpretable surrogate to distill into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurrogateKind {
    /// Logistic-regression surrogate; importances are coefficients
    Linear,
    /// Decision-tree surrogate; importances are split-gain scores
    Tree,
}

impl FromStr for SurrogateKind {
    type Err = GlassboxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(SurrogateKind::Linear),
            "tree" => Ok(SurrogateKind::Tree),
            other => Err(GlassboxError::InvalidSurrogateKind(other.to_string())),
        }
    }
}

/// Configuration for [`distill`]
///
/// Every knob forwarded to a surrogate constructor is enumerated here;
/// construct a fresh value per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrogateConfig {
    pub kind: SurrogateKind,
    /// L2 regularization strength (linear kind)
    pub alpha: f64,
    /// Maximum gradient-descent iterations (linear kind)
    pub max_iter: usize,
    /// Gradient-descent step size (linear kind)
    pub learning_rate: f64,
    /// Maximum tree depth (tree kind)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split (tree kind)
    pub min_samples_split: usize,
    /// Minimum samples per leaf (tree kind)
    pub min_samples_leaf: usize,
    /// Exponentiate linear coefficients in the reported importances
    pub absolute_values: bool,
    /// Rank the stage-2 importances (stage-1 selection always ranks)
    pub sort: bool,
}

impl SurrogateConfig {
    pub fn new(kind: SurrogateKind) -> Self {
        Self {
            kind,
            alpha: 0.01,
            max_iter: 1000,
            learning_rate: 0.1,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            absolute_values: false,
            sort: true,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_absolute_values(mut self, absolute_values: bool) -> Self {
        self.absolute_values = absolute_values;
        self
    }

    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }
}

/// A fitted interpretable surrogate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Surrogate {
    Linear(LogisticRegression),
    Tree(DecisionTree),
}

impl Surrogate {
    fn from_config(config: &SurrogateConfig) -> Self {
        match config.kind {
            SurrogateKind::Linear => Surrogate::Linear(
                LogisticRegression::new()
                    .with_alpha(config.alpha)
                    .with_max_iter(config.max_iter)
                    .with_learning_rate(config.learning_rate),
            ),
            SurrogateKind::Tree => {
                let mut tree = DecisionTree::new()
                    .with_min_samples_split(config.min_samples_split)
                    .with_min_samples_leaf(config.min_samples_leaf);
                if let Some(depth) = config.max_depth {
                    tree = tree.with_max_depth(depth);
                }
                Surrogate::Tree(tree)
            }
        }
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            Surrogate::Linear(model) => {
                model.fit(x, y)?;
            }
            Surrogate::Tree(model) => {
                model.fit(x, y)?;
            }
        }
        Ok(())
    }

    /// Serialize the fitted surrogate
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize a surrogate previously written by [`Surrogate::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Classifier for Surrogate {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            Surrogate::Linear(model) => model.predict(x),
            Surrogate::Tree(model) => model.predict(x),
        }
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        match self {
            Surrogate::Linear(model) => Some(model),
            Surrogate::Tree(_) => None,
        }
    }

    fn importance_signal(&self) -> Option<ImportanceSignal> {
        match self {
            Surrogate::Linear(model) => Classifier::importance_signal(model),
            Surrogate::Tree(model) => Classifier::importance_signal(model),
        }
    }
}

/// Result of distillation
///
/// The surrogate was fit only on the reduced feature subset selected in
/// stage 1, and the importances were extracted from that refit model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurrogateResult {
    pub surrogate: Surrogate,
    pub feature_importances: Vec<ImportanceRecord>,
}

/// Distill `target` into an interpretable surrogate over its most
/// influential features
///
/// `feature_names` must align positionally with the columns of `x_train`
/// and be unique. `num_features` bounds the reduced feature subset; zero,
/// or any value at or above the full width, selects every feature and
/// stage 2 degenerates to a refit on the full set (not an error). The
/// reduced matrix's columns follow the stage-1 importance ranking.
pub fn distill(
    target: &dyn Classifier,
    x_train: &Array2<f64>,
    feature_names: &[String],
    num_features: usize,
    config: &SurrogateConfig,
) -> Result<SurrogateResult> {
    if feature_names.len() != x_train.ncols() {
        return Err(GlassboxError::DimensionMismatch {
            expected: format!("{} feature names", x_train.ncols()),
            actual: format!("{}", feature_names.len()),
        });
    }

    // Names map back to column indices by value, so a duplicate would make
    // two stage-1 records select the same column.
    let index_of: HashMap<&str, usize> = feature_names
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();
    if index_of.len() != feature_names.len() {
        return Err(GlassboxError::ValidationError(
            "feature names must be unique".to_string(),
        ));
    }

    // The surrogate mimics the target's decision function, so it is fit
    // against the target's predictions, never the ground-truth labels.
    let y_pred = target.predict(x_train)?;

    let mut surrogate = Surrogate::from_config(config);
    surrogate.fit(x_train, &y_pred)?;

    let stage1_options = ExtractOptions {
        absolute_values: config.absolute_values,
        sort: true,
        limit: Some(num_features),
    };
    let stage1 = extract(&surrogate, feature_names, &stage1_options)?;
    debug!(
        kind = ?config.kind,
        selected = stage1.len(),
        total = feature_names.len(),
        "stage-1 feature selection complete"
    );

    let mut selected_columns = Vec::with_capacity(stage1.len());
    let mut selected_names = Vec::with_capacity(stage1.len());
    for record in &stage1 {
        let idx = index_of.get(record.feature.as_str()).copied().ok_or_else(|| {
            GlassboxError::ValidationError(format!(
                "selected feature {} missing from feature set",
                record.feature
            ))
        })?;
        selected_columns.push(idx);
        selected_names.push(record.feature.clone());
    }

    let x_reduced = x_train.select(Axis(1), &selected_columns);

    // Same surrogate instance, refit on the reduced matrix against the
    // same target predictions.
    surrogate.fit(&x_reduced, &y_pred)?;

    let stage2_options = ExtractOptions {
        absolute_values: config.absolute_values,
        sort: config.sort,
        limit: None,
    };
    let feature_importances = extract(&surrogate, &selected_names, &stage2_options)?;
    debug!(
        features = feature_importances.len(),
        "stage-2 surrogate refit complete"
    );

    Ok(SurrogateResult {
        surrogate,
        feature_importances,
    })
}
