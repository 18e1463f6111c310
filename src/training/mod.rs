//! Interpretable surrogate models and model capability traits
//!
//! The two model implementations here are the surrogate kinds used by
//! distillation:
//! - [`LogisticRegression`]: the `linear` kind, exposing coefficients
//! - [`DecisionTree`]: the `tree` kind, exposing split-gain importances
//!
//! Arbitrary external classifiers participate by implementing
//! [`Classifier`] (and [`ProbabilisticClassifier`] where they have a
//! probability surface).

mod models;
pub mod decision_tree;
pub mod linear_models;

pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use linear_models::LogisticRegression;
pub use models::{Classifier, ImportanceSignal, ProbabilisticClassifier};
