//! Glassbox, a glass-box interpretability layer for fitted classifiers
//!
//! This crate makes heterogeneous model-interpretability techniques
//! interchangeable behind one contract:
//!
//! - [`explainability::extract`]: normalize a fitted classifier's native
//!   importance signal (tree-style split gains or linear coefficients)
//!   into a ranked list of named records
//! - [`explainability::distill`]: two-stage distillation of a complex
//!   classifier into an interpretable surrogate restricted to its most
//!   influential features
//! - [`explainability::TabularBackend`] / [`explainability::KernelBackend`]:
//!   adapters over external local- and global-explanation engines,
//!   returning a uniform [`explainability::ExplanationEnvelope`]
//!
//! The statistical machinery of the explanation engines themselves
//! (perturbation sampling, kernel-weighted regression, coverage
//! optimization) lives behind the engine traits and is not implemented
//! here.
//!
//! # Example
//!
//! ```
//! use glassbox::prelude::*;
//! use ndarray::array;
//!
//! let x = array![
//!     [1.0, 9.0],
//!     [2.0, 8.0],
//!     [7.0, 9.0],
//!     [8.0, 8.0],
//! ];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//! let names = vec!["age".to_string(), "noise".to_string()];
//!
//! // A tree as the (stand-in) complex target model.
//! let mut target = DecisionTree::new();
//! target.fit(&x, &y).unwrap();
//!
//! // Distill into a one-feature tree surrogate.
//! let config = SurrogateConfig::new(SurrogateKind::Tree);
//! let result = distill(&target, &x, &names, 1, &config).unwrap();
//! assert_eq!(result.feature_importances.len(), 1);
//! ```

pub mod error;
pub mod explainability;
pub mod training;

pub use error::{GlassboxError, Result};

/// Re-exports of the commonly used types
pub mod prelude {
    pub use crate::error::{GlassboxError, Result};
    pub use crate::explainability::{
        distill, envelope, extract, AttributionConfig, AttributionEngine, AttributionExplainer,
        AttributionOutput, ExplanationEnvelope, ExplanationOptions, ExtractOptions,
        ImportanceRecord, KernelBackend, LinkFunction, RankedExplanation, Renderable, Surrogate,
        SurrogateConfig, SurrogateKind, SurrogateResult, TabularBackend, TabularEngine,
        TabularExplainer, TabularExplainerConfig,
    };
    pub use crate::training::{
        Classifier, Criterion, DecisionTree, ImportanceSignal, LogisticRegression,
        ProbabilisticClassifier,
    };
}
