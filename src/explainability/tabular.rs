//! Perturbation-based tabular explanation backend
//!
//! Wraps an external tabular explanation engine behind capability traits.
//! The engine's statistical machinery (perturbation sampling,
//! kernel-weighted local regression, submodular coverage optimization)
//! is a black box; this module only builds explainers, invokes them with
//! the model's probability surface, and normalizes their output into the
//! uniform envelope.

use crate::error::{GlassboxError, Result};
use crate::explainability::envelope::{envelope, ExplanationEnvelope, RankedExplanation};
use crate::explainability::ProbaFn;
use crate::training::Classifier;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Explainer-construction options recognized by tabular engines
///
/// Construct fresh per call; defaults mirror the backend contract
/// (continuous features are not discretized unless asked).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularExplainerConfig {
    /// Whether the engine should discretize continuous features
    pub discretize_continuous: bool,
    /// Override for the engine's locality kernel width
    pub kernel_width: Option<f64>,
}

impl Default for TabularExplainerConfig {
    fn default() -> Self {
        Self {
            discretize_continuous: false,
            kernel_width: None,
        }
    }
}

/// Per-explanation options forwarded to the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplanationOptions {
    /// Cap on the features reported per explanation
    pub num_features: Option<usize>,
    /// Perturbation samples drawn per explanation
    pub num_samples: Option<usize>,
}

/// A built tabular explainer (external black box)
pub trait TabularExplainer {
    type Explanation: RankedExplanation;

    /// Explain a single instance using the supplied probability function
    fn explain_instance(
        &self,
        instance: &Array1<f64>,
        predict_proba: ProbaFn<'_>,
        options: &ExplanationOptions,
    ) -> Result<Self::Explanation>;

    /// Coverage-maximizing selection over `data`, returning up to
    /// `num_desired` representative explanations
    ///
    /// Deterministic for deterministic engine behavior; callers seed the
    /// engine if reproducibility across runs is required.
    fn coverage_pick(
        &self,
        data: &Array2<f64>,
        predict_proba: ProbaFn<'_>,
        num_desired: usize,
        options: &ExplanationOptions,
    ) -> Result<Vec<Self::Explanation>>;
}

/// Factory for tabular explainers
pub trait TabularEngine {
    type Explainer: TabularExplainer;

    fn build_explainer(
        &self,
        training_data: &Array2<f64>,
        feature_names: &[String],
        class_names: &[String],
        config: &TabularExplainerConfig,
    ) -> Result<Self::Explainer>;
}

/// Adapter invoking a tabular engine under the uniform envelope contract
pub struct TabularBackend<E: TabularEngine> {
    engine: E,
}

impl<E: TabularEngine> TabularBackend<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Explain a single instance
    ///
    /// Builds an engine-specific explainer over `training_data` and invokes
    /// it against `instance` with the model's probability surface. Fails
    /// with `UnsupportedModelKind` before any explainer is constructed if
    /// the model exposes no probability output. Neither `instance` nor
    /// `training_data` is mutated.
    pub fn explain_instance(
        &self,
        model: &dyn Classifier,
        instance: &Array1<f64>,
        training_data: &Array2<f64>,
        feature_names: &[String],
        class_names: &[String],
        config: &TabularExplainerConfig,
        options: &ExplanationOptions,
    ) -> Result<ExplanationEnvelope<<E::Explainer as TabularExplainer>::Explanation>> {
        let proba = model.as_probabilistic().ok_or_else(|| {
            GlassboxError::UnsupportedModelKind(
                "model exposes no probability output".to_string(),
            )
        })?;

        let explainer =
            self.engine
                .build_explainer(training_data, feature_names, class_names, config)?;
        debug!(features = feature_names.len(), "tabular explainer built");

        let predict = |x: &Array2<f64>| proba.predict_proba(x);
        let explanation = explainer.explain_instance(instance, &predict, options)?;

        envelope(explanation)
    }

    /// Explain a dataset through coverage-maximizing selection
    ///
    /// Builds the same kind of explainer, asks the engine's coverage
    /// selection for exactly one representative explanation over the full
    /// `training_data`, and returns that explanation's envelope.
    pub fn explain_dataset(
        &self,
        model: &dyn Classifier,
        training_data: &Array2<f64>,
        feature_names: &[String],
        class_names: &[String],
        config: &TabularExplainerConfig,
        options: &ExplanationOptions,
    ) -> Result<ExplanationEnvelope<<E::Explainer as TabularExplainer>::Explanation>> {
        let proba = model.as_probabilistic().ok_or_else(|| {
            GlassboxError::UnsupportedModelKind(
                "model exposes no probability output".to_string(),
            )
        })?;

        let explainer =
            self.engine
                .build_explainer(training_data, feature_names, class_names, config)?;
        debug!(
            rows = training_data.nrows(),
            "tabular explainer built for coverage selection"
        );

        let predict = |x: &Array2<f64>| proba.predict_proba(x);
        let picked = explainer.coverage_pick(training_data, &predict, 1, options)?;
        let explanation = picked.into_iter().next().ok_or_else(|| {
            GlassboxError::ValidationError(
                "coverage selection returned no explanations".to_string(),
            )
        })?;

        envelope(explanation)
    }
}
