//! Kernel attribution backend
//!
//! Wraps an external kernel attribution engine behind capability traits.
//! The engine computes per-instance, per-feature attribution values by
//! perturbation sampling against a background dataset; how it does so is
//! its own business. This module builds the explainer from the model's
//! probability surface, runs it over a dataset or a single instance, and
//! packages the values plus a figure into the uniform envelope.

use crate::error::{GlassboxError, Result};
use crate::explainability::envelope::{ExplanationEnvelope, Renderable};
use crate::explainability::ProbaFn;
use crate::training::Classifier;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Link function applied by the engine between model output and
/// attribution space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkFunction {
    Identity,
    Logit,
}

/// Explainer-construction options recognized by attribution engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionConfig {
    pub link: LinkFunction,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            link: LinkFunction::Identity,
        }
    }
}

/// A built attribution explainer (external black box)
pub trait AttributionExplainer {
    /// Per-class expected baseline values over the background data
    fn expected_value(&self) -> &[f64];

    /// Per-class attribution matrices, each of shape
    /// `(data.nrows(), data.ncols())`
    ///
    /// `sample_size` is the number of perturbation samples per explained
    /// instance: larger values are more stable but cost proportionally
    /// more. No cap is imposed here.
    fn attribution_values(
        &self,
        data: &Array2<f64>,
        sample_size: usize,
    ) -> Result<Vec<Array2<f64>>>;

    /// Additive force figure for the given class slice, anchored at
    /// `base_value`
    fn force_figure(
        &self,
        base_value: f64,
        values: &Array2<f64>,
        features: &Array2<f64>,
        class_names: &[String],
    ) -> Result<Box<dyn Renderable>>;
}

/// Factory for attribution explainers
pub trait AttributionEngine {
    type Explainer: AttributionExplainer;

    fn build_explainer(
        &self,
        predict_proba: ProbaFn<'_>,
        background: &Array2<f64>,
        config: &AttributionConfig,
    ) -> Result<Self::Explainer>;
}

/// Raw output of an attribution run: the explainer handle plus the
/// per-class attribution values
#[derive(Debug)]
pub struct AttributionOutput<X> {
    pub explainer: X,
    pub values: Vec<Array2<f64>>,
}

/// Adapter invoking an attribution engine under the uniform envelope
/// contract
pub struct KernelBackend<E: AttributionEngine> {
    engine: E,
}

impl<E: AttributionEngine> KernelBackend<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Global attribution over a dataset
    ///
    /// Builds an explainer from `x_train`, computes attribution values
    /// over every row of `x_test` with `sample_size` perturbation samples
    /// per instance, and packages the values with an aggregate figure for
    /// the class-0 slice. Fails with `UnsupportedModelKind` before any
    /// explainer is constructed if the model exposes no probability
    /// output.
    pub fn explain_global(
        &self,
        model: &dyn Classifier,
        x_train: &Array2<f64>,
        x_test: &Array2<f64>,
        class_names: &[String],
        sample_size: usize,
        config: &AttributionConfig,
    ) -> Result<ExplanationEnvelope<AttributionOutput<E::Explainer>>> {
        let proba = model.as_probabilistic().ok_or_else(|| {
            GlassboxError::UnsupportedModelKind(
                "model exposes no probability output".to_string(),
            )
        })?;

        let predict = |x: &Array2<f64>| proba.predict_proba(x);
        let explainer = self.engine.build_explainer(&predict, x_train, config)?;
        debug!(
            background = x_train.nrows(),
            explained = x_test.nrows(),
            sample_size,
            "attribution explainer built"
        );

        let values = explainer.attribution_values(x_test, sample_size)?;
        let figure = Self::class_zero_figure(&explainer, &values, x_test, class_names)?;

        Ok(ExplanationEnvelope {
            raw: AttributionOutput { explainer, values },
            feature_importances: None,
            figure: Some(figure),
        })
    }

    /// Local attribution for a single instance
    ///
    /// Mirrors [`KernelBackend::explain_global`] but explains one
    /// instance, producing a per-feature-contribution figure anchored at
    /// the explainer's expected baseline value.
    pub fn explain_local(
        &self,
        model: &dyn Classifier,
        x_train: &Array2<f64>,
        instance: &Array1<f64>,
        class_names: &[String],
        sample_size: usize,
        config: &AttributionConfig,
    ) -> Result<ExplanationEnvelope<AttributionOutput<E::Explainer>>> {
        let proba = model.as_probabilistic().ok_or_else(|| {
            GlassboxError::UnsupportedModelKind(
                "model exposes no probability output".to_string(),
            )
        })?;

        let predict = |x: &Array2<f64>| proba.predict_proba(x);
        let explainer = self.engine.build_explainer(&predict, x_train, config)?;
        debug!(
            background = x_train.nrows(),
            sample_size,
            "attribution explainer built for single instance"
        );

        let data = instance.clone().insert_axis(Axis(0));
        let values = explainer.attribution_values(&data, sample_size)?;
        let figure = Self::class_zero_figure(&explainer, &values, &data, class_names)?;

        Ok(ExplanationEnvelope {
            raw: AttributionOutput { explainer, values },
            feature_importances: None,
            figure: Some(figure),
        })
    }

    fn class_zero_figure(
        explainer: &E::Explainer,
        values: &[Array2<f64>],
        features: &Array2<f64>,
        class_names: &[String],
    ) -> Result<Box<dyn Renderable>> {
        let class_zero = values.first().ok_or_else(|| {
            GlassboxError::ValidationError(
                "attribution engine returned no class slices".to_string(),
            )
        })?;
        let base_value = explainer.expected_value().first().copied().ok_or_else(|| {
            GlassboxError::ValidationError(
                "attribution engine reported no expected value".to_string(),
            )
        })?;

        explainer.force_figure(base_value, class_zero, features, class_names)
    }
}
