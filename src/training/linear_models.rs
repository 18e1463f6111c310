//! Logistic-regression surrogate
//!
//! Binary classifier fit by L2-regularized gradient descent. Serves as the
//! `linear` surrogate kind for distillation; its coefficient vector is the
//! linear-style importance signal read by direct extraction.

use crate::error::{GlassboxError, Result};
use crate::training::models::{Classifier, ImportanceSignal, ProbabilisticClassifier};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Logistic regression for binary classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients, one per feature
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// L2 regularization strength
    pub alpha: f64,
    /// Maximum gradient-descent iterations
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
    /// Gradient-descent step size
    pub learning_rate: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create an unfitted model with default hyperparameters
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
        }
    }

    /// Set L2 regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set gradient-descent step size
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit to labels in {0, 1} using batch gradient descent
    ///
    /// Refitting replaces the previous coefficients entirely; nothing from
    /// an earlier fit survives.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(GlassboxError::DimensionMismatch {
                expected: format!("{} labels", n_samples),
                actual: format!("{}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(GlassboxError::ValidationError(
                "cannot fit on an empty training matrix".to_string(),
            ));
        }

        let mut weights: Array1<f64> = Array1::zeros(x.ncols());
        let mut bias = 0.0;

        for _ in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let probabilities = Self::sigmoid(&linear);

            let errors = &probabilities - y;
            let grad_w = (x.t().dot(&errors) / n_samples as f64) + self.alpha * &weights;
            let grad_b = errors.mean().unwrap_or(0.0);

            let grad_norm = (grad_w.mapv(|v| v * v).sum() + grad_b * grad_b).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - self.learning_rate * &grad_w;
            bias -= self.learning_rate * grad_b;
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        Ok(self)
    }

    /// Positive-class probability per row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(GlassboxError::ModelNotFitted)?;
        let intercept = self.intercept.unwrap_or(0.0);
        let linear = x.dot(coefficients) + intercept;
        Ok(Self::sigmoid(&linear))
    }

    /// Predict class labels at the 0.5 threshold
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Coefficient matrix in row form (one row for the binary case)
    pub fn coefficient_matrix(&self) -> Option<Array2<f64>> {
        self.coefficients
            .as_ref()
            .map(|c| c.clone().insert_axis(Axis(0)))
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        LogisticRegression::predict(self, x)
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        Some(self)
    }

    fn importance_signal(&self) -> Option<ImportanceSignal> {
        self.coefficient_matrix().map(ImportanceSignal::LinearStyle)
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        LogisticRegression::predict_proba(self, x)
    }
}
