//! Model capability traits
//!
//! A fitted classifier is an opaque, externally-owned object. This crate
//! only reads its prediction and importance surfaces; it never mutates a
//! model's learned parameters. Capabilities are declared through traits
//! and resolved once where a model enters an operation, not re-probed on
//! every call.

use crate::error::Result;
use ndarray::{Array1, Array2};

/// The native importance signal a fitted model can expose.
///
/// Exactly one shape is expected per model; a model exposing neither
/// reports `None` from [`Classifier::importance_signal`] and direct
/// extraction fails with `UnsupportedModelKind`.
#[derive(Debug, Clone)]
pub enum ImportanceSignal {
    /// Per-feature split-gain scores from tree-style models. Nonnegative,
    /// aligned positionally with the training matrix columns.
    TreeStyle(Array1<f64>),
    /// Linear coefficient rows. Only row 0 is read downstream; multi-class
    /// models beyond binary are not supported by direct extraction.
    LinearStyle(Array2<f64>),
}

/// A fitted classifier consumed through its prediction surfaces.
pub trait Classifier: Send + Sync {
    /// Predict a class label for each row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// The probability surface of this model, when it has one.
    ///
    /// Backends that need probability output resolve this exactly once,
    /// before constructing any explainer, and fail fast when it is absent.
    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticClassifier> {
        None
    }

    /// The model's native importance signal, when it has one.
    fn importance_signal(&self) -> Option<ImportanceSignal> {
        None
    }
}

/// Probability-output capability of a classifier.
pub trait ProbabilisticClassifier: Classifier {
    /// Positive-class probability for each row of `x`.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct LabelOnly;

    impl Classifier for LabelOnly {
        fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(Array1::zeros(x.nrows()))
        }
    }

    #[test]
    fn test_default_capabilities_absent() {
        let model = LabelOnly;
        assert!(model.as_probabilistic().is_none());
        assert!(model.importance_signal().is_none());
    }

    #[test]
    fn test_predict_shape() {
        let model = LabelOnly;
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let labels = model.predict(&x).unwrap();
        assert_eq!(labels.len(), 3);
    }
}
