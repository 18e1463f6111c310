//! Model explainability module
//!
//! Normalizes heterogeneous interpretability techniques into one
//! consistent contract:
//! - direct importance extraction from a fitted classifier's native
//!   signal ([`extract`])
//! - two-stage surrogate distillation ([`distill`])
//! - pluggable local and global explanation backends
//!   ([`TabularBackend`], [`KernelBackend`]) whose raw output is
//!   normalized into a uniform [`ExplanationEnvelope`]

mod envelope;
mod importance;
mod kernel;
mod surrogate;
mod tabular;

pub use envelope::{envelope, ExplanationEnvelope, RankedExplanation, Renderable};
pub use importance::{extract, ExtractOptions, ImportanceRecord};
pub use kernel::{
    AttributionConfig, AttributionEngine, AttributionExplainer, AttributionOutput, KernelBackend,
    LinkFunction,
};
pub use surrogate::{distill, Surrogate, SurrogateConfig, SurrogateKind, SurrogateResult};
pub use tabular::{
    ExplanationOptions, TabularBackend, TabularEngine, TabularExplainer, TabularExplainerConfig,
};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// Probability function handed to explanation engines
///
/// Wraps a model's positive-class probability surface so engines never
/// touch the model directly.
pub type ProbaFn<'a> = &'a dyn Fn(&Array2<f64>) -> Result<Array1<f64>>;
