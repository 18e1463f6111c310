//! Direct feature-importance extraction
//!
//! Normalizes a fitted classifier's native importance signal (split-gain
//! scores for tree-style models, coefficients for linear-style models)
//! into a ranked list of named records under a single policy.

use crate::error::{GlassboxError, Result};
use crate::training::{Classifier, ImportanceSignal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A named importance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceRecord {
    pub feature: String,
    pub score: f64,
}

/// Options for [`extract`]
///
/// Construct fresh per call; options never carry state across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Exponentiate linear coefficients element-wise, turning them into
    /// odds-ratio-style scores. The flag name is historical: the transform
    /// is `exp(c)`, not a literal absolute value. Ignored for tree-style
    /// signals.
    pub absolute_values: bool,
    /// Rank by descending `|score|`. The sort is stable, so ties keep the
    /// input feature order. When false, input order is preserved exactly.
    pub sort: bool,
    /// Keep only the first `limit` records, applied strictly after
    /// ranking. `None` or `Some(0)` keeps all records.
    pub limit: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            absolute_values: true,
            sort: true,
            limit: None,
        }
    }
}

/// Extract and rank a fitted classifier's importance scores
///
/// `feature_names` must align positionally with the model's score vector;
/// a length disagreement fails with `DimensionMismatch`. A model exposing
/// no importance signal fails with `UnsupportedModelKind`. For linear
/// signals only coefficient row 0 is read; multi-class models beyond
/// binary are not supported here.
///
/// The call is idempotent: equal model state and options yield
/// bit-identical output.
pub fn extract(
    model: &dyn Classifier,
    feature_names: &[String],
    options: &ExtractOptions,
) -> Result<Vec<ImportanceRecord>> {
    let scores: Vec<f64> = match model.importance_signal() {
        Some(ImportanceSignal::TreeStyle(values)) => values.to_vec(),
        Some(ImportanceSignal::LinearStyle(coef)) => {
            if coef.nrows() == 0 {
                return Err(GlassboxError::DimensionMismatch {
                    expected: "at least one coefficient row".to_string(),
                    actual: "0 rows".to_string(),
                });
            }
            let row = coef.row(0);
            if options.absolute_values {
                row.iter().map(|c| c.exp()).collect()
            } else {
                row.to_vec()
            }
        }
        None => {
            return Err(GlassboxError::UnsupportedModelKind(
                "classifier exposes neither tree-style importances nor linear coefficients"
                    .to_string(),
            ))
        }
    };

    if scores.len() != feature_names.len() {
        return Err(GlassboxError::DimensionMismatch {
            expected: format!("{} feature names", scores.len()),
            actual: format!("{}", feature_names.len()),
        });
    }

    let mut records: Vec<ImportanceRecord> = feature_names
        .iter()
        .zip(scores)
        .map(|(name, score)| ImportanceRecord {
            feature: name.clone(),
            score,
        })
        .collect();

    if options.sort {
        records.sort_by(|a, b| {
            b.score
                .abs()
                .partial_cmp(&a.score.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    // Truncation always follows ranking.
    if let Some(limit) = options.limit {
        if limit > 0 {
            records.truncate(limit);
        }
    }

    debug!(
        features = records.len(),
        sorted = options.sort,
        "importance extraction complete"
    );

    Ok(records)
}
