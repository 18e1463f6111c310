//! Uniform result envelope over backend explanations
//!
//! Whatever technique produced an explanation (perturbation-based local
//! explanation, coverage selection, kernel attribution), downstream
//! tooling consumes the same envelope shape.

use crate::error::Result;
use crate::explainability::importance::ImportanceRecord;

/// Opaque renderable figure handle
///
/// Rendering lives outside this crate; engines hand back an owned handle
/// that downstream tooling knows how to draw. The `'static` bound keeps a
/// figure from borrowing explainer-internal buffers that do not outlive
/// the call.
pub trait Renderable: std::fmt::Debug + Send + 'static {}

/// Raw explanation output that carries its own ranked contribution pairs
/// and can build a figure for itself
pub trait RankedExplanation {
    /// Contribution pairs in the engine's own order
    fn contributions(&self) -> Vec<(String, f64)>;

    /// Build the renderable figure for this explanation
    fn figure(&self) -> Result<Box<dyn Renderable>>;
}

/// Normalized explanation result
///
/// The envelope owns its contents but holds no references back into the
/// producing explainer; everything is transient and caller-managed.
#[derive(Debug)]
pub struct ExplanationEnvelope<R> {
    /// Backend-specific raw output
    pub raw: R,
    /// Ranked contribution pairs, when the backend reports them
    pub feature_importances: Option<Vec<ImportanceRecord>>,
    /// Renderable figure, when one was produced
    pub figure: Option<Box<dyn Renderable>>,
}

/// Wrap a ranked explanation in the uniform envelope
///
/// The backend's native ordering is trusted as-is: no re-ranking and no
/// filtering happen here, in contrast to direct extraction, which imposes
/// its own ranking policy on raw scores.
pub fn envelope<R: RankedExplanation>(raw: R) -> Result<ExplanationEnvelope<R>> {
    let feature_importances = raw
        .contributions()
        .into_iter()
        .map(|(feature, score)| ImportanceRecord { feature, score })
        .collect();
    let figure = raw.figure()?;

    Ok(ExplanationEnvelope {
        raw,
        feature_importances: Some(feature_importances),
        figure: Some(figure),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StubFigure;

    impl Renderable for StubFigure {}

    struct StubExplanation {
        pairs: Vec<(String, f64)>,
    }

    impl RankedExplanation for StubExplanation {
        fn contributions(&self) -> Vec<(String, f64)> {
            self.pairs.clone()
        }

        fn figure(&self) -> Result<Box<dyn Renderable>> {
            Ok(Box::new(StubFigure))
        }
    }

    #[test]
    fn test_envelope_preserves_backend_order() {
        // Deliberately not sorted by |score|; the envelope must not re-rank.
        let raw = StubExplanation {
            pairs: vec![
                ("low".to_string(), 0.1),
                ("high".to_string(), 0.9),
                ("mid".to_string(), 0.5),
            ],
        };

        let result = envelope(raw).unwrap();
        let records = result.feature_importances.unwrap();
        let features: Vec<&str> = records.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(features, vec!["low", "high", "mid"]);
        assert!(result.figure.is_some());
    }
}
