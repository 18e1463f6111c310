//! Error types for the glassbox interpretability layer

use thiserror::Error;

/// Result type alias for glassbox operations
pub type Result<T> = std::result::Result<T, GlassboxError>;

/// Main error type for the glassbox crate
///
/// Every failure is call-scoped: nothing here is fatal to the process, and
/// no error is ever downgraded to a default value.
#[derive(Error, Debug)]
pub enum GlassboxError {
    /// The model does not expose the capability the operation needs:
    /// an importance signal for direct extraction, or a probability
    /// surface for the explanation backends.
    #[error("Unsupported model kind: {0}")]
    UnsupportedModelKind(String),

    /// A feature-name sequence disagrees with the model's score-vector
    /// length. Indicates caller misconfiguration; never retried.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Unrecognized surrogate type string.
    #[error("Invalid surrogate kind: {0} (expected \"linear\" or \"tree\")")]
    InvalidSurrogateKind(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failure raised inside an external explanation engine. Surfaced
    /// verbatim so callers can tell an engine failure apart from a
    /// contract violation in this crate.
    #[error(transparent)]
    Engine(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<serde_json::Error> for GlassboxError {
    fn from(err: serde_json::Error) -> Self {
        GlassboxError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for GlassboxError {
    fn from(err: ndarray::ShapeError) -> Self {
        GlassboxError::DimensionMismatch {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GlassboxError::UnsupportedModelKind("no importance signal".to_string());
        assert_eq!(
            err.to_string(),
            "Unsupported model kind: no importance signal"
        );
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = GlassboxError::DimensionMismatch {
            expected: "3 feature names".to_string(),
            actual: "2".to_string(),
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3 feature names, got 2");
    }

    #[test]
    fn test_engine_error_passthrough() {
        let inner = std::io::Error::new(std::io::ErrorKind::InvalidData, "malformed row");
        let err: GlassboxError = GlassboxError::Engine(Box::new(inner));
        assert_eq!(err.to_string(), "malformed row");
    }
}
