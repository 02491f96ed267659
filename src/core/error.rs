use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning text into a prediction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Dimension mismatch: model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Feature index {index} out of range for {n_features} features")]
    FeatureOutOfRange { index: usize, n_features: usize },

    #[error("Non-finite score produced for class {class}")]
    NonFiniteScore { class: i64 },

    #[error("Empty probability distribution")]
    EmptyDistribution,
}

/// Errors that can occur while reading or validating a persisted artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid artifact: {0}")]
    Invalid(String),

    #[error("Classifier expects {classifier} features but vectorizer produces {vectorizer}")]
    Incompatible { classifier: usize, vectorizer: usize },
}
