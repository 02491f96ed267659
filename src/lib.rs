//! Spam Classifier - email spam detection API
//!
//! This library loads a pre-trained TF-IDF vectorizer and classifier and serves
//! spam/ham predictions over HTTP. Missing or broken artifacts put the service
//! in a degraded mode instead of stopping it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Classifier, SparseVector, TfidfVectorizer};
pub use models::{PredictionLabel, PredictionRequest, PredictionResponse, HealthResponse, ModelInfoResponse};
pub use services::{ArtifactPair, ModelLoader, PredictionService};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let service = PredictionService::degraded();
        assert_eq!(service.predict("hello").prediction, PredictionLabel::Error);
    }
}
