use crate::core::{Classifier, InferenceError, TfidfVectorizer};
use crate::models::{
    BatchPredictionResponse, HealthResponse, HealthState, ModelInfoResponse, PredictionLabel,
    PredictionResponse,
};
use crate::services::ArtifactPair;

/// Class label the bundled training pipeline assigns to spam
pub const DEFAULT_SPAM_LABEL: i64 = 0;

/// Outcome of a successful inference on one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: i64,
    pub confidence: f64,
}

/// Spam prediction service
///
/// Owns the immutable artifact pair for the life of the process. Every
/// operation degrades to a well-formed response instead of returning an
/// error, so handlers never fail because of the model.
#[derive(Debug)]
pub struct PredictionService {
    classifier: Option<Classifier>,
    vectorizer: Option<TfidfVectorizer>,
    spam_label: i64,
}

impl PredictionService {
    pub fn new(artifacts: ArtifactPair, spam_label: i64) -> Self {
        Self {
            classifier: artifacts.classifier,
            vectorizer: artifacts.vectorizer,
            spam_label,
        }
    }

    /// Service with no artifacts; every prediction returns the error sentinel
    pub fn degraded() -> Self {
        Self::new(ArtifactPair::empty(), DEFAULT_SPAM_LABEL)
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn vectorizer_loaded(&self) -> bool {
        self.vectorizer.is_some()
    }

    /// Classify a single text
    pub fn predict(&self, text: &str) -> PredictionResponse {
        let (classifier, vectorizer) = match (&self.classifier, &self.vectorizer) {
            (Some(c), Some(v)) => (c, v),
            _ => {
                tracing::error!("Model or vectorizer not loaded");
                return PredictionResponse::error(text);
            }
        };

        match classify(classifier, vectorizer, text) {
            Ok(result) => {
                let is_spam = result.label == self.spam_label;
                let label = if is_spam {
                    PredictionLabel::Spam
                } else {
                    PredictionLabel::Ham
                };

                tracing::info!(
                    "Prediction made: {} (confidence: {:.2})",
                    label,
                    result.confidence
                );

                PredictionResponse {
                    email_text: text.to_string(),
                    prediction: label,
                    confidence: result.confidence,
                    is_spam,
                    timestamp: chrono::Utc::now(),
                }
            }
            Err(e) => {
                tracing::error!("Prediction error: {}", e);
                PredictionResponse::error(text)
            }
        }
    }

    /// Classify several texts, preserving input order
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> BatchPredictionResponse {
        let predictions: Vec<PredictionResponse> =
            texts.iter().map(|t| self.predict(t.as_ref())).collect();
        let spam_count = predictions.iter().filter(|p| p.is_spam).count();

        BatchPredictionResponse {
            total: predictions.len(),
            spam_count,
            predictions,
        }
    }

    /// Report whether both artifacts are loaded
    pub fn health(&self) -> HealthResponse {
        let model_loaded = self.model_loaded();
        let vectorizer_loaded = self.vectorizer_loaded();

        let (status, message) = if model_loaded && vectorizer_loaded {
            (HealthState::Healthy, None)
        } else {
            (HealthState::Degraded, Some("Models not loaded".to_string()))
        };

        HealthResponse {
            status,
            model_loaded,
            vectorizer_loaded,
            timestamp: chrono::Utc::now(),
            message,
        }
    }

    /// Static metadata about the loaded classifier
    pub fn model_info(&self) -> ModelInfoResponse {
        match &self.classifier {
            None => ModelInfoResponse::Unavailable {
                error: "Model not loaded".to_string(),
            },
            Some(classifier) => ModelInfoResponse::Loaded {
                model_type: classifier.type_name().to_string(),
                model_loaded: true,
                vectorizer_loaded: self.vectorizer_loaded(),
                features: self
                    .vectorizer
                    .as_ref()
                    .map(TfidfVectorizer::feature_count)
                    .unwrap_or(0),
            },
        }
    }
}

/// Vectorize `text` as a single-item batch and run the classifier on it
fn classify(
    classifier: &Classifier,
    vectorizer: &TfidfVectorizer,
    text: &str,
) -> Result<Classification, InferenceError> {
    let features = vectorizer.transform(&[text])?;

    let label = classifier
        .predict(&features)?
        .first()
        .copied()
        .ok_or(InferenceError::EmptyDistribution)?;

    let probabilities = classifier
        .predict_proba(&features)?
        .into_iter()
        .next()
        .ok_or(InferenceError::EmptyDistribution)?;

    let confidence = probabilities
        .iter()
        .copied()
        .fold(None, |max: Option<f64>, p| Some(max.map_or(p, |m| m.max(p))))
        .ok_or(InferenceError::EmptyDistribution)?;

    Ok(Classification {
        label,
        confidence: confidence.clamp(0.0, 1.0),
    })
}
