use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::models::domain::{HealthState, PredictionLabel};

/// Response for the predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    pub email_text: String,
    pub prediction: PredictionLabel,
    /// Highest class probability, 0.0 for the Error sentinel
    #[schema(minimum = 0.0, maximum = 1.0)]
    pub confidence: f64,
    pub is_spam: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl PredictionResponse {
    /// Sentinel response used whenever no real prediction can be made
    pub fn error(email_text: impl Into<String>) -> Self {
        Self {
            email_text: email_text.into(),
            prediction: PredictionLabel::Error,
            confidence: 0.0,
            is_spam: false,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Response for the batch predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<PredictionResponse>,
    pub total: usize,
    pub spam_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthState,
    pub model_loaded: bool,
    pub vectorizer_loaded: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Model metadata, or an error object when no classifier is loaded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ModelInfoResponse {
    Loaded {
        model_type: String,
        model_loaded: bool,
        vectorizer_loaded: bool,
        features: usize,
    },
    Unavailable {
        error: String,
    },
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
