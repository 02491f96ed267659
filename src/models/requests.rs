use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to classify a single email body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionRequest {
    #[schema(example = "WIN A FREE PRIZE NOW")]
    pub text: String,
}

/// Request to classify several email bodies at once
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BatchPredictionRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(min_items = 1, max_items = 100)]
    pub texts: Vec<String>,
}
