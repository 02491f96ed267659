use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    BatchPredictionRequest, BatchPredictionResponse, ErrorResponse, HealthResponse,
    ModelInfoResponse, PredictionRequest, PredictionResponse,
};
use crate::services::PredictionService;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PredictionService>,
}

impl AppState {
    pub fn new(predictor: PredictionService) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

/// Configure prediction and introspection routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/predict", web::post().to(predict))
        .route("/health", web::get().to(health_check))
        .route("/api/model-info", web::get().to(model_info))
        .route("/api/predict/batch", web::post().to(predict_batch));
}

/// Classify a single email
///
/// POST /predict
///
/// Request body:
/// ```json
/// { "text": "string" }
/// ```
///
/// Always answers 200; when the model is unavailable or inference fails the
/// body carries `"prediction": "Error"`.
#[utoipa::path(
    post,
    path = "/predict",
    tag = "prediction",
    request_body = PredictionRequest,
    responses(
        (status = 200, description = "Spam/Ham prediction, or the Error sentinel", body = PredictionResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse)
    )
)]
pub async fn predict(
    state: web::Data<AppState>,
    req: web::Json<PredictionRequest>,
) -> impl Responder {
    let response = state.predictor.predict(&req.text);
    HttpResponse::Ok().json(response)
}

/// Classify up to 100 emails in one request
///
/// POST /api/predict/batch
///
/// Request body:
/// ```json
/// { "texts": ["string"] }
/// ```
#[utoipa::path(
    post,
    path = "/api/predict/batch",
    tag = "prediction",
    request_body = BatchPredictionRequest,
    responses(
        (status = 200, description = "One prediction per input text", body = BatchPredictionResponse),
        (status = 400, description = "Malformed JSON or batch size outside 1..=100", body = ErrorResponse)
    )
)]
pub async fn predict_batch(
    state: web::Data<AppState>,
    req: web::Json<BatchPredictionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for batch request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let response = state.predictor.predict_batch(req.texts.as_slice());

    tracing::info!(
        "Batch prediction: {} of {} classified as spam",
        response.spam_count,
        response.total
    );

    HttpResponse::Ok().json(response)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "introspection",
    responses(
        (status = 200, description = "Artifact load state", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.predictor.health())
}

/// Model metadata endpoint
///
/// GET /api/model-info
#[utoipa::path(
    get,
    path = "/api/model-info",
    tag = "introspection",
    responses(
        (status = 200, description = "Classifier metadata, or an error object when no model is loaded", body = ModelInfoResponse)
    )
)]
pub async fn model_info(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.predictor.model_info())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_check_degraded() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(PredictionService::degraded())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "degraded");
        assert_eq!(body["model_loaded"], false);
    }
}
