use actix_web::web;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::models::{
    BatchPredictionRequest, BatchPredictionResponse, ErrorResponse, HealthResponse, HealthState,
    ModelInfoResponse, PredictionLabel, PredictionRequest, PredictionResponse,
};
use crate::routes::api;

/// OpenAPI document for the JSON endpoints
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Email Spam Classifier API",
        description = "Classify email text as Spam or Ham with a pre-trained TF-IDF model"
    ),
    paths(api::predict, api::predict_batch, api::health_check, api::model_info),
    components(schemas(
        PredictionRequest,
        PredictionResponse,
        PredictionLabel,
        BatchPredictionRequest,
        BatchPredictionResponse,
        HealthState,
        HealthResponse,
        ModelInfoResponse,
        ErrorResponse
    )),
    tags(
        (name = "prediction", description = "Spam/Ham classification"),
        (name = "introspection", description = "Service and model status")
    )
)]
pub struct ApiDoc;

/// Mount Swagger UI at /api/docs and ReDoc at /api/redoc
pub fn configure(cfg: &mut web::ServiceConfig) {
    let openapi = ApiDoc::openapi();

    cfg.service(SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", openapi.clone()))
        .service(Redoc::with_url("/api/redoc", openapi));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in ["/predict", "/api/predict/batch", "/health", "/api/model-info"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
