// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{HealthState, PredictionLabel};
pub use requests::{BatchPredictionRequest, PredictionRequest};
pub use responses::{
    BatchPredictionResponse, ErrorResponse, HealthResponse, ModelInfoResponse, PredictionResponse,
};
