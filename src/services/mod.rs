// Service exports
pub mod loader;
pub mod predictor;

pub use loader::{ArtifactPair, ModelLoader};
pub use predictor::PredictionService;
