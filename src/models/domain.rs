use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Outcome reported to clients for a single text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PredictionLabel {
    Spam,
    Ham,
    /// Artifacts unavailable or inference failed
    Error,
}

impl PredictionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Spam => "Spam",
            PredictionLabel::Ham => "Ham",
            PredictionLabel::Error => "Error",
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service health as reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&PredictionLabel::Spam).unwrap(), "\"Spam\"");
        assert_eq!(serde_json::to_string(&PredictionLabel::Error).unwrap(), "\"Error\"");
        assert_eq!(PredictionLabel::Ham.to_string(), "Ham");
    }

    #[test]
    fn test_health_state_serialization() {
        assert_eq!(serde_json::to_string(&HealthState::Degraded).unwrap(), "\"degraded\"");
    }
}
