use crate::config::ModelSettings;
use crate::core::{ArtifactError, Classifier, TfidfVectorizer, VectorizerArtifact};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Classifier and vectorizer loaded together at startup
///
/// Either both are present or, after a failed load, neither is. The
/// constructor still accepts partial pairs so degraded states can be modelled.
#[derive(Debug, Clone, Default)]
pub struct ArtifactPair {
    pub classifier: Option<Classifier>,
    pub vectorizer: Option<TfidfVectorizer>,
}

impl ArtifactPair {
    pub fn new(classifier: Option<Classifier>, vectorizer: Option<TfidfVectorizer>) -> Self {
        Self {
            classifier,
            vectorizer,
        }
    }

    /// Pair with neither artifact, used for degraded mode
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when both artifacts are available
    pub fn is_complete(&self) -> bool {
        self.classifier.is_some() && self.vectorizer.is_some()
    }
}

/// Reads the classifier and vectorizer artifacts from disk
#[derive(Debug, Clone)]
pub struct ModelLoader {
    classifier_path: PathBuf,
    vectorizer_path: PathBuf,
}

impl ModelLoader {
    pub fn new(classifier_path: impl Into<PathBuf>, vectorizer_path: impl Into<PathBuf>) -> Self {
        Self {
            classifier_path: classifier_path.into(),
            vectorizer_path: vectorizer_path.into(),
        }
    }

    pub fn from_settings(settings: &ModelSettings) -> Self {
        Self::new(&settings.classifier_path, &settings.vectorizer_path)
    }

    /// Load both artifacts, falling back to an empty pair on any failure
    ///
    /// Failures are logged and never retried; the caller keeps running in
    /// degraded mode.
    pub async fn load(&self) -> ArtifactPair {
        match self.try_load().await {
            Ok(pair) => {
                tracing::info!("Model and vectorizer loaded successfully!");
                pair
            }
            Err(ArtifactError::NotFound(missing)) => {
                tracing::error!(
                    "Model files not found ({}). Please ensure these files exist: {}, {}",
                    missing.display(),
                    self.classifier_path.display(),
                    self.vectorizer_path.display()
                );
                ArtifactPair::empty()
            }
            Err(e) => {
                tracing::error!("Error loading model: {}", e);
                ArtifactPair::empty()
            }
        }
    }

    /// Load and validate both artifacts, returning the first error encountered
    pub async fn try_load(&self) -> Result<ArtifactPair, ArtifactError> {
        let classifier: Classifier = read_artifact(&self.classifier_path).await?;
        classifier.validate()?;

        let artifact: VectorizerArtifact = read_artifact(&self.vectorizer_path).await?;
        let vectorizer = TfidfVectorizer::from_artifact(artifact)?;

        if classifier.n_features() != vectorizer.feature_count() {
            return Err(ArtifactError::Incompatible {
                classifier: classifier.n_features(),
                vectorizer: vectorizer.feature_count(),
            });
        }

        tracing::debug!(
            "Loaded {} with {} classes over {} features",
            classifier.type_name(),
            classifier.classes().len(),
            vectorizer.feature_count()
        );

        Ok(ArtifactPair::new(Some(classifier), Some(vectorizer)))
    }
}

async fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound(path.to_path_buf())
        } else {
            ArtifactError::Io(e)
        }
    })?;

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const CLASSIFIER: &str = r#"{
        "model_type": "MultinomialNB",
        "classes": [0, 1],
        "class_log_prior": [-0.693, -0.693],
        "feature_log_prob": [[-0.2, -1.7], [-1.7, -0.2]]
    }"#;

    const VECTORIZER: &str = r#"{"vocabulary": {"free": 0, "meeting": 1}, "idf": [1.0, 1.0]}"#;

    #[tokio::test]
    async fn test_load_complete_pair() {
        let classifier = write_temp(CLASSIFIER);
        let vectorizer = write_temp(VECTORIZER);

        let pair = ModelLoader::new(classifier.path(), vectorizer.path()).load().await;
        assert!(pair.is_complete());
    }

    #[tokio::test]
    async fn test_missing_file_leaves_both_unset() {
        let classifier = write_temp(CLASSIFIER);
        let loader = ModelLoader::new(classifier.path(), "/nonexistent/tfidf_vectorizer.json");

        let err = loader.try_load().await.unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));

        let pair = loader.load().await;
        assert!(pair.classifier.is_none());
        assert!(pair.vectorizer.is_none());
    }

    #[tokio::test]
    async fn test_malformed_artifact_is_parse_error() {
        let classifier = write_temp("{not json");
        let vectorizer = write_temp(VECTORIZER);

        let loader = ModelLoader::new(classifier.path(), vectorizer.path());
        assert!(matches!(loader.try_load().await, Err(ArtifactError::Parse(_))));
        assert!(!loader.load().await.is_complete());
    }

    #[tokio::test]
    async fn test_feature_count_mismatch_is_rejected() {
        let classifier = write_temp(CLASSIFIER);
        let vectorizer = write_temp(r#"{"vocabulary": {"free": 0}, "idf": [1.0]}"#);

        let err = ModelLoader::new(classifier.path(), vectorizer.path())
            .try_load()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Incompatible {
                classifier: 2,
                vectorizer: 1
            }
        ));
    }
}
