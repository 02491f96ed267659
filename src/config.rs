use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub models: ModelSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

/// Locations of the persisted artifacts and the label convention they use
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer_path: PathBuf,
    /// Class label the training pipeline used for spam
    #[serde(default = "default_spam_label")]
    pub spam_label: i64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            classifier_path: default_classifier_path(),
            vectorizer_path: default_vectorizer_path(),
            spam_label: default_spam_label(),
        }
    }
}

fn default_classifier_path() -> PathBuf { PathBuf::from("models/spam_classifier_model.json") }
fn default_vectorizer_path() -> PathBuf { PathBuf::from("models/tfidf_vectorizer.json") }
fn default_spam_label() -> i64 { 0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SPAM__)
    /// 5. MODEL_PATH / VECTORIZER_PATH / LOG_LEVEL / LOG_FORMAT
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SPAM__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SPAM")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Short variables understood alongside the SPAM__ prefix
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("MODEL_PATH", "models.classifier_path"),
    ("VECTORIZER_PATH", "models.vectorizer_path"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}
