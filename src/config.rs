use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::constants;
use crate::error::ConfigError;

/// Which completion backend the process should run with.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Local when an accelerator is present, remote otherwise
    #[default]
    Auto,
    Local,
    Remote,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: default_bind_addr() }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,

    /// Record failed local completions with the placeholder reply
    #[serde(default)]
    pub log_failed_completions: bool,

    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            log_failed_completions: false,
            queue_size: default_queue_size(),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,
    #[serde(default = "default_remote_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Filled from GROQ_API_KEY, never from the file
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_remote_base_url(),
            model: default_remote_model(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

// Secrets stay out of startup logs.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_local_base_url")]
    pub base_url: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Filled from HF_TOKEN, never from the file
    #[serde(skip)]
    pub hf_token: Option<String>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_url: default_local_base_url(),
            model_id: default_model_id(),
            max_concurrent: default_max_concurrent(),
            hf_token: None,
        }
    }
}

impl std::fmt::Debug for LocalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalConfig")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("max_concurrent", &self.max_concurrent)
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}
fn default_log_path() -> PathBuf {
    PathBuf::from(constants::storage::DEFAULT_LOG_PATH)
}
fn default_queue_size() -> usize {
    constants::storage::DEFAULT_QUEUE_SIZE
}
fn default_remote_base_url() -> String {
    constants::remote::DEFAULT_BASE_URL.to_string()
}
fn default_remote_model() -> String {
    constants::remote::DEFAULT_MODEL.to_string()
}
fn default_timeout_secs() -> u64 {
    constants::remote::DEFAULT_TIMEOUT.as_secs()
}
fn default_local_base_url() -> String {
    constants::local::DEFAULT_BASE_URL.to_string()
}
fn default_model_id() -> String {
    constants::local::DEFAULT_MODEL_ID.to_string()
}
fn default_max_concurrent() -> usize {
    1
}

impl AppConfig {
    /// Load from `CITIZEN_AI_CONFIG` (or `config.yaml`), then pull secrets
    /// from the environment. A missing file means all defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CITIZEN_AI_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = Self::from_file(Path::new(&config_path))?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_yaml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("ℹ️ {} not found - using default configuration", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply_env(&mut self) {
        self.backend.remote.api_key = non_empty_env("GROQ_API_KEY");
        self.backend.local.hf_token = non_empty_env("HF_TOKEN");
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.local.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "backend.local.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.backend.remote.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "backend.remote.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.storage.queue_size == 0 {
            return Err(ConfigError::Invalid(
                "storage.queue_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
