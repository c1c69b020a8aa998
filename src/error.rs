//! Custom error types for the dispatch service
//!
//! Provides structured, typed errors per layer instead of generic Box<dyn Error>

use thiserror::Error;

/// Sentiment model errors
#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("Polarity out of range: {0}")]
    OutOfRange(f64),

    #[error("Polarity model failed: {0}")]
    Model(String),
}

/// Completion backend errors (fatal to the request)
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Runtime serves model {served}, expected {expected}")]
    ModelMismatch { served: String, expected: String },

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Backend initialization failed: {0}")]
    Init(String),
}

/// Interaction log errors
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Interaction not found: {id}")]
    NotFound { id: uuid::Uuid },

    #[error("Log writer is not running")]
    Closed,
}

/// Request dispatch errors
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Query is required")]
    InvalidInput,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Sentiment error: {0}")]
    Sentiment(#[from] SentimentError),

    #[error("Log error: {0}")]
    Log(#[from] LogError),
}

impl DispatchError {
    /// True when the caller is at fault (client-error status).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidInput | DispatchError::Log(LogError::NotFound { .. })
        )
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
