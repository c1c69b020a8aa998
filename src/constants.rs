//! Application-wide constants
//!
//! Generation parameters and thresholds that must not drift between
//! deployments live here rather than in config.yaml.

use std::time::Duration;

/// Sentiment thresholds applied to the polarity score
pub mod sentiment {
    /// Polarity strictly above this is Positive
    pub const POSITIVE_THRESHOLD: f64 = 0.1;

    /// Polarity strictly below this is Negative
    pub const NEGATIVE_THRESHOLD: f64 = -0.1;

    /// How many tokens a negator reaches forward
    pub const NEGATION_WINDOW: usize = 3;

    /// Factor applied to a negated word's polarity
    pub const NEGATION_FACTOR: f64 = -0.5;
}

/// Local model backend (text-generation runtime)
pub mod local {
    pub const USER_MARKER: &str = "<|user|>";
    pub const ASSISTANT_MARKER: &str = "<|assistant|>";

    pub const MAX_NEW_TOKENS: u32 = 100;
    pub const TEMPERATURE: f32 = 0.5;
    pub const TOP_P: f32 = 0.9;
    pub const DO_SAMPLE: bool = true;

    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
    pub const DEFAULT_MODEL_ID: &str = "ibm-granite/granite-3.3-2b-instruct";
}

/// Remote chat-completion backend
pub mod remote {
    use super::*;

    pub const MAX_TOKENS: u32 = 100;
    pub const TEMPERATURE: f32 = 0.5;
    pub const TOP_P: f32 = 1.0;

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
    pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

    /// Reply substituted when the remote API cannot be reached
    pub const PLACEHOLDER_REPLY: &str =
        "The assistant service is unavailable right now. Please try again later.";
}

/// Interaction log
pub mod storage {
    pub const DEFAULT_LOG_PATH: &str = "data/feedback.json";

    /// Pending writer commands before callers wait
    pub const DEFAULT_QUEUE_SIZE: usize = 256;

    /// Rows in the dashboard's recent-interactions table
    pub const RECENT_LIMIT: usize = 10;
}

/// Device nodes and driver entries that indicate an accelerator
pub const ACCELERATOR_PATHS: &[&str] = &["/dev/nvidia0", "/proc/driver/nvidia/version"];
