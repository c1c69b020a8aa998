//! Citizen AI - question-answering dispatch service
//!
//! This library provides the request dispatcher, the completion backends it
//! routes to, query sentiment classification and the durable interaction log
//! the dashboard reads from.

pub mod api;
pub mod backend;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod sentiment;
pub mod store;

// Re-export commonly used types
pub use backend::{BackendKind, Completion, CompletionBackend};
pub use config::AppConfig;
pub use dispatch::{DispatchReply, Dispatcher};
pub use sentiment::{Sentiment, SentimentClassifier};
pub use store::{InteractionLog, InteractionRecord, Rating};
