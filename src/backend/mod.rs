pub mod factory;
pub mod local;
pub mod remote;

use async_trait::async_trait;
use std::fmt;

use crate::error::BackendError;

pub use factory::{accelerator_available, build_backend, select_backend_kind};
pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Outcome of a completion that did not fail the request
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    /// Text produced by the model
    Generated(String),
    /// The backend could not answer; `reply` is the user-facing substitute
    Degraded { reply: String, reason: String },
}

impl Completion {
    pub fn reply(&self) -> &str {
        match self {
            Completion::Generated(text) => text,
            Completion::Degraded { reply, .. } => reply,
        }
    }

    pub fn into_reply(self) -> String {
        match self {
            Completion::Generated(text) => text,
            Completion::Degraded { reply, .. } => reply,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Completion::Degraded { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Remote => "remote",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns a validated query into a reply.
///
/// `Err` is fatal to the request. Backends that mask their failures return
/// `Ok(Completion::Degraded { .. })` instead.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn complete(&self, query: &str) -> Result<Completion, BackendError>;
}
