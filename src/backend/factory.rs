use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::{BackendKind, CompletionBackend, LocalBackend, RemoteBackend};
use crate::config::{BackendConfig, BackendMode};
use crate::constants::ACCELERATOR_PATHS;
use crate::error::BackendError;

/// Probe for an accelerator the local runtime can use.
pub fn accelerator_available() -> bool {
    ACCELERATOR_PATHS.iter().any(|p| Path::new(p).exists())
}

pub fn select_backend_kind(mode: BackendMode, accelerator_present: bool) -> BackendKind {
    match mode {
        BackendMode::Local => BackendKind::Local,
        BackendMode::Remote => BackendKind::Remote,
        BackendMode::Auto if accelerator_present => BackendKind::Local,
        BackendMode::Auto => BackendKind::Remote,
    }
}

/// Build the single backend this process will use. Called once at startup.
pub async fn build_backend(
    config: &BackendConfig,
) -> Result<Arc<dyn CompletionBackend>, BackendError> {
    let accelerator = config.mode == BackendMode::Auto && accelerator_available();
    let kind = select_backend_kind(config.mode, accelerator);
    info!(
        "🔧 Backend selection: mode={:?} accelerator={} -> {}",
        config.mode, accelerator, kind
    );

    let backend: Arc<dyn CompletionBackend> = match kind {
        BackendKind::Local => Arc::new(LocalBackend::connect(&config.local).await?),
        BackendKind::Remote => {
            let remote = &config.remote;
            let api_key = remote.api_key.clone().unwrap_or_else(|| {
                warn!("⚠️ GROQ_API_KEY not set - remote requests will be degraded");
                String::new()
            });
            info!("Using remote model {} at {}", remote.model, remote.base_url);
            Arc::new(RemoteBackend::new(
                api_key,
                remote.base_url.clone(),
                remote.model.clone(),
                remote.timeout(),
            )?)
        }
    };
    Ok(backend)
}
