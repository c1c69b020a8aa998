//! Local model backend.
//!
//! Talks to a text-generation runtime on the same host (the
//! text-generation-inference HTTP shape: `GET /info`, `POST /generate`) which
//! keeps the model weights and tokenizer loaded for the process lifetime.
//! Failures are fatal to the request and are never retried.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::{BackendKind, Completion, CompletionBackend};
use crate::config::LocalConfig;
use crate::constants::local::{
    ASSISTANT_MARKER, DO_SAMPLE, MAX_NEW_TOKENS, TEMPERATURE, TOP_P, USER_MARKER,
};
use crate::error::BackendError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    model_id: String,
}

/// Wrap a query in the chat role markers the model was tuned on.
pub fn build_prompt(query: &str) -> String {
    format!("{USER_MARKER}\n{query}\n{ASSISTANT_MARKER}\n")
}

/// Keep only the assistant's turn: everything after the last marker, trimmed.
pub fn extract_reply(generated: &str) -> String {
    generated
        .rsplit(ASSISTANT_MARKER)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[derive(Clone)]
pub struct LocalBackend {
    client: Client,
    base_url: String,
    model_id: String,
    hf_token: Option<String>,
    gate: Arc<Semaphore>,
}

impl LocalBackend {
    /// Connect to the runtime and confirm it serves the configured model.
    pub async fn connect(config: &LocalConfig) -> Result<Self, BackendError> {
        let backend = Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            hf_token: config.hf_token.clone(),
            gate: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        };

        let served = backend.served_model().await?;
        if served != backend.model_id {
            return Err(BackendError::ModelMismatch {
                served,
                expected: backend.model_id,
            });
        }

        info!(
            "🧠 [LOCAL] Runtime at {} serving {} (max concurrent: {})",
            backend.base_url,
            backend.model_id,
            config.max_concurrent.max(1)
        );
        Ok(backend)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.hf_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn served_model(&self) -> Result<String, BackendError> {
        let response = self
            .authorized(self.client.get(format!("{}/info", self.base_url)))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let info: InfoResponse = response.json().await?;
        Ok(info.model_id)
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let request = GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                top_p: TOP_P,
                do_sample: DO_SAMPLE,
                return_full_text: true,
            },
        };

        let response = self
            .authorized(self.client.post(format!("{}/generate", self.base_url)))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.generated_text)
    }
}

#[async_trait]
impl CompletionBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn complete(&self, query: &str) -> Result<Completion, BackendError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| BackendError::Generation("generation gate closed".to_string()))?;

        debug!("🧠 [LOCAL] Generating (available slots: {})", self.gate.available_permits());
        let generated = self.generate(&build_prompt(query)).await?;
        let reply = extract_reply(&generated);
        info!("🧠 [LOCAL] Generated {} chars", reply.chars().count());

        Ok(Completion::Generated(reply))
    }
}
