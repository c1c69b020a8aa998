//! Remote chat-completion backend (Groq or any OpenAI-compatible API).
//!
//! Never fails the request: transport, status, decode and timeout errors all
//! become `Completion::Degraded` with a fixed placeholder reply.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use super::{BackendKind, Completion, CompletionBackend};
use crate::constants::remote::{MAX_TOKENS, PLACEHOLDER_REPLY, TEMPERATURE, TOP_P};
use crate::error::BackendError;

#[derive(Clone)]
pub struct RemoteBackend {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl RemoteBackend {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Init(format!("HTTP client: {}", e)))?;
        // One POST per query: the first transient failure is final.
        let no_retry = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(config)
            .with_http_client(http_client)
            .with_backoff(no_retry);
        Ok(Self {
            client,
            model,
            timeout,
        })
    }

    #[allow(deprecated)]
    async fn request(&self, query: &str) -> Result<Option<String>, OpenAIError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(query)
                    .build()?,
            )])
            .max_tokens(MAX_TOKENS)
            .temperature(TEMPERATURE)
            .top_p(TOP_P)
            .build()?;

        let response = self.client.chat().create(request).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }

    fn degraded(reason: String) -> Completion {
        warn!("⚠️ [REMOTE] Degrading reply: {}", reason);
        Completion::Degraded {
            reply: PLACEHOLDER_REPLY.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl CompletionBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn complete(&self, query: &str) -> Result<Completion, BackendError> {
        info!("🤖 [REMOTE] Sending request (model: {})...", self.model);

        match tokio::time::timeout(self.timeout, self.request(query)).await {
            Ok(Ok(Some(content))) => {
                info!("🤖 [REMOTE] Response received.");
                Ok(Completion::Generated(content.trim().to_string()))
            }
            Ok(Ok(None)) => Ok(Self::degraded("response carried no choices".to_string())),
            Ok(Err(e)) => Ok(Self::degraded(e.to_string())),
            Err(_) => Ok(Self::degraded(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
