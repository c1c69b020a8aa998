//! Request dispatcher: validate, complete, classify, log, respond.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend::{BackendKind, Completion, CompletionBackend};
use crate::constants::remote::PLACEHOLDER_REPLY;
use crate::error::DispatchError;
use crate::sentiment::{Sentiment, SentimentClassifier};
use crate::store::{InteractionLog, InteractionRecord, Rating};

/// What the caller gets back for a successful dispatch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchReply {
    pub id: Uuid,
    pub reply: String,
    pub sentiment: Sentiment,
}

#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn CompletionBackend>,
    classifier: SentimentClassifier,
    log: InteractionLog,
    log_failed_completions: bool,
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        classifier: SentimentClassifier,
        log: InteractionLog,
    ) -> Self {
        Self {
            backend,
            classifier,
            log,
            log_failed_completions: false,
        }
    }

    /// Also record interactions whose completion failed, with the placeholder reply.
    pub fn with_failed_completion_logging(mut self, enabled: bool) -> Self {
        self.log_failed_completions = enabled;
        self
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn log(&self) -> &InteractionLog {
        &self.log
    }

    pub async fn dispatch(&self, raw_query: &str) -> Result<DispatchReply, DispatchError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(DispatchError::InvalidInput);
        }

        info!(
            "📨 [DISPATCH] Query received ({} chars, backend: {})",
            query.len(),
            self.backend.kind()
        );

        let completion = match self.backend.complete(query).await {
            Ok(completion) => completion,
            Err(e) => {
                error!("❌ [DISPATCH] Backend failed: {}", e);
                if self.log_failed_completions {
                    self.record_failed(query).await;
                }
                return Err(DispatchError::Backend(e));
            }
        };

        if let Completion::Degraded { reason, .. } = &completion {
            warn!("⚠️ [DISPATCH] Continuing with degraded reply: {}", reason);
        }

        // Sentiment is about the citizen's query, not the reply
        let sentiment = self.classifier.classify(query)?;

        let record = InteractionRecord::new(query.to_string(), completion.into_reply(), sentiment);
        let response = DispatchReply {
            id: record.id,
            reply: record.reply.clone(),
            sentiment,
        };

        if let Err(e) = self.log.append(record).await {
            error!("❌ [DISPATCH] Interaction {} not logged: {}", response.id, e);
        }

        info!(
            "✅ [DISPATCH] Responded to {} (sentiment: {})",
            response.id, sentiment
        );
        Ok(response)
    }

    /// Attach a citizen's rating to an earlier interaction.
    pub async fn rate(&self, id: Uuid, rating: Rating) -> Result<InteractionRecord, DispatchError> {
        Ok(self.log.rate(id, rating).await?)
    }

    async fn record_failed(&self, query: &str) {
        let sentiment = match self.classifier.classify(query) {
            Ok(sentiment) => sentiment,
            Err(e) => {
                error!("❌ [DISPATCH] Failed completion not logged: {}", e);
                return;
            }
        };
        let record = InteractionRecord::new(query.to_string(), PLACEHOLDER_REPLY.to_string(), sentiment);
        if let Err(e) = self.log.append(record).await {
            error!("❌ [DISPATCH] Failed completion not logged: {}", e);
        }
    }
}
