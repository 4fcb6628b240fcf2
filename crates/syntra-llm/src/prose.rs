//! Prose drafting — turn a synthesis into a short natural-language reply
//!
//! Optional collaborator. The engine's `decision_text` is always the
//! fallback; nothing here is on the critical path of a dialogue round.

use std::sync::Arc;

use futures::StreamExt;
use syntra_core::SynthesisResult;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::provider::{LlmError, LlmProvider, LlmResult};
use crate::types::{LlmMessage, LlmRequest, StreamDelta, DEFAULT_MODEL};

const SYSTEM_PROMPT: &str = "You rewrite structured decisions as a short, plain reply. \
Keep the stated priority. Do not add facts that are not in the decision. \
Two to four sentences.";

#[async_trait::async_trait]
pub trait ProseDrafter: Send + Sync {
    async fn draft_prose(&self, prompt: &str) -> LlmResult<String>;
}

/// Drafts by streaming one completion from an [`LlmProvider`] and
/// concatenating its text deltas.
pub struct ProviderDrafter {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    cancel: Option<CancellationToken>,
}

impl ProviderDrafter {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 512,
            cancel: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn request(&self, prompt: &str) -> LlmRequest {
        LlmRequest {
            model: self.model.clone(),
            messages: vec![LlmMessage::user(prompt)],
            max_tokens: Some(self.max_tokens),
            temperature: Some(0.3),
            system: Some(SYSTEM_PROMPT.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl ProseDrafter for ProviderDrafter {
    async fn draft_prose(&self, prompt: &str) -> LlmResult<String> {
        if !self.provider.supports_model(&self.model) {
            warn!("{} does not list model {}", self.provider.name(), self.model);
        }

        let mut stream = self
            .provider
            .complete_stream(self.request(prompt), self.cancel.clone())
            .await?;

        let mut text = String::new();
        while let Some(delta) = stream.next().await {
            match delta? {
                StreamDelta::Text(chunk) => text.push_str(&chunk),
                StreamDelta::Done { stop_reason, usage } => {
                    debug!("Draft done: stop_reason={:?} usage={:?}", stop_reason, usage);
                    break;
                }
            }
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Prompt asking for a prose rendering of `result`, grounded in the
/// user's original text.
pub fn build_prose_prompt(result: &SynthesisResult, original_text: &str) -> String {
    format!(
        "Original input:\n{}\n\n\
         Decision ({} priority, {} engagement, confidence {:.2}):\n{}\n\n\
         Conflict between perspectives: {}.\n\
         Write the reply.",
        original_text.trim(),
        result.priority,
        result.engagement_state,
        result.confidence,
        result.decision_text,
        result.conflict_type,
    )
}
