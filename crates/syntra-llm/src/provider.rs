//! Streaming model backend behind `--draft`
//!
//! The drafter only needs text: a provider streams `StreamDelta::Text`
//! fragments and closes with one `StreamDelta::Done`.

use crate::types::{LlmRequest, StreamDelta};
use futures::Stream;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

pub type LlmResult<T> = Result<T, LlmError>;

/// Why a prose draft could not be produced. The CLI logs it and prints the
/// decision text instead.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// A stream event could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("stream error: {0}")]
    StreamError(String),

    /// The stream finished without any text to show.
    #[error("provider returned no text")]
    EmptyResponse,

    #[error("cancelled")]
    Cancelled,

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Text fragments of one draft, in arrival order.
pub type LlmStream = Pin<Box<dyn Stream<Item = LlmResult<StreamDelta>> + Send>>;

#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Model families accepted by `--model`.
    fn models(&self) -> &[&str];

    /// Exact names and dated snapshots (`claude-sonnet-4-5-20250929`) both match.
    fn supports_model(&self, model: &str) -> bool {
        self.models()
            .iter()
            .any(|family| model.starts_with(family))
    }

    /// Start streaming a draft. Firing `cancel` drops the connection and ends
    /// the stream with `LlmError::Cancelled`.
    async fn complete_stream(
        &self,
        request: LlmRequest,
        cancel: Option<CancellationToken>,
    ) -> LlmResult<LlmStream>;
}
