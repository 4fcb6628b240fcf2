//! Syntra LLM - optional prose drafting over a streaming provider

pub mod anthropic;
pub mod prose;
pub mod provider;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use prose::{build_prose_prompt, ProseDrafter, ProviderDrafter};
pub use provider::{LlmError, LlmProvider, LlmResult, LlmStream};
pub use tokio_util::sync::CancellationToken;
pub use types::*;
