//! Error types for Syntra
//!
//! Only two things can go wrong around a dialogue round: the caller hands
//! over nothing to analyze, or the stage log refuses a record. Every
//! scoring and synthesis step is total over its typed input.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("empty input: nothing to analyze")]
    EmptyInput,

    #[error("stage logger unavailable: {reason}")]
    LoggerUnavailable { reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn logger_unavailable(reason: impl Into<String>) -> Self {
        Self::LoggerUnavailable {
            reason: reason.into(),
        }
    }

    /// Message shown to end users. Callers fall back to this instead of
    /// surfacing engine internals.
    pub fn user_message(&self) -> &'static str {
        "could not process this input"
    }
}
