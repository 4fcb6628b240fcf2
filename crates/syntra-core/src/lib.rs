//! Syntra Core - assessment types, dialogue records, and error handling

pub mod error;
pub mod round;
pub mod types;

pub use error::{EngineError, Result};
pub use round::*;
pub use types::*;
