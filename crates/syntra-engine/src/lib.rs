//! Syntra Engine — dual-perspective analysis and synthesis
//!
//! Pipeline (data flows strictly downward):
//! - Marker scorer: lexicon substring scoring, clamped to [0, 1]
//! - Affective analyzer: values, tone, qualitative concerns
//! - Analytical analyzer: framework, domain, logical confidence
//! - Conflict assessor: level, type, intensity of disagreement
//! - Resolution table: conflict type → synthesis priority
//! - Synthesis engine: one decision, engagement state, confidence
//! - Dialogue coordinator: initial pass → cross-informed pass → synthesis
//!
//! Every stage of a round is handed to a [`stage_log::StageSink`] as one
//! contiguous batch.

pub mod affective;
pub mod analytical;
pub mod config;
pub mod conflict;
pub mod dialogue;
pub mod input;
pub mod lexicon;
pub mod resolution;
pub mod stage_log;
pub mod synthesis;

pub use affective::AffectiveAnalyzer;
pub use analytical::AnalyticalAnalyzer;
pub use config::EngineConfig;
pub use conflict::{ConflictAssessor, ConflictRule};
pub use dialogue::{run_dialogue_round, DialogueCoordinator, DialogueOutcome};
pub use input::AnalysisInput;
pub use lexicon::{Lexicon, Marker};
pub use resolution::ResolutionTable;
pub use stage_log::{ChannelStageLog, FanoutStageLog, JsonlStageLog, MemoryStageLog, NullStageLog, StageSink};
pub use synthesis::SynthesisEngine;
