//! Dialogue round records — what one two-pass cycle leaves behind for audit
//!
//! Stage names on the wire:
//!   affective_initial, analytical_initial,
//!   affective_informed, analytical_informed,
//!   conflict, synthesis

use crate::types::{AffectiveAssessment, AnalyticalAssessment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Partner assessment folded into an analyzer's second pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "perspective", rename_all = "snake_case")]
pub enum PartnerContext {
    Affective(AffectiveAssessment),
    Analytical(AnalyticalAssessment),
}

/// All four assessments from one two-pass cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DialogueRound {
    pub affective_initial: AffectiveAssessment,
    pub analytical_initial: AnalyticalAssessment,
    pub affective_informed: AffectiveAssessment,
    pub analytical_informed: AnalyticalAssessment,
}

impl DialogueRound {
    /// True when the informed pass changed either perspective.
    pub fn informed_changed(&self) -> bool {
        self.affective_initial != self.affective_informed
            || self.analytical_initial != self.analytical_informed
    }
}

/// Pipeline stage a record was emitted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AffectiveInitial,
    AnalyticalInitial,
    AffectiveInformed,
    AnalyticalInformed,
    Conflict,
    Synthesis,
}

impl Stage {
    /// Emission order within a round.
    pub const ORDER: [Stage; 6] = [
        Stage::AffectiveInitial,
        Stage::AnalyticalInitial,
        Stage::AffectiveInformed,
        Stage::AnalyticalInformed,
        Stage::Conflict,
        Stage::Synthesis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::AffectiveInitial => "affective_initial",
            Stage::AnalyticalInitial => "analytical_initial",
            Stage::AffectiveInformed => "affective_informed",
            Stage::AnalyticalInformed => "analytical_informed",
            Stage::Conflict => "conflict",
            Stage::Synthesis => "synthesis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, timestamped stage output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StageRecord {
    pub round_id: Uuid,
    pub stage: Stage,
    pub timestamp: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl StageRecord {
    /// Serialize `payload` into a record. Serialization of engine types
    /// cannot fail; anything that does is recorded as an error payload.
    pub fn new(round_id: Uuid, stage: Stage, payload: &impl Serialize) -> Self {
        let payload = serde_json::to_value(payload)
            .unwrap_or_else(|e| serde_json::json!({ "serialization_error": e.to_string() }));
        Self {
            round_id,
            stage,
            timestamp: Utc::now(),
            payload,
        }
    }
}
