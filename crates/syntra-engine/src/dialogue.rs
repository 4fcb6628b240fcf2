//! Dialogue coordinator — one two-pass round per input
//!
//! ```text
//!   Initial     affective(text)  ∥  analytical(text)
//!   Exchanged   each side receives the other's first-pass assessment
//!   Informed    affective(text, analytical₀)  ∥  analytical(text, affective₀)
//!   Synthesized conflict → policy → synthesis → stage log
//! ```
//!
//! Each pair runs on scoped threads and is joined before the next step.
//! Nothing is shared between rounds except the immutable config and the
//! stage sink.

use std::sync::Arc;
use std::thread;

use serde::Serialize;
use syntra_core::{
    AffectiveAssessment, AnalyticalAssessment, ConflictAssessment, DialogueRound, EngineError,
    PartnerContext, ResolutionPolicy, Result, Stage, StageRecord, SynthesisResult,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::affective::AffectiveAnalyzer;
use crate::analytical::AnalyticalAnalyzer;
use crate::config::EngineConfig;
use crate::conflict::ConflictAssessor;
use crate::input::AnalysisInput;
use crate::resolution::ResolutionTable;
use crate::stage_log::{NullStageLog, StageSink};
use crate::synthesis::SynthesisEngine;

/// Everything one round produced.
#[derive(Debug, Clone, Serialize)]
pub struct DialogueOutcome {
    pub round_id: Uuid,
    pub round: DialogueRound,
    pub conflict: ConflictAssessment,
    pub policy: ResolutionPolicy,
    pub result: SynthesisResult,
    /// Set when the stage sink refused the round. The result is still valid.
    #[serde(skip)]
    pub log_error: Option<EngineError>,
}

#[derive(Serialize)]
struct ConflictStage<'a> {
    #[serde(flatten)]
    assessment: &'a ConflictAssessment,
    policy: &'a ResolutionPolicy,
}

pub struct DialogueCoordinator {
    config: Arc<EngineConfig>,
    affective: AffectiveAnalyzer,
    analytical: AnalyticalAnalyzer,
    assessor: ConflictAssessor,
    table: ResolutionTable,
    synthesis: SynthesisEngine,
    sink: Arc<dyn StageSink>,
}

impl Default for DialogueCoordinator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DialogueCoordinator {
    /// Build every stage from `config`. Stage records are discarded until a
    /// sink is attached with [`with_sink`](Self::with_sink).
    pub fn new(config: EngineConfig) -> Self {
        let config = Arc::new(config);
        Self {
            affective: AffectiveAnalyzer::from_config(&config),
            analytical: AnalyticalAnalyzer::from_config(&config),
            assessor: ConflictAssessor::new(config.conflict.clone()),
            table: ResolutionTable::standard(),
            synthesis: SynthesisEngine::from_config(&config),
            sink: Arc::new(NullStageLog),
            config,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn StageSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_analyzers(mut self, affective: AffectiveAnalyzer, analytical: AnalyticalAnalyzer) -> Self {
        self.affective = affective;
        self.analytical = analytical;
        self
    }

    pub fn with_resolution_table(mut self, table: ResolutionTable) -> Self {
        self.table = table;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one round. Fails only on empty input, before any analyzer runs.
    pub fn run_round(&self, text: &str) -> Result<DialogueOutcome> {
        if text.trim().is_empty() {
            debug!("Rejected empty input");
            return Err(EngineError::EmptyInput);
        }
        let round_id = Uuid::new_v4();

        let (affective_initial, analytical_initial) = join_pair(
            || self.affective.analyze(&AnalysisInput::new(text)),
            || self.analytical.analyze(&AnalysisInput::new(text)),
        );

        let (affective_informed, analytical_informed) = if self.config.dialogue.two_pass {
            self.informed_pass(text, &affective_initial, &analytical_initial)
        } else {
            (affective_initial.clone(), analytical_initial.clone())
        };

        let conflict = self.assessor.assess(&affective_informed, &analytical_informed);
        let policy = self.table.select(conflict.conflict_type());
        let result = self
            .synthesis
            .synthesize(&affective_informed, &analytical_informed, &conflict, &policy);

        let round = DialogueRound {
            affective_initial,
            analytical_initial,
            affective_informed,
            analytical_informed,
        };

        let log_error = self.sink.log_round(&stage_records(round_id, &round, &conflict, &policy, &result)).err();
        if let Some(e) = &log_error {
            warn!("Round {}: {}", round_id, e);
        }

        info!(
            "Round {}: {} conflict ({}), {} → {} at {:.2}",
            round_id,
            conflict.level(),
            conflict.conflict_type(),
            policy.priority,
            result.engagement_state,
            result.confidence
        );

        Ok(DialogueOutcome { round_id, round, conflict, policy, result, log_error })
    }

    /// Entry point for callers that only want the decision.
    pub fn run_dialogue_round(&self, text: &str) -> Result<SynthesisResult> {
        self.run_round(text).map(|outcome| outcome.result)
    }

    fn informed_pass(
        &self,
        text: &str,
        affective_initial: &AffectiveAssessment,
        analytical_initial: &AnalyticalAssessment,
    ) -> (AffectiveAssessment, AnalyticalAssessment) {
        let for_affective =
            AnalysisInput::with_partner(text, PartnerContext::Analytical(analytical_initial.clone()));
        let for_analytical =
            AnalysisInput::with_partner(text, PartnerContext::Affective(affective_initial.clone()));
        join_pair(
            || self.affective.analyze(&for_affective),
            || self.analytical.analyze(&for_analytical),
        )
    }
}

/// Run a round with the default configuration and no stage log.
pub fn run_dialogue_round(text: &str) -> Result<SynthesisResult> {
    DialogueCoordinator::default().run_dialogue_round(text)
}

/// Run `left` on a scoped thread and `right` on this one; join both.
fn join_pair<A, B>(left: impl FnOnce() -> A + Send, right: impl FnOnce() -> B) -> (A, B)
where
    A: Send,
{
    thread::scope(|s| {
        let handle = s.spawn(left);
        let right = right();
        match handle.join() {
            Ok(left) => (left, right),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

fn stage_records(
    round_id: Uuid,
    round: &DialogueRound,
    conflict: &ConflictAssessment,
    policy: &ResolutionPolicy,
    result: &SynthesisResult,
) -> Vec<StageRecord> {
    vec![
        StageRecord::new(round_id, Stage::AffectiveInitial, &round.affective_initial),
        StageRecord::new(round_id, Stage::AnalyticalInitial, &round.analytical_initial),
        StageRecord::new(round_id, Stage::AffectiveInformed, &round.affective_informed),
        StageRecord::new(round_id, Stage::AnalyticalInformed, &round.analytical_informed),
        StageRecord::new(round_id, Stage::Conflict, &ConflictStage { assessment: conflict, policy }),
        StageRecord::new(round_id, Stage::Synthesis, result),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage_log::MemoryStageLog;

    struct RefusingSink;

    impl StageSink for RefusingSink {
        fn log(&self, _record: &StageRecord) -> Result<()> {
            Err(EngineError::logger_unavailable("disk full"))
        }
    }

    #[test]
    fn rejects_blank_input() {
        let log = Arc::new(MemoryStageLog::new());
        let coordinator = DialogueCoordinator::default().with_sink(log.clone());
        assert_eq!(coordinator.run_round("").unwrap_err(), EngineError::EmptyInput);
        assert_eq!(coordinator.run_round(" \t\n ").unwrap_err(), EngineError::EmptyInput);
        assert!(log.is_empty());
    }

    #[test]
    fn logs_six_stages_in_order() {
        let log = Arc::new(MemoryStageLog::new());
        let coordinator = DialogueCoordinator::default().with_sink(log.clone());
        let outcome = coordinator.run_round("The valve is leaking near the pump").unwrap();

        let records = log.records();
        let stages: Vec<Stage> = records.iter().map(|r| r.stage).collect();
        assert_eq!(stages, Stage::ORDER.to_vec());
        assert!(records.iter().all(|r| r.round_id == outcome.round_id));
        assert!(records[4].payload.get("policy").is_some());
        assert_eq!(records[4].payload["type"], "intuition_vs_data");
    }

    #[test]
    fn sink_failure_is_not_fatal() {
        let coordinator = DialogueCoordinator::default().with_sink(Arc::new(RefusingSink));
        let outcome = coordinator.run_round("Please help me decide").unwrap();
        assert!(matches!(outcome.log_error, Some(EngineError::LoggerUnavailable { .. })));
        assert!(!outcome.result.decision_text.is_empty());
    }

    #[test]
    fn single_pass_copies_initial() {
        let mut config = EngineConfig::default();
        config.dialogue.two_pass = false;
        let outcome = DialogueCoordinator::new(config)
            .run_round("avoid harm and injury; respect consent and privacy")
            .unwrap();
        assert!(!outcome.round.informed_changed());
    }

    #[test]
    fn free_function_matches_default_coordinator() {
        let text = "Because the data is measured, the tradeoff is clear";
        let a = run_dialogue_round(text).unwrap();
        let b = DialogueCoordinator::default().run_dialogue_round(text).unwrap();
        assert_eq!(a, b);
    }
}
