//! Conflict assessor — how much, and in what way, the perspectives disagree
//!
//! intensity = |moral_weight − logical_confidence|
//! level     = Low / Moderate / High, bucketed at 0.2 and 0.5 by default
//! type      = first matching rule in the configured order, else IntuitionVsData
//!
//! The rule order is configuration, not code: the default reproduces
//! both-high → symbolic-with-confident-framework → protective-state.

use crate::config::ConflictConfig;
use serde::{Deserialize, Serialize};
use syntra_core::{
    clamp_score, AffectiveAssessment, AnalyticalAssessment, ConflictAssessment, ConflictLevel,
    ConflictType,
};
use tracing::debug;

/// One conflict-type classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictRule {
    /// Both scores strictly above the dual-high threshold.
    BothHigh,
    /// A symbolic note on the affective side and a confident analytical framework.
    SymbolicWithConfidentFramework,
    /// The affective state is protective or alert.
    ProtectiveState,
}

impl ConflictRule {
    pub const DEFAULT_ORDER: [ConflictRule; 3] = [
        ConflictRule::BothHigh,
        ConflictRule::SymbolicWithConfidentFramework,
        ConflictRule::ProtectiveState,
    ];

    pub fn conflict_type(self) -> ConflictType {
        match self {
            ConflictRule::BothHigh => ConflictType::ValueVsLogic,
            ConflictRule::SymbolicWithConfidentFramework => ConflictType::CreativeVsAnalytical,
            ConflictRule::ProtectiveState => ConflictType::SafetyVsEfficiency,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConflictAssessor {
    config: ConflictConfig,
}

impl Default for ConflictAssessor {
    fn default() -> Self {
        Self::new(ConflictConfig::default())
    }
}

impl ConflictAssessor {
    pub fn new(config: ConflictConfig) -> Self {
        Self { config }
    }

    /// Total over all inputs. Scores are re-clamped so nothing reaches the
    /// arithmetic as NaN.
    pub fn assess(
        &self,
        affective: &AffectiveAssessment,
        analytical: &AnalyticalAssessment,
    ) -> ConflictAssessment {
        let moral = clamp_score(affective.moral_weight());
        let logical = clamp_score(analytical.logical_confidence());
        let intensity = (moral - logical).abs();
        let level = self.level_for(intensity);
        let conflict_type = self.classify(affective, analytical);

        debug!(
            "Conflict: intensity={:.3} level={} type={}",
            intensity, level, conflict_type
        );
        ConflictAssessment::new(level, conflict_type, intensity)
    }

    /// Monotone in `intensity`.
    pub fn level_for(&self, intensity: f64) -> ConflictLevel {
        let intensity = clamp_score(intensity);
        if intensity >= self.config.high_threshold {
            ConflictLevel::High
        } else if intensity >= self.config.moderate_threshold {
            ConflictLevel::Moderate
        } else {
            ConflictLevel::Low
        }
    }

    pub fn classify(
        &self,
        affective: &AffectiveAssessment,
        analytical: &AnalyticalAssessment,
    ) -> ConflictType {
        self.config
            .order
            .iter()
            .find(|rule| self.rule_matches(**rule, affective, analytical))
            .map(|rule| rule.conflict_type())
            .unwrap_or(ConflictType::IntuitionVsData)
    }

    fn rule_matches(
        &self,
        rule: ConflictRule,
        affective: &AffectiveAssessment,
        analytical: &AnalyticalAssessment,
    ) -> bool {
        let moral = clamp_score(affective.moral_weight());
        let logical = clamp_score(analytical.logical_confidence());
        match rule {
            ConflictRule::BothHigh => {
                moral > self.config.dual_high_threshold && logical > self.config.dual_high_threshold
            }
            ConflictRule::SymbolicWithConfidentFramework => {
                affective.symbolic_note().is_some()
                    && logical > self.config.framework_confidence_threshold
            }
            ConflictRule::ProtectiveState => affective.primary_state().is_protective(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntra_core::{AffectiveState, ReasoningFramework};

    fn affective(state: AffectiveState, weight: f64) -> AffectiveAssessment {
        AffectiveAssessment::new(state, weight)
    }

    fn analytical(confidence: f64) -> AnalyticalAssessment {
        AnalyticalAssessment::new(ReasoningFramework::Causal, confidence)
    }

    #[test]
    fn level_buckets() {
        let assessor = ConflictAssessor::default();
        assert_eq!(assessor.level_for(0.0), ConflictLevel::Low);
        assert_eq!(assessor.level_for(0.19), ConflictLevel::Low);
        assert_eq!(assessor.level_for(0.2), ConflictLevel::Moderate);
        assert_eq!(assessor.level_for(0.49), ConflictLevel::Moderate);
        assert_eq!(assessor.level_for(0.5), ConflictLevel::High);
        assert_eq!(assessor.level_for(1.0), ConflictLevel::High);
    }

    #[test]
    fn level_never_decreases_as_intensity_grows() {
        let assessor = ConflictAssessor::default();
        let mut last = ConflictLevel::Low;
        for step in 0..=100 {
            let level = assessor.level_for(step as f64 / 100.0);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn both_high_wins_first() {
        let a = affective(AffectiveState::Alert, 0.9).with_symbolic_note("storm");
        let c = ConflictAssessor::default().assess(&a, &analytical(0.8));
        assert_eq!(c.conflict_type(), ConflictType::ValueVsLogic);
        assert_eq!(c.level(), ConflictLevel::Low);
    }

    #[test]
    fn symbolic_note_with_confident_framework() {
        let a = affective(AffectiveState::Alert, 0.5).with_symbolic_note("storm");
        let c = ConflictAssessor::default().assess(&a, &analytical(0.65));
        assert_eq!(c.conflict_type(), ConflictType::CreativeVsAnalytical);
    }

    #[test]
    fn protective_state_is_safety_vs_efficiency() {
        let c = ConflictAssessor::default()
            .assess(&affective(AffectiveState::Protective, 0.5), &analytical(0.4));
        assert_eq!(c.conflict_type(), ConflictType::SafetyVsEfficiency);
    }

    #[test]
    fn fallthrough_is_intuition_vs_data() {
        let c = ConflictAssessor::default()
            .assess(&affective(AffectiveState::Curious, 0.9), &analytical(0.1));
        assert_eq!(c.conflict_type(), ConflictType::IntuitionVsData);
        assert_eq!(c.level(), ConflictLevel::High);
        assert!(c.requires_synthesis());
        assert!((c.intensity() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn custom_order_changes_priority() {
        let config = ConflictConfig {
            order: vec![ConflictRule::ProtectiveState, ConflictRule::BothHigh],
            ..ConflictConfig::default()
        };
        let a = affective(AffectiveState::Alert, 0.9);
        let c = ConflictAssessor::new(config).assess(&a, &analytical(0.9));
        assert_eq!(c.conflict_type(), ConflictType::SafetyVsEfficiency);
    }

    #[test]
    fn empty_order_always_falls_through() {
        let config = ConflictConfig { order: Vec::new(), ..ConflictConfig::default() };
        let a = affective(AffectiveState::Alert, 0.9);
        let c = ConflictAssessor::new(config).assess(&a, &analytical(0.9));
        assert_eq!(c.conflict_type(), ConflictType::IntuitionVsData);
    }
}
