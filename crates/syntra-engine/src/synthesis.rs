//! Synthesis engine — one decision out of two perspectives
//!
//! Decision text is composed per resolution priority. Engagement state and
//! confidence follow fixed rules:
//!
//!   level High            → Deliberative
//!   moral_weight > 0.8    → ValueDriven
//!   logical > 0.8         → Analytical
//!   otherwise             → Integrated
//!
//!   confidence = min(1, mean(moral, logical) · (1 − intensity))

use crate::config::{EngagementConfig, EngineConfig};
use syntra_core::{
    clamp_score, AffectiveAssessment, AnalyticalAssessment, ConflictAssessment, ConflictLevel,
    EngagementState, ResolutionPolicy, ResolutionPriority, SynthesisResult, WeightPair,
};
use tracing::debug;

pub const SAFETY_MARKER: &str = "[SAFETY]";

#[derive(Debug, Clone)]
pub struct SynthesisEngine {
    weights: WeightPair,
    engagement: EngagementConfig,
}

impl Default for SynthesisEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SynthesisEngine {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            weights: config.weights,
            engagement: config.engagement.clone(),
        }
    }

    /// Pure and total.
    pub fn synthesize(
        &self,
        affective: &AffectiveAssessment,
        analytical: &AnalyticalAssessment,
        conflict: &ConflictAssessment,
        policy: &ResolutionPolicy,
    ) -> SynthesisResult {
        let moral = clamp_score(affective.moral_weight());
        let logical = clamp_score(analytical.logical_confidence());
        let intensity = clamp_score(conflict.intensity());

        let decision_text = compose_decision(affective, analytical, policy.priority);
        let engagement_state = self.engagement_state(conflict.level(), moral, logical);
        let confidence = clamp_score(((moral + logical) / 2.0) * (1.0 - intensity)).min(1.0);

        // The configured pair governs agreement; a real conflict hands the
        // blend over to the policy.
        let blend = if conflict.level() == ConflictLevel::Low {
            self.weights
        } else {
            let share = clamp_score(policy.weight_adjustment);
            WeightPair::new(share, 1.0 - share)
        };
        let weighted_score = blend.blend(moral, logical);

        debug!(
            "Synthesis: priority={} engagement={} confidence={:.3}",
            policy.priority, engagement_state, confidence
        );

        SynthesisResult {
            decision_text,
            engagement_state,
            confidence,
            priority: policy.priority,
            conflict_type: conflict.conflict_type(),
            weighted_score,
        }
    }

    pub fn engagement_state(&self, level: ConflictLevel, moral: f64, logical: f64) -> EngagementState {
        if level == ConflictLevel::High {
            EngagementState::Deliberative
        } else if moral > self.engagement.value_driven_threshold {
            EngagementState::ValueDriven
        } else if logical > self.engagement.analytical_threshold {
            EngagementState::Analytical
        } else {
            EngagementState::Integrated
        }
    }
}

fn affective_phrase(affective: &AffectiveAssessment) -> String {
    format!("{} stance", affective.primary_state())
}

fn analytical_phrase(analytical: &AnalyticalAssessment) -> String {
    match analytical.technical_domain() {
        Some(domain) => format!("{} reasoning ({})", analytical.primary_framework(), domain),
        None => format!("{} reasoning", analytical.primary_framework()),
    }
}

fn compose_decision(
    affective: &AffectiveAssessment,
    analytical: &AnalyticalAssessment,
    priority: ResolutionPriority,
) -> String {
    let feeling = affective_phrase(affective);
    let reasoning = analytical_phrase(analytical);

    match priority {
        ResolutionPriority::ValueLed => {
            let mut text = format!("Value-led: {}", feeling);
            if let Some(framework) = affective.moral_framework() {
                text.push_str(&format!("; moral framework: {}", framework));
            }
            text.push_str(&format!(". Supporting context: {}.", reasoning));
            text
        }
        ResolutionPriority::SafetyLed => format!(
            "{} Safety first: {}. Proceed cautiously; {} should be confirmed before acting.",
            SAFETY_MARKER, feeling, reasoning
        ),
        ResolutionPriority::Balanced => balanced(&feeling, &reasoning),
        ResolutionPriority::ContextDependent => {
            let moral = affective.moral_weight();
            let logical = analytical.logical_confidence();
            if moral > logical {
                format!("Affective lead: {}, with {} as secondary input.", feeling, reasoning)
            } else if logical > moral {
                format!("Analytical lead: {}, with {} as secondary input.", reasoning, feeling)
            } else {
                balanced(&feeling, &reasoning)
            }
        }
    }
}

fn balanced(feeling: &str, reasoning: &str) -> String {
    format!("Balanced: {}, weighed together with {}.", feeling, reasoning)
}
