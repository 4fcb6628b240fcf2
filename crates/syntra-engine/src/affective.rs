//! Affective analyzer — values, tone, and qualitative concerns
//!
//! First pass: classify the dominant state from the main text, lift it with
//! any moral or symbolic hint, then score the whole text against the values
//! lexicon. Second pass: when the analytical partner disagrees by more than
//! the agreement threshold, move part of the way toward it and record the
//! cross-check. Never fails; empty text reads as neutral at the base weight.

use crate::config::EngineConfig;
use crate::input::{AnalysisInput, Segments};
use crate::lexicon::Lexicon;
use syntra_core::{
    clamp_score, AffectiveAssessment, AffectiveState, AnalyticalAssessment, PartnerContext,
    TechnicalDomain,
};
use tracing::debug;

/// Checked in order; first hit wins.
const STATE_KEYWORDS: &[(AffectiveState, &[&str])] = &[
    (AffectiveState::Alert, &["danger", "emergency", "urgent", "warning", "immediately"]),
    (AffectiveState::Protective, &["protect", "keep safe", "shield", "guard", "defend", "vulnerable"]),
    (AffectiveState::Concerned, &["worried", "worry", "concern", "afraid", "anxious", "risk", "problem"]),
    (AffectiveState::Supportive, &["help", "support", "thank", "comfort", "encourag"]),
    (AffectiveState::Curious, &["wonder", "curious", "what if", "why", "how does", "?"]),
];

const METAPHOR_MARKERS: &[&str] = &["like a ", "as if", "as though", "metaphor", "symbol"];

/// Concern recorded when the informed pass had to reconcile with the partner.
pub const CROSS_CHECK_CONCERN: &str = "cross_check";
/// Concern recorded when the partner placed the input in a physical domain.
pub const PHYSICAL_RISK_CONCERN: &str = "physical_risk";

#[derive(Debug, Clone)]
pub struct AffectiveAnalyzer {
    lexicon: Lexicon,
    pull: f64,
    agreement_threshold: f64,
}

impl Default for AffectiveAnalyzer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl AffectiveAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Self {
        let pull = 2.0 * config.dialogue.cross_influence * config.weights.analytical();
        Self {
            lexicon: Lexicon::values(),
            pull: clamp_score(pull),
            agreement_threshold: config.dialogue.agreement_threshold,
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// First-pass analysis of bare text.
    pub fn analyze_text(&self, text: &str) -> AffectiveAssessment {
        let segments = Segments::parse(text);

        let mut state = classify_state(&segments.main);
        if state == AffectiveState::Neutral && segments.moral.is_some() {
            state = AffectiveState::Concerned;
        }

        let symbolic_note = segments
            .creative
            .clone()
            .or_else(|| detect_metaphor(&segments.main));
        if state == AffectiveState::Neutral && symbolic_note.is_some() {
            state = AffectiveState::Inspired;
        }

        let matched = self.lexicon.matches(text);
        let moral_weight = crate::lexicon::score_matches(self.lexicon.base(), &matched);

        let mut assessment = AffectiveAssessment::new(state, moral_weight)
            .with_concerns(matched.iter().map(|m| m.category()));
        if let Some(note) = symbolic_note {
            assessment = assessment.with_symbolic_note(note);
        }
        if let Some(framework) = segments.moral {
            assessment = assessment.with_moral_framework(framework);
        }

        debug!(
            "Affective: state={} moral_weight={:.3} concerns={}",
            assessment.primary_state(),
            assessment.moral_weight(),
            assessment.activated_concerns().len()
        );
        assessment
    }

    /// Analyze an input; folds in the analytical partner when present.
    pub fn analyze(&self, input: &AnalysisInput) -> AffectiveAssessment {
        let own = self.analyze_text(&input.text);
        match &input.partner {
            Some(PartnerContext::Analytical(partner)) => self.inform(own, partner),
            _ => own,
        }
    }

    fn inform(&self, own: AffectiveAssessment, partner: &AnalyticalAssessment) -> AffectiveAssessment {
        let gap = partner.logical_confidence() - own.moral_weight();
        if gap.abs() <= self.agreement_threshold {
            return own;
        }

        let moved = own.moral_weight() + gap * self.pull;
        let physical = matches!(
            partner.technical_domain(),
            Some(TechnicalDomain::Mechanical | TechnicalDomain::Electrical | TechnicalDomain::Hydraulic)
        );

        debug!(
            "Affective informed: gap={:.3} moral_weight {:.3} -> {:.3}",
            gap,
            own.moral_weight(),
            moved
        );

        let mut concerns = vec![CROSS_CHECK_CONCERN];
        if physical {
            concerns.push(PHYSICAL_RISK_CONCERN);
        }
        own.with_moral_weight(moved).with_concerns(concerns)
    }
}

fn classify_state(main: &str) -> AffectiveState {
    let lowered = main.to_lowercase();
    STATE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(state, _)| *state)
        .unwrap_or_default()
}

fn detect_metaphor(main: &str) -> Option<String> {
    let lowered = main.to_lowercase();
    METAPHOR_MARKERS
        .iter()
        .find(|m| lowered.contains(*m))
        .map(|m| format!("figurative language ({})", m.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntra_core::ReasoningFramework;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_text_is_neutral_at_base() {
        let a = AffectiveAnalyzer::default().analyze_text("");
        assert_eq!(a.primary_state(), AffectiveState::Neutral);
        assert!(approx(a.moral_weight(), 0.3));
        assert!(a.activated_concerns().is_empty());
        assert!(a.symbolic_note().is_none());
    }

    #[test]
    fn state_priority_alert_over_protective() {
        let a = AffectiveAnalyzer::default().analyze_text("Danger: protect the children");
        assert_eq!(a.primary_state(), AffectiveState::Alert);
    }

    #[test]
    fn protective_state_from_keywords() {
        let a = AffectiveAnalyzer::default().analyze_text("We must shield the residents");
        assert_eq!(a.primary_state(), AffectiveState::Protective);
    }

    #[test]
    fn moral_segment_lifts_neutral_to_concerned() {
        let a = AffectiveAnalyzer::default().analyze_text("ship the release | moral: be honest with users");
        assert_eq!(a.primary_state(), AffectiveState::Concerned);
        assert_eq!(a.moral_framework(), Some("be honest with users"));
        assert!(a.activated_concerns().contains("truth"));
    }

    #[test]
    fn moral_hint_after_leading_delimiter_lifts_state() {
        let a = AffectiveAnalyzer::default().analyze_text("| moral: be fair to all");
        assert_eq!(a.primary_state(), AffectiveState::Concerned);
        assert_eq!(a.moral_framework(), Some("be fair to all"));
    }

    #[test]
    fn creative_segment_sets_symbolic_note() {
        let a = AffectiveAnalyzer::default().analyze_text("the plan | metaphor: a bridge over fog");
        assert_eq!(a.symbolic_note(), Some("a bridge over fog"));
        assert_eq!(a.primary_state(), AffectiveState::Inspired);
    }

    #[test]
    fn metaphor_marker_in_text_sets_symbolic_note() {
        let a = AffectiveAnalyzer::default().analyze_text("The market moves like a tide");
        assert_eq!(a.symbolic_note(), Some("figurative language (like a)"));
    }

    #[test]
    fn concerns_track_value_categories() {
        let a = AffectiveAnalyzer::default().analyze_text("Respect consent and avoid harm");
        let concerns: Vec<&str> = a.activated_concerns().iter().map(String::as_str).collect();
        assert_eq!(concerns, vec!["autonomy", "harm_prevention"]);
        assert!(approx(a.moral_weight(), 0.7));
    }

    #[test]
    fn crafted_lexicon_drives_weight() {
        let lex = Lexicon::from_rows(0.3, &[("sacred", 0.6, "truth")]);
        let a = AffectiveAnalyzer::default().with_lexicon(lex).analyze_text("a sacred promise");
        assert!(approx(a.moral_weight(), 0.9));
    }

    #[test]
    fn informed_pass_unchanged_when_partners_agree() {
        let analyzer = AffectiveAnalyzer::default();
        let initial = analyzer.analyze_text("a quiet afternoon");
        let partner = AnalyticalAssessment::new(ReasoningFramework::Analytical, 0.4);
        let informed = analyzer.analyze(&AnalysisInput::with_partner(
            "a quiet afternoon",
            PartnerContext::Analytical(partner),
        ));
        assert_eq!(initial, informed);
    }

    #[test]
    fn informed_pass_moves_toward_disagreeing_partner() {
        let analyzer = AffectiveAnalyzer::default();
        let text = "avoid harm, injury and deception; respect consent";
        let initial = analyzer.analyze_text(text);
        let partner = AnalyticalAssessment::new(ReasoningFramework::Diagnostic, 0.1)
            .with_domain(Some(TechnicalDomain::Hydraulic));
        let informed = analyzer.analyze(&AnalysisInput::with_partner(
            text,
            PartnerContext::Analytical(partner),
        ));
        assert!(informed.moral_weight() < initial.moral_weight());
        assert!(informed.moral_weight() > 0.1);
        assert!(informed.activated_concerns().contains(CROSS_CHECK_CONCERN));
        assert!(informed.activated_concerns().contains(PHYSICAL_RISK_CONCERN));
        assert_eq!(informed.primary_state(), initial.primary_state());
    }

    #[test]
    fn affective_partner_is_ignored() {
        let analyzer = AffectiveAnalyzer::default();
        let initial = analyzer.analyze_text("hello");
        let informed = analyzer.analyze(&AnalysisInput::with_partner(
            "hello",
            PartnerContext::Affective(AffectiveAssessment::new(AffectiveState::Alert, 1.0)),
        ));
        assert_eq!(initial, informed);
    }
}
