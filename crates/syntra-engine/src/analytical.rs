//! Analytical analyzer — reasoning framework, technical domain, confidence
//!
//! Insights are the explicit `insight:` hints followed by the sentences of
//! the main text. The first insight decides the framework; domain keywords
//! decide the technical domain; the rigor lexicon decides confidence.

use crate::config::EngineConfig;
use crate::input::{AnalysisInput, Segments};
use crate::lexicon::{self, Lexicon};
use syntra_core::{
    clamp_score, AffectiveAssessment, AnalyticalAssessment, PartnerContext, ReasoningFramework,
    TechnicalDomain,
};
use tracing::debug;

/// Checked in order against the first insight; no hit → `Analytical`.
const FRAMEWORK_KEYWORDS: &[(ReasoningFramework, &[&str])] = &[
    (
        ReasoningFramework::Diagnostic,
        &["diagnos", "fault", "symptom", "broken", "fail", "error", "leak", "malfunction"],
    ),
    (
        ReasoningFramework::Causal,
        &["because", "cause", "due to", "leads to", "result", "therefore"],
    ),
    (
        ReasoningFramework::Conditional,
        &["if ", "unless", "when ", "would", "otherwise"],
    ),
    (
        ReasoningFramework::Systematic,
        &["step", "procedure", "process", "checklist", "first", "sequence"],
    ),
];

fn domain_keywords(domain: TechnicalDomain) -> &'static [&'static str] {
    match domain {
        TechnicalDomain::Mechanical => &["engine", "gear", "bearing", "torque", "brake", "shaft", "belt", "motor"],
        TechnicalDomain::Electrical => &["voltage", "circuit", "wiring", "wire", "battery", "fuse", "breaker", "current draw"],
        TechnicalDomain::Hydraulic => &["hydraulic", "pressure", "fluid", "valve", "leak", "pump", "pipe"],
        TechnicalDomain::Software => &["software", "code", "bug", "compile", "server", "database", "deploy"],
        TechnicalDomain::General => &[],
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticalAnalyzer {
    lexicon: Lexicon,
    pull: f64,
    agreement_threshold: f64,
}

impl Default for AnalyticalAnalyzer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl AnalyticalAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Self {
        let pull = 2.0 * config.dialogue.cross_influence * config.weights.affective();
        Self {
            lexicon: Lexicon::rigor(),
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
    pub fn analyze_text(&self, text: &str) -> AnalyticalAssessment {
        let segments = Segments::parse(text);
        let insights = collect_insights(&segments);

        let framework = insights
            .first()
            .map(|first| classify_framework(first))
            .unwrap_or_default();

        let scored = scoring_text(&segments);
        let matched = self.lexicon.matches(&scored);
        let logical_confidence = lexicon::score_matches(self.lexicon.base(), &matched);

        let domain = detect_domain(&scored).or_else(|| {
            matched
                .iter()
                .any(|m| m.category() == lexicon::TECHNICAL)
                .then_some(TechnicalDomain::General)
        });

        debug!(
            "Analytical: framework={} domain={:?} confidence={:.3} insights={}",
            framework,
            domain,
            logical_confidence,
            insights.len()
        );

        AnalyticalAssessment::new(framework, logical_confidence)
            .with_domain(domain)
            .with_insights(insights)
    }

    /// Analyze an input; folds in the affective partner when present.
    pub fn analyze(&self, input: &AnalysisInput) -> AnalyticalAssessment {
        let own = self.analyze_text(&input.text);
        match &input.partner {
            Some(PartnerContext::Affective(partner)) => self.inform(own, partner),
            _ => own,
        }
    }

    fn inform(&self, own: AnalyticalAssessment, partner: &AffectiveAssessment) -> AnalyticalAssessment {
        let gap = partner.moral_weight() - own.logical_confidence();
        if gap.abs() <= self.agreement_threshold {
            return own;
        }

        let moved = own.logical_confidence() + gap * self.pull;
        debug!(
            "Analytical informed: gap={:.3} confidence {:.3} -> {:.3}",
            gap,
            own.logical_confidence(),
            moved
        );

        let note = format!(
            "cross-check: affective perspective reads this as {} (moral weight {:.2})",
            partner.primary_state(),
            partner.moral_weight()
        );
        own.with_logical_confidence(moved).with_insights([note])
    }
}

fn collect_insights(segments: &Segments) -> Vec<String> {
    let sentences = segments
        .main
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);
    segments.insights.iter().cloned().chain(sentences).collect()
}

/// Main text plus explicit insights; sentence insights are already in main.
fn scoring_text(segments: &Segments) -> String {
    std::iter::once(segments.main.as_str())
        .chain(segments.insights.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn classify_framework(insight: &str) -> ReasoningFramework {
    let lowered = insight.to_lowercase();
    FRAMEWORK_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(framework, _)| *framework)
        .unwrap_or_default()
}

/// Domain with the most keyword hits; ties go to declaration order.
fn detect_domain(text: &str) -> Option<TechnicalDomain> {
    let lowered = text.to_lowercase();
    let mut best: Option<(TechnicalDomain, usize)> = None;
    for domain in TechnicalDomain::SPECIFIC {
        let hits = domain_keywords(domain)
            .iter()
            .filter(|k| lowered.contains(*k))
            .count();
        if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
            best = Some((domain, hits));
        }
    }
    best.map(|(domain, _)| domain)
}
