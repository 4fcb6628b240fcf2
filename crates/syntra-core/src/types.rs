//! Core types for Syntra
//!
//! Every score carried by these types lives in `[0, 1]`. Constructors clamp
//! instead of rejecting, so a noisy scorer can never poison a round.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Clamp a raw score into `[0, 1]`. NaN collapses to 0.0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Affective perspective
// ---------------------------------------------------------------------------

/// Dominant tone of the affective reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectiveState {
    #[default]
    Neutral,
    Concerned,
    Protective,
    Curious,
    Alert,
    Supportive,
    Inspired,
}

impl AffectiveState {
    pub fn label(self) -> &'static str {
        match self {
            AffectiveState::Neutral => "neutral",
            AffectiveState::Concerned => "concerned",
            AffectiveState::Protective => "protective",
            AffectiveState::Curious => "curious",
            AffectiveState::Alert => "alert",
            AffectiveState::Supportive => "supportive",
            AffectiveState::Inspired => "inspired",
        }
    }

    /// States that put safety ahead of everything else.
    pub fn is_protective(self) -> bool {
        matches!(self, AffectiveState::Protective | AffectiveState::Alert)
    }
}

impl fmt::Display for AffectiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the affective analyzer: values, tone, and qualitative concerns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AffectiveAssessment {
    primary_state: AffectiveState,
    moral_weight: f64,
    activated_concerns: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbolic_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moral_framework: Option<String>,
}

impl AffectiveAssessment {
    pub fn new(primary_state: AffectiveState, moral_weight: f64) -> Self {
        Self {
            primary_state,
            moral_weight: clamp_score(moral_weight),
            activated_concerns: BTreeSet::new(),
            symbolic_note: None,
            moral_framework: None,
        }
    }

    pub fn with_concerns<I, S>(mut self, concerns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activated_concerns
            .extend(concerns.into_iter().map(Into::into));
        self
    }

    pub fn with_symbolic_note(mut self, note: impl Into<String>) -> Self {
        self.symbolic_note = Some(note.into());
        self
    }

    pub fn with_moral_framework(mut self, framework: impl Into<String>) -> Self {
        self.moral_framework = Some(framework.into());
        self
    }

    pub fn with_moral_weight(mut self, moral_weight: f64) -> Self {
        self.moral_weight = clamp_score(moral_weight);
        self
    }

    pub fn primary_state(&self) -> AffectiveState {
        self.primary_state
    }

    pub fn moral_weight(&self) -> f64 {
        self.moral_weight
    }

    pub fn activated_concerns(&self) -> &BTreeSet<String> {
        &self.activated_concerns
    }

    pub fn symbolic_note(&self) -> Option<&str> {
        self.symbolic_note.as_deref()
    }

    pub fn moral_framework(&self) -> Option<&str> {
        self.moral_framework.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Analytical perspective
// ---------------------------------------------------------------------------

/// Reasoning framework that frames the analytical reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningFramework {
    Causal,
    Conditional,
    Systematic,
    Diagnostic,
    #[default]
    Analytical,
}

impl ReasoningFramework {
    pub fn label(self) -> &'static str {
        match self {
            ReasoningFramework::Causal => "causal",
            ReasoningFramework::Conditional => "conditional",
            ReasoningFramework::Systematic => "systematic",
            ReasoningFramework::Diagnostic => "diagnostic",
            ReasoningFramework::Analytical => "analytical",
        }
    }
}

impl fmt::Display for ReasoningFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Technical field the input is about, when one can be detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalDomain {
    Mechanical,
    Electrical,
    Hydraulic,
    Software,
    General,
}

impl TechnicalDomain {
    /// Specific domains in tie-break order. `General` is never keyword-matched.
    pub const SPECIFIC: [TechnicalDomain; 4] = [
        TechnicalDomain::Mechanical,
        TechnicalDomain::Electrical,
        TechnicalDomain::Hydraulic,
        TechnicalDomain::Software,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TechnicalDomain::Mechanical => "mechanical",
            TechnicalDomain::Electrical => "electrical",
            TechnicalDomain::Hydraulic => "hydraulic",
            TechnicalDomain::Software => "software",
            TechnicalDomain::General => "general",
        }
    }
}

impl fmt::Display for TechnicalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the analytical analyzer: framework, domain, and confidence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticalAssessment {
    primary_framework: ReasoningFramework,
    #[serde(skip_serializing_if = "Option::is_none")]
    technical_domain: Option<TechnicalDomain>,
    logical_confidence: f64,
    insights: Vec<String>,
}

impl AnalyticalAssessment {
    pub fn new(primary_framework: ReasoningFramework, logical_confidence: f64) -> Self {
        Self {
            primary_framework,
            technical_domain: None,
            logical_confidence: clamp_score(logical_confidence),
            insights: Vec::new(),
        }
    }

    pub fn with_logical_confidence(mut self, logical_confidence: f64) -> Self {
        self.logical_confidence = clamp_score(logical_confidence);
        self
    }

    pub fn with_domain(mut self, domain: Option<TechnicalDomain>) -> Self {
        self.technical_domain = domain;
        self
    }

    pub fn with_insights<I, S>(mut self, insights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insights.extend(insights.into_iter().map(Into::into));
        self
    }

    pub fn primary_framework(&self) -> ReasoningFramework {
        self.primary_framework
    }

    pub fn technical_domain(&self) -> Option<TechnicalDomain> {
        self.technical_domain
    }

    pub fn logical_confidence(&self) -> f64 {
        self.logical_confidence
    }

    pub fn insights(&self) -> &[String] {
        &self.insights
    }
}

// ---------------------------------------------------------------------------
// Conflict and resolution
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictLevel {
    Low,
    Moderate,
    High,
}

impl ConflictLevel {
    pub fn label(self) -> &'static str {
        match self {
            ConflictLevel::Low => "low",
            ConflictLevel::Moderate => "moderate",
            ConflictLevel::High => "high",
        }
    }
}

impl fmt::Display for ConflictLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of the disagreement between the two perspectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    ValueVsLogic,
    CreativeVsAnalytical,
    SafetyVsEfficiency,
    IntuitionVsData,
}

impl ConflictType {
    pub fn label(self) -> &'static str {
        match self {
            ConflictType::ValueVsLogic => "value vs logic",
            ConflictType::CreativeVsAnalytical => "creative vs analytical",
            ConflictType::SafetyVsEfficiency => "safety vs efficiency",
            ConflictType::IntuitionVsData => "intuition vs data",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConflictAssessment {
    level: ConflictLevel,
    #[serde(rename = "type")]
    conflict_type: ConflictType,
    intensity: f64,
    requires_synthesis: bool,
}

impl ConflictAssessment {
    /// Any disagreement above `Low` calls for explicit synthesis.
    pub fn new(level: ConflictLevel, conflict_type: ConflictType, intensity: f64) -> Self {
        Self {
            level,
            conflict_type,
            intensity: clamp_score(intensity),
            requires_synthesis: level != ConflictLevel::Low,
        }
    }

    pub fn level(&self) -> ConflictLevel {
        self.level
    }

    pub fn conflict_type(&self) -> ConflictType {
        self.conflict_type
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn requires_synthesis(&self) -> bool {
        self.requires_synthesis
    }
}

/// Which perspective leads the final decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPriority {
    ValueLed,
    SafetyLed,
    Balanced,
    ContextDependent,
}

impl ResolutionPriority {
    pub fn label(self) -> &'static str {
        match self {
            ResolutionPriority::ValueLed => "value-led",
            ResolutionPriority::SafetyLed => "safety-led",
            ResolutionPriority::Balanced => "balanced",
            ResolutionPriority::ContextDependent => "context-dependent",
        }
    }
}

impl fmt::Display for ResolutionPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    pub priority: ResolutionPriority,
    /// Affective share of the blended score when this policy applies.
    pub weight_adjustment: f64,
}

impl ResolutionPolicy {
    pub const DEFAULT: ResolutionPolicy = ResolutionPolicy {
        priority: ResolutionPriority::Balanced,
        weight_adjustment: 0.5,
    };

    pub const fn new(priority: ResolutionPriority, weight_adjustment: f64) -> Self {
        Self {
            priority,
            weight_adjustment,
        }
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Which mode of reasoning dominated a synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementState {
    Deliberative,
    ValueDriven,
    Analytical,
    Integrated,
}

impl EngagementState {
    pub fn label(self) -> &'static str {
        match self {
            EngagementState::Deliberative => "deliberative",
            EngagementState::ValueDriven => "value-driven",
            EngagementState::Analytical => "analytical",
            EngagementState::Integrated => "integrated",
        }
    }
}

impl fmt::Display for EngagementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal artifact of one dialogue round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SynthesisResult {
    pub decision_text: String,
    pub engagement_state: EngagementState,
    pub confidence: f64,
    pub priority: ResolutionPriority,
    pub conflict_type: ConflictType,
    pub weighted_score: f64,
}

// ---------------------------------------------------------------------------
// Weighting
// ---------------------------------------------------------------------------

/// Relative weight of the two perspectives. Always sums to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWeightPair")]
pub struct WeightPair {
    affective: f64,
    analytical: f64,
}

#[derive(Deserialize)]
struct RawWeightPair {
    #[serde(default = "default_affective")]
    affective: f64,
    #[serde(default = "default_analytical")]
    analytical: f64,
}

fn default_affective() -> f64 {
    WeightPair::DEFAULT.affective
}

fn default_analytical() -> f64 {
    WeightPair::DEFAULT.analytical
}

impl From<RawWeightPair> for WeightPair {
    fn from(raw: RawWeightPair) -> Self {
        WeightPair::new(raw.affective, raw.analytical)
    }
}

impl WeightPair {
    pub const DEFAULT: WeightPair = WeightPair {
        affective: 0.7,
        analytical: 0.3,
    };

    /// Clamp both sides into `[0, 1]` and renormalize. A pair that sums to
    /// zero falls back to the default.
    pub fn new(affective: f64, analytical: f64) -> Self {
        let a = clamp_score(affective);
        let l = clamp_score(analytical);
        let total = a + l;
        if total <= f64::EPSILON {
            return Self::DEFAULT;
        }
        Self {
            affective: a / total,
            analytical: l / total,
        }
    }

    pub fn affective(&self) -> f64 {
        self.affective
    }

    pub fn analytical(&self) -> f64 {
        self.analytical
    }

    /// Weighted blend of a moral weight and a logical confidence.
    pub fn blend(&self, moral_weight: f64, logical_confidence: f64) -> f64 {
        clamp_score(
            self.affective * clamp_score(moral_weight)
                + self.analytical * clamp_score(logical_confidence),
        )
    }
}

impl Default for WeightPair {
    fn default() -> Self {
        Self::DEFAULT
    }
}
