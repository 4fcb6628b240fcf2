//! Marker scorer — lexicon-driven heuristic scoring
//!
//! A lexicon is a base value plus a fixed set of marker substrings, each
//! worth some points. Matching is case-insensitive and substring-based
//! (not tokenized): "harm" matches inside "harmful". Each marker counts at
//! most once per text.

use serde::Serialize;
use syntra_core::clamp_score;

/// One marker substring and its contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pattern: String,
    weight: f64,
    category: &'static str,
}

impl Marker {
    pub fn new(pattern: &str, weight: f64, category: &'static str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            weight,
            category,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn category(&self) -> &'static str {
        self.category
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lexicon {
    base: f64,
    markers: Vec<Marker>,
}

impl Lexicon {
    pub fn new(base: f64, markers: Vec<Marker>) -> Self {
        Self { base, markers }
    }

    /// Build from `(pattern, weight, category)` rows.
    pub fn from_rows(base: f64, rows: &[(&str, f64, &'static str)]) -> Self {
        Self::new(
            base,
            rows.iter()
                .map(|(pattern, weight, category)| Marker::new(pattern, *weight, category))
                .collect(),
        )
    }

    /// Values lexicon for the affective perspective. Base 0.3.
    pub fn values() -> Self {
        Self::from_rows(0.3, VALUES_MARKERS)
    }

    /// Rigor lexicon for the analytical perspective. Base 0.4.
    pub fn rigor() -> Self {
        Self::from_rows(0.4, RIGOR_MARKERS)
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Markers present in `text`, in lexicon order.
    pub fn matches(&self, text: &str) -> Vec<&Marker> {
        let lowered = text.to_lowercase();
        self.markers
            .iter()
            .filter(|m| !m.pattern.is_empty() && lowered.contains(m.pattern.as_str()))
            .collect()
    }

    /// Base plus the sum of matched marker weights, clamped to [0, 1].
    pub fn score(&self, text: &str) -> f64 {
        score_matches(self.base, &self.matches(text))
    }
}

/// Score an already-computed match set.
pub fn score_matches(base: f64, matched: &[&Marker]) -> f64 {
    let total: f64 = matched.iter().map(|m| m.weight).sum();
    clamp_score(base + total)
}

/// `score(text, lexicon)` as a free function.
pub fn score(text: &str, lexicon: &Lexicon) -> f64 {
    lexicon.score(text)
}

pub const HARM_PREVENTION: &str = "harm_prevention";
pub const FAIRNESS: &str = "fairness";
pub const AUTONOMY: &str = "autonomy";
pub const TRUTH: &str = "truth";

pub const HIGH_RIGOR: &str = "high_rigor";
pub const ADVANCED_REASONING: &str = "advanced_reasoning";
pub const TECHNICAL: &str = "technical";
pub const SYSTEMATIC: &str = "systematic";
pub const UNCERTAINTY: &str = "uncertainty";

const VALUES_MARKERS: &[(&str, f64, &str)] = &[
    ("harm", 0.2, HARM_PREVENTION),
    ("injur", 0.2, HARM_PREVENTION),
    ("hurt", 0.15, HARM_PREVENTION),
    ("safety", 0.15, HARM_PREVENTION),
    ("danger", 0.15, HARM_PREVENTION),
    ("protect", 0.1, HARM_PREVENTION),
    ("justice", 0.2, FAIRNESS),
    ("discriminat", 0.2, FAIRNESS),
    ("fair", 0.15, FAIRNESS),
    ("rights", 0.15, FAIRNESS),
    ("equal", 0.1, FAIRNESS),
    ("consent", 0.2, AUTONOMY),
    ("autonomy", 0.2, AUTONOMY),
    ("freedom", 0.15, AUTONOMY),
    ("privacy", 0.15, AUTONOMY),
    ("choice", 0.1, AUTONOMY),
    ("deceiv", 0.2, TRUTH),
    ("mislead", 0.2, TRUTH),
    ("honest", 0.15, TRUTH),
    ("truth", 0.15, TRUTH),
    ("transparen", 0.1, TRUTH),
];

const RIGOR_MARKERS: &[(&str, f64, &str)] = &[
    ("evidence", 0.15, HIGH_RIGOR),
    ("proof", 0.15, HIGH_RIGOR),
    ("measured", 0.1, HIGH_RIGOR),
    ("data", 0.1, HIGH_RIGOR),
    ("verified", 0.1, HIGH_RIGOR),
    ("calibrat", 0.1, HIGH_RIGOR),
    ("hypothes", 0.15, ADVANCED_REASONING),
    ("therefore", 0.1, ADVANCED_REASONING),
    ("because", 0.1, ADVANCED_REASONING),
    ("implies", 0.1, ADVANCED_REASONING),
    ("tradeoff", 0.1, ADVANCED_REASONING),
    ("pressure", 0.1, TECHNICAL),
    ("voltage", 0.1, TECHNICAL),
    ("torque", 0.1, TECHNICAL),
    ("algorithm", 0.1, TECHNICAL),
    ("tolerance", 0.1, TECHNICAL),
    ("specification", 0.1, TECHNICAL),
    ("systematic", 0.15, SYSTEMATIC),
    ("procedure", 0.1, SYSTEMATIC),
    ("checklist", 0.1, SYSTEMATIC),
    ("diagnos", 0.1, SYSTEMATIC),
    ("step", 0.05, SYSTEMATIC),
    ("guess", -0.15, UNCERTAINTY),
    ("maybe", -0.1, UNCERTAINTY),
    ("not sure", -0.1, UNCERTAINTY),
    ("probably", -0.05, UNCERTAINTY),
    ("i feel", -0.05, UNCERTAINTY),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn no_markers_yields_base() {
        assert!(approx(Lexicon::values().score("the weather is mild"), 0.3));
        assert!(approx(Lexicon::rigor().score("the weather is mild"), 0.4));
        assert!(approx(Lexicon::values().score(""), 0.3));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let lex = Lexicon::values();
        assert!(approx(lex.score("This is HARMFUL"), 0.5));
        assert!(approx(lex.score("unfairness"), 0.45));
    }

    #[test]
    fn each_marker_counts_once() {
        let lex = Lexicon::values();
        assert!(approx(lex.score("harm harm harm"), 0.5));
    }

    #[test]
    fn score_clamps_to_unit_interval() {
        let lex = Lexicon::values();
        let loaded = "harm injury hurt safety danger protect justice discrimination";
        assert_eq!(lex.score(loaded), 1.0);
        let hedged = Lexicon::rigor().score("i guess maybe, not sure, probably, i feel");
        assert_eq!(hedged, 0.0);
    }

    #[test]
    fn markers_are_lowercased_at_construction() {
        let lex = Lexicon::from_rows(0.0, &[("DANGER", 0.5, "x")]);
        assert_eq!(lex.markers()[0].pattern(), "danger");
        assert!(approx(lex.score("danger ahead"), 0.5));
    }

    #[test]
    fn empty_pattern_never_matches() {
        let lex = Lexicon::from_rows(0.1, &[("", 0.9, "x")]);
        assert!(approx(lex.score("anything"), 0.1));
    }

    #[test]
    fn deterministic() {
        let lex = Lexicon::rigor();
        let text = "Measured data therefore implies a pressure fault";
        assert_eq!(lex.score(text), lex.score(text));
        assert_eq!(score(text, &lex), lex.score(text));
    }
}
