//! Analyzer input — raw text, hint segments, and optional partner context
//!
//! Hint convention: segments separated by `|`. The first segment is the main
//! text; later segments may carry a tag:
//!
//!   "the valve is leaking | moral: do no harm | metaphor: a dam about to break"
//!
//!   moral: / ethic:               → moral framework note
//!   creative: / metaphor: / symbol: → symbolic note
//!   insight:                      → explicit analytical insight
//!
//! Untagged segments are folded back into the main text.

use serde::Serialize;
use syntra_core::PartnerContext;

const MORAL_TAGS: &[&str] = &["moral:", "ethic:"];
const CREATIVE_TAGS: &[&str] = &["creative:", "metaphor:", "symbol:"];
const INSIGHT_TAGS: &[&str] = &["insight:"];

/// Text split into its main body and tagged hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segments {
    pub main: String,
    pub moral: Option<String>,
    pub creative: Option<String>,
    pub insights: Vec<String>,
}

impl Segments {
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split('|').map(str::trim);
        // The first segment is always the main text, even when empty or tagged.
        let mut segments = Segments {
            main: parts.next().unwrap_or_default().to_string(),
            ..Default::default()
        };

        for part in parts.filter(|s| !s.is_empty()) {
            match classify(part) {
                Hint::Moral(note) => {
                    segments.moral.get_or_insert(note);
                }
                Hint::Creative(note) => {
                    segments.creative.get_or_insert(note);
                }
                Hint::Insight(note) => segments.insights.push(note),
                Hint::Blank => {}
                Hint::Plain => {
                    if !segments.main.is_empty() {
                        segments.main.push(' ');
                    }
                    segments.main.push_str(part);
                }
            }
        }
        segments
    }
}

enum Hint {
    Moral(String),
    Creative(String),
    Insight(String),
    /// Tagged but empty.
    Blank,
    Plain,
}

fn classify(segment: &str) -> Hint {
    let tagged: [(&[&str], fn(String) -> Hint); 3] = [
        (MORAL_TAGS, Hint::Moral),
        (CREATIVE_TAGS, Hint::Creative),
        (INSIGHT_TAGS, Hint::Insight),
    ];
    for (tags, hint) in tagged {
        if let Some(note) = strip_tag(segment, tags) {
            return if note.is_empty() { Hint::Blank } else { hint(note.to_string()) };
        }
    }
    Hint::Plain
}

/// Case-insensitive tag prefix strip.
fn strip_tag<'a>(segment: &'a str, tags: &[&str]) -> Option<&'a str> {
    tags.iter().find_map(|tag| {
        let head = segment.get(..tag.len())?;
        head.eq_ignore_ascii_case(tag)
            .then(|| segment[tag.len()..].trim())
    })
}

/// What an analyzer sees: the original text, plus the partner's first-pass
/// assessment on the informed pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisInput {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<PartnerContext>,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), partner: None }
    }

    pub fn with_partner(text: impl Into<String>, partner: PartnerContext) -> Self {
        Self { text: text.into(), partner: Some(partner) }
    }
}
