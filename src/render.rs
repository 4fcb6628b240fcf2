//! Terminal rendering for dialogue rounds
//!
//! Text output is one block per round with up to three sections. JSON output
//! is one compact object per round so stdin batches stay line-oriented.

use syntra_core::{AffectiveAssessment, AnalyticalAssessment, EngineError, StageRecord};
use syntra_engine::config::OutputConfig;
use syntra_engine::DialogueOutcome;

const MAX_INSIGHTS: usize = 5;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub show_affective: bool,
    pub show_analytical: bool,
    pub show_synthesis: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_affective: true, show_analytical: true, show_synthesis: true }
    }
}

impl From<&OutputConfig> for RenderOptions {
    fn from(output: &OutputConfig) -> Self {
        Self {
            show_affective: output.show_affective,
            show_analytical: output.show_analytical,
            show_synthesis: output.show_synthesis,
        }
    }
}

pub fn render_outcome(outcome: &DialogueOutcome, draft: Option<&str>, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let round = &outcome.round;

    if opts.show_affective {
        render_affective(&mut out, &round.affective_initial, &round.affective_informed);
    }
    if opts.show_analytical {
        render_analytical(&mut out, &round.analytical_initial, &round.analytical_informed);
    }
    if opts.show_synthesis {
        let c = &outcome.conflict;
        let r = &outcome.result;
        out.push_str("─── Synthesis ───\n");
        out.push_str(&format!(
            "conflict: {} ({}), intensity {:.2}\n",
            c.level(),
            c.conflict_type(),
            c.intensity()
        ));
        out.push_str(&format!(
            "priority: {}  engagement: {}  confidence: {:.2}  weighted: {:.2}\n",
            r.priority, r.engagement_state, r.confidence, r.weighted_score
        ));
        out.push_str(&r.decision_text);
        out.push('\n');
    }
    if let Some(draft) = draft {
        out.push_str("─── Draft ───\n");
        out.push_str(draft);
        out.push('\n');
    }
    out
}

fn score(initial: f64, informed: f64) -> String {
    if initial == informed {
        format!("{:.2}", informed)
    } else {
        format!("{:.2} (initial {:.2})", informed, initial)
    }
}

fn render_affective(out: &mut String, initial: &AffectiveAssessment, informed: &AffectiveAssessment) {
    out.push_str("─── Affective ───\n");
    out.push_str(&format!(
        "state: {}  moral weight: {}\n",
        informed.primary_state(),
        score(initial.moral_weight(), informed.moral_weight())
    ));
    if !informed.activated_concerns().is_empty() {
        let concerns: Vec<&str> = informed.activated_concerns().iter().map(String::as_str).collect();
        out.push_str(&format!("concerns: {}\n", concerns.join(", ")));
    }
    if let Some(framework) = informed.moral_framework() {
        out.push_str(&format!("moral framework: {}\n", framework));
    }
    if let Some(note) = informed.symbolic_note() {
        out.push_str(&format!("symbolic: {}\n", note));
    }
}

fn render_analytical(out: &mut String, initial: &AnalyticalAssessment, informed: &AnalyticalAssessment) {
    out.push_str("─── Analytical ───\n");
    let domain = informed
        .technical_domain()
        .map(|d| d.label())
        .unwrap_or("none");
    out.push_str(&format!(
        "framework: {}  domain: {}  confidence: {}\n",
        informed.primary_framework(),
        domain,
        score(initial.logical_confidence(), informed.logical_confidence())
    ));
    let insights = informed.insights();
    for insight in insights.iter().take(MAX_INSIGHTS) {
        out.push_str(&format!("  • {}\n", insight));
    }
    if insights.len() > MAX_INSIGHTS {
        out.push_str(&format!("  ... ({} more)\n", insights.len() - MAX_INSIGHTS));
    }
}

/// One compact JSON object: the whole outcome, plus the draft when present.
pub fn render_json(outcome: &DialogueOutcome, draft: Option<&str>) -> String {
    let mut value = match serde_json::to_value(outcome) {
        Ok(v) => v,
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    };
    if let (Some(draft), Some(map)) = (draft, value.as_object_mut()) {
        map.insert("draft".into(), serde_json::Value::String(draft.to_string()));
    }
    value.to_string()
}

pub fn render_trace(records: &[StageRecord]) -> String {
    let mut out = String::from("─── Trace ───\n");
    for record in records {
        out.push_str(&format!(
            "[{}] {}: {}\n",
            record.timestamp.format("%H:%M:%S%.3f"),
            record.stage,
            record.payload
        ));
    }
    out
}

/// Caller-facing text for an engine error. Internals stay in the log.
pub fn render_error(error: &EngineError) -> String {
    error.user_message().to_string()
}
