//! Tests for the syntra binary's rendering: full rounds through text and JSON output

use std::sync::Arc;

use syntra::render::*;
use syntra_core::EngineError;
use syntra_engine::{DialogueCoordinator, MemoryStageLog};

const INPUT: &str = "The pump pressure keeps rising because the relief valve sticks | moral: nobody gets hurt";

// ===========================================================================
// Text output
// ===========================================================================

#[test]
fn text_output_has_all_sections_by_default() {
    let outcome = DialogueCoordinator::default().run_round(INPUT).unwrap();
    let text = render_outcome(&outcome, None, &RenderOptions::default());
    assert!(text.contains("─── Affective ───"));
    assert!(text.contains("moral framework: nobody gets hurt"));
    assert!(text.contains("─── Analytical ───"));
    assert!(text.contains("domain: hydraulic"));
    assert!(text.contains("─── Synthesis ───"));
    assert!(text.contains(&outcome.result.decision_text));
    assert!(!text.contains("─── Draft ───"));
}

#[test]
fn sections_can_be_hidden() {
    let outcome = DialogueCoordinator::default().run_round(INPUT).unwrap();
    let opts = RenderOptions { show_affective: false, show_analytical: false, show_synthesis: true };
    let text = render_outcome(&outcome, Some("Release the valve slowly."), &opts);
    assert!(!text.contains("─── Affective"));
    assert!(!text.contains("Analytical ───"));
    assert!(text.contains("─── Synthesis ───"));
    assert!(text.ends_with("─── Draft ───\nRelease the valve slowly.\n"));
}

#[test]
fn render_options_follow_output_config() {
    let mut config = syntra_engine::EngineConfig::default();
    config.output.show_analytical = false;
    let opts = RenderOptions::from(&config.output);
    assert!(opts.show_affective);
    assert!(!opts.show_analytical);
}

// ===========================================================================
// JSON and trace output
// ===========================================================================

#[test]
fn json_output_is_one_parseable_line() {
    let outcome = DialogueCoordinator::default().run_round(INPUT).unwrap();
    let line = render_json(&outcome, Some("prose"));
    assert!(!line.contains('\n'));

    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["round_id"], outcome.round_id.to_string());
    assert_eq!(value["result"]["decision_text"], outcome.result.decision_text.as_str());
    assert_eq!(value["conflict"]["type"], serde_json::to_value(outcome.conflict.conflict_type()).unwrap());
    assert_eq!(value["draft"], "prose");
    assert!(value.get("log_error").is_none());
}

#[test]
fn trace_lists_stages_in_order() {
    let memory = Arc::new(MemoryStageLog::new());
    let coordinator = DialogueCoordinator::default().with_sink(memory.clone());
    coordinator.run_round(INPUT).unwrap();
    let trace = render_trace(&memory.take());

    let positions: Vec<usize> = [
        "affective_initial:",
        "analytical_initial:",
        "affective_informed:",
        "analytical_informed:",
        "conflict:",
        "synthesis:",
    ]
    .iter()
    .map(|stage| trace.find(stage).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn errors_render_generic_message() {
    assert_eq!(render_error(&EngineError::EmptyInput), "could not process this input");
    assert_eq!(
        render_error(&EngineError::logger_unavailable("disk full")),
        "could not process this input"
    );
}
