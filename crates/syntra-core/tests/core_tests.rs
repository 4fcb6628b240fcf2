//! Tests for syntra-core: assessment types, round records, errors

use syntra_core::*;

// ===========================================================================
// Score clamping
// ===========================================================================

#[test]
fn affective_assessment_clamps_moral_weight() {
    assert_eq!(AffectiveAssessment::new(AffectiveState::Neutral, 1.7).moral_weight(), 1.0);
    assert_eq!(AffectiveAssessment::new(AffectiveState::Neutral, -0.2).moral_weight(), 0.0);
    assert_eq!(AffectiveAssessment::new(AffectiveState::Neutral, f64::NAN).moral_weight(), 0.0);
}

#[test]
fn analytical_assessment_clamps_confidence() {
    let a = AnalyticalAssessment::new(ReasoningFramework::Causal, 3.0);
    assert_eq!(a.logical_confidence(), 1.0);
    let b = AnalyticalAssessment::new(ReasoningFramework::Causal, -1.0);
    assert_eq!(b.logical_confidence(), 0.0);
}

#[test]
fn conflict_assessment_requires_synthesis_above_low() {
    let low = ConflictAssessment::new(ConflictLevel::Low, ConflictType::IntuitionVsData, 0.1);
    assert!(!low.requires_synthesis());
    let moderate = ConflictAssessment::new(ConflictLevel::Moderate, ConflictType::IntuitionVsData, 0.3);
    assert!(moderate.requires_synthesis());
    let clamped = ConflictAssessment::new(ConflictLevel::High, ConflictType::ValueVsLogic, 4.0);
    assert_eq!(clamped.intensity(), 1.0);
}

// ===========================================================================
// Serialization
// ===========================================================================

#[test]
fn affective_assessment_serializes_sorted_concerns() {
    let a = AffectiveAssessment::new(AffectiveState::Protective, 0.8)
        .with_concerns(["truth", "harm_prevention", "fairness"]);
    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["primary_state"], "protective");
    assert_eq!(
        json["activated_concerns"],
        serde_json::json!(["fairness", "harm_prevention", "truth"])
    );
    assert!(json.get("symbolic_note").is_none());
}

#[test]
fn conflict_assessment_serializes_type_field() {
    let c = ConflictAssessment::new(ConflictLevel::High, ConflictType::SafetyVsEfficiency, 0.6);
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["type"], "safety_vs_efficiency");
    assert_eq!(json["level"], "high");
    assert_eq!(json["requires_synthesis"], true);
}

#[test]
fn partner_context_is_tagged_by_perspective() {
    let ctx = PartnerContext::Analytical(AnalyticalAssessment::new(ReasoningFramework::Diagnostic, 0.5));
    let json = serde_json::to_value(&ctx).unwrap();
    assert_eq!(json["perspective"], "analytical");
    assert_eq!(json["primary_framework"], "diagnostic");
}

#[test]
fn weight_pair_deserializes_and_normalizes() {
    let w: WeightPair = serde_json::from_str(r#"{"affective": 3.0, "analytical": 1.0}"#).unwrap();
    assert!((w.affective() + w.analytical() - 1.0).abs() < 1e-12);
    let partial: WeightPair = serde_json::from_str(r#"{"analytical": 0.3}"#).unwrap();
    assert_eq!(partial, WeightPair::DEFAULT);
}

#[test]
fn weight_pair_blend_is_bounded() {
    let w = WeightPair::DEFAULT;
    assert!((w.blend(1.0, 0.0) - 0.7).abs() < 1e-12);
    assert_eq!(w.blend(5.0, 5.0), 1.0);
}

// ===========================================================================
// Stages and records
// ===========================================================================

#[test]
fn stage_order_and_names() {
    let names: Vec<&str> = Stage::ORDER.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "affective_initial",
            "analytical_initial",
            "affective_informed",
            "analytical_informed",
            "conflict",
            "synthesis",
        ]
    );
    assert_eq!(serde_json::to_string(&Stage::Conflict).unwrap(), r#""conflict""#);
}

#[test]
fn stage_record_carries_rfc3339_timestamp() {
    let id = uuid::Uuid::new_v4();
    let record = StageRecord::new(id, Stage::Synthesis, &serde_json::json!({ "ok": true }));
    let json = serde_json::to_value(&record).unwrap();
    let ts = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    assert_eq!(json["stage"], "synthesis");
    assert_eq!(json["payload"]["ok"], true);
}

#[test]
fn dialogue_round_detects_informed_change() {
    let affective = AffectiveAssessment::new(AffectiveState::Neutral, 0.3);
    let analytical = AnalyticalAssessment::new(ReasoningFramework::Analytical, 0.4);
    let same = DialogueRound {
        affective_initial: affective.clone(),
        analytical_initial: analytical.clone(),
        affective_informed: affective.clone(),
        analytical_informed: analytical.clone(),
    };
    assert!(!same.informed_changed());

    let changed = DialogueRound {
        affective_informed: AffectiveAssessment::new(AffectiveState::Neutral, 0.35),
        ..same
    };
    assert!(changed.informed_changed());
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn error_display() {
    assert_eq!(EngineError::EmptyInput.to_string(), "empty input: nothing to analyze");
    let e = EngineError::logger_unavailable("disk full");
    assert_eq!(e.to_string(), "stage logger unavailable: disk full");
    assert_eq!(e.user_message(), "could not process this input");
}
