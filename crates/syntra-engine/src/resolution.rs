//! Resolution table — conflict type → synthesis priority
//!
//! A fixed lookup built once at startup and never mutated.

use syntra_core::{ConflictType, ResolutionPolicy, ResolutionPriority};

const STANDARD_ENTRIES: [(ConflictType, ResolutionPolicy); 4] = [
    (
        ConflictType::ValueVsLogic,
        ResolutionPolicy::new(ResolutionPriority::ValueLed, 0.7),
    ),
    (
        ConflictType::CreativeVsAnalytical,
        ResolutionPolicy::new(ResolutionPriority::Balanced, 0.5),
    ),
    (
        ConflictType::SafetyVsEfficiency,
        ResolutionPolicy::new(ResolutionPriority::SafetyLed, 0.8),
    ),
    (
        ConflictType::IntuitionVsData,
        ResolutionPolicy::new(ResolutionPriority::ContextDependent, 0.6),
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionTable {
    entries: Vec<(ConflictType, ResolutionPolicy)>,
}

impl Default for ResolutionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ResolutionTable {
    pub fn standard() -> Self {
        Self { entries: STANDARD_ENTRIES.to_vec() }
    }

    /// Build from explicit entries. Types left out resolve to the default policy.
    pub fn from_entries(entries: impl IntoIterator<Item = (ConflictType, ResolutionPolicy)>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    /// Pure lookup; unmapped types get `{Balanced, 0.5}`.
    pub fn select(&self, conflict_type: ConflictType) -> ResolutionPolicy {
        lookup(&self.entries, conflict_type)
    }

    pub fn entries(&self) -> &[(ConflictType, ResolutionPolicy)] {
        &self.entries
    }
}

/// Lookup against the standard table.
pub fn select(conflict_type: ConflictType) -> ResolutionPolicy {
    lookup(&STANDARD_ENTRIES, conflict_type)
}

fn lookup(entries: &[(ConflictType, ResolutionPolicy)], conflict_type: ConflictType) -> ResolutionPolicy {
    entries
        .iter()
        .find(|(t, _)| *t == conflict_type)
        .map(|(_, policy)| *policy)
        .unwrap_or(ResolutionPolicy::DEFAULT)
}
