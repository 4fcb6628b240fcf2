//! Engine configuration
//!
//! All tunable parameters in one place. Loaded from TOML at startup,
//! falls back to defaults if no config file exists. Immutable once the
//! engine is built.

use crate::conflict::ConflictRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use syntra_core::WeightPair;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default weighting of the two perspectives.
    pub weights: WeightPair,
    /// Conflict classification thresholds and rule order.
    pub conflict: ConflictConfig,
    /// Engagement-state thresholds.
    pub engagement: EngagementConfig,
    /// Two-pass dialogue parameters.
    pub dialogue: DialogueConfig,
    /// What the CLI prints per round.
    pub output: OutputConfig,
    /// Stage log destination.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictConfig {
    /// Intensity at or above which disagreement is `Moderate`.
    pub moderate_threshold: f64,
    /// Intensity at or above which disagreement is `High`.
    pub high_threshold: f64,
    /// Both scores strictly above this → value vs logic.
    pub dual_high_threshold: f64,
    /// Logical confidence strictly above this counts as a confident framework.
    pub framework_confidence_threshold: f64,
    /// Order in which conflict-type rules are tried. Unmatched → intuition vs data.
    pub order: Vec<ConflictRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// Moral weight strictly above this → value-driven.
    pub value_driven_threshold: f64,
    /// Logical confidence strictly above this → analytical.
    pub analytical_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Run the cross-informed second pass. When off, informed == initial.
    pub two_pass: bool,
    /// How far an analyzer moves toward its partner's score on the second pass.
    pub cross_influence: f64,
    /// Score gap at or below which the partners are considered in agreement.
    pub agreement_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub show_affective: bool,
    pub show_analytical: bool,
    pub show_synthesis: bool,
    /// Dump every stage record after the round.
    pub trace: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only JSONL stage log. None disables stage logging.
    pub stage_log: Option<PathBuf>,
}

// ============================================================
// Defaults
// ============================================================

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            moderate_threshold: 0.2,
            high_threshold: 0.5,
            dual_high_threshold: 0.7,
            framework_confidence_threshold: 0.6,
            order: ConflictRule::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self { value_driven_threshold: 0.8, analytical_threshold: 0.8 }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self { two_pass: true, cross_influence: 0.1, agreement_threshold: 0.2 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { show_affective: true, show_analytical: true, show_synthesis: true, trace: false }
    }
}

// ============================================================
// Loading
// ============================================================

impl EngineConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} — using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {} — using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Cannot read {}: {} — using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
