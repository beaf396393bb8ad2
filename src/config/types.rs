//! Configuration types for compliance-engine.
//!
//! Groups every tunable of the engine: where rule sets live and how they
//! are looked up, how scores become levels and priorities, which score
//! corrections run, and how the CLI prints results.

use crate::questionnaire::RegulationProfile;
use crate::scoring::{ComplianceThreshold, PointsPatch};
use clap::ValueEnum;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Engine Configuration
// ============================================================================

/// Top-level configuration, loadable from a YAML file and overridable from
/// the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Rule-set storage and lookup
    pub repository: RepositoryConfig,
    /// Levels, risk and priority thresholds
    pub scoring: ScoringConfig,
    /// Score-correction heuristics and answer-table patches
    pub corrections: CorrectionsConfig,
    /// CLI output
    pub output: OutputConfig,
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile for a regulation code, matched case-insensitively.
    #[must_use]
    pub fn profile(&self, regulation: &str) -> Option<&RegulationProfile> {
        self.repository
            .profiles
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(regulation))
    }
}

// ============================================================================
// Repository
// ============================================================================

/// Where rule sets live and how a selector is resolved to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Root directory holding `<REGULATION>/<industry>.json` documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questionnaire_dir: Option<PathBuf>,
    /// Accepted deviation of the section weight total from 1.0
    pub weight_tolerance: f64,
    /// Fallback document for regulations whose profile names none
    pub default_fallback_industry: String,
    /// Lowercase regulation alias to regulation code
    pub regulation_aliases: IndexMap<String, String>,
    /// Per-regulation lookup rules
    pub profiles: Vec<RegulationProfile>,
}

// ============================================================================
// Scoring
// ============================================================================

/// Thresholds applied by the aggregate scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringConfig {
    /// Compliance ladder, in any order
    pub compliance_levels: Vec<ComplianceThreshold>,
    /// Sections scoring below this are high-risk areas
    pub high_risk_threshold: f64,
    /// Sections scoring below this are improvement priorities
    pub improvement_threshold: f64,
}

// ============================================================================
// Corrections
// ============================================================================

/// Score-correction heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CorrectionsConfig {
    /// Run the correction pass at all
    pub enabled: bool,
    /// Raw scores in `[precision_floor, 1.0)` are rounded up to 1.0
    pub precision_floor: f64,
    /// Case-insensitive phrases that mark a response as fully compliant
    pub full_compliance_patterns: Vec<String>,
    /// Answer-table overrides applied before scoring
    pub points_patches: Vec<PointsPatch>,
}

// ============================================================================
// Output
// ============================================================================

/// Output format for assessment results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal summary
    #[default]
    Summary,
    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// CLI output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Output file path (stdout when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}
