//! Scoring results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outcome of scoring a single section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionOutcome {
    /// Raw ratio before any correction (`None` when nothing was answered)
    pub raw: Option<f64>,
    /// Final score in `[0, 1]`, `None` when unscored
    pub score: Option<f64>,
    /// Name of the correction rule that replaced the raw score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    /// Responses counted in the denominator
    pub answered: usize,
    /// Responses resolved to "not applicable"
    pub excluded: usize,
    /// Responses that matched nothing and were scored as 0
    pub unresolved: usize,
}

impl SectionOutcome {
    /// An outcome for a section with no countable responses.
    #[must_use]
    pub fn unscored(excluded: usize) -> Self {
        Self {
            excluded,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    #[must_use]
    pub const fn was_corrected(&self) -> bool {
        self.correction.is_some()
    }
}

/// Complete result of one score calculation.
///
/// Rebuilt from scratch on every calculation; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Weighted overall score as a percentage (0–100)
    pub overall_score: f64,
    pub compliance_level: String,
    /// Section name to score, in declared section order
    pub section_scores: IndexMap<String, Option<f64>>,
    /// Per-section breakdown
    #[serde(default)]
    pub section_details: IndexMap<String, SectionOutcome>,
    /// Scored sections below the high-risk threshold
    pub high_risk_areas: Vec<String>,
    /// Section name to recommendations, in declared section order
    pub recommendations: IndexMap<String, Vec<String>>,
    /// Scored sections below the improvement threshold, lowest first
    pub improvement_priorities: Vec<String>,
    pub regulation: String,
    pub industry: String,
}

impl ScoreResult {
    /// Result for an assessment with no responses at all.
    #[must_use]
    pub fn empty(
        regulation: impl Into<String>,
        industry: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            overall_score: 0.0,
            compliance_level: level.into(),
            section_scores: IndexMap::new(),
            section_details: IndexMap::new(),
            high_risk_areas: Vec::new(),
            recommendations: IndexMap::new(),
            improvement_priorities: Vec::new(),
            regulation: regulation.into(),
            industry: industry.into(),
        }
    }

    /// Sections that received a score, with their score.
    pub fn scored_sections(&self) -> impl Iterator<Item = (&str, f64)> {
        self.section_scores
            .iter()
            .filter_map(|(name, score)| score.map(|s| (name.as_str(), s)))
    }

    /// Whether the result was computed for the given selector.
    #[must_use]
    pub fn matches_selector(&self, regulation: &str, industry: &str) -> bool {
        self.regulation.eq_ignore_ascii_case(regulation.trim())
            && self.industry.eq_ignore_ascii_case(industry.trim())
    }
}
