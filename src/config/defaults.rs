//! Default values for compliance-engine configuration.

use super::types::{CorrectionsConfig, RepositoryConfig, ScoringConfig};
use crate::questionnaire::{builtin_profiles, builtin_regulation_aliases};
use crate::scoring::{builtin_patches, default_levels};

/// Accepted deviation of section weights from a total of 1.0.
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 0.02;

/// Sections below this score are high-risk areas.
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.6;

/// Sections below this score are improvement priorities.
pub const DEFAULT_IMPROVEMENT_THRESHOLD: f64 = 0.75;

/// Raw scores from here up to 1.0 are treated as rounding error.
pub const DEFAULT_PRECISION_FLOOR: f64 = 0.95;

/// Fallback document for regulations without a profile.
pub const DEFAULT_FALLBACK_INDUSTRY: &str = "Banking and finance";

/// Phrases that mark a response as fully compliant.
pub const DEFAULT_FULL_COMPLIANCE_PATTERNS: &[&str] = &[
    "yes, with",
    "notices are provided in english and all",
    "comprehensive",
    "robust",
    "full",
    "strict adherence",
    "established procedures",
    "clear verification",
    "dedicated",
];

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            questionnaire_dir: None,
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
            default_fallback_industry: DEFAULT_FALLBACK_INDUSTRY.to_string(),
            regulation_aliases: builtin_regulation_aliases(),
            profiles: builtin_profiles(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            compliance_levels: default_levels(),
            high_risk_threshold: DEFAULT_HIGH_RISK_THRESHOLD,
            improvement_threshold: DEFAULT_IMPROVEMENT_THRESHOLD,
        }
    }
}

impl Default for CorrectionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            precision_floor: DEFAULT_PRECISION_FLOOR,
            full_compliance_patterns: DEFAULT_FULL_COMPLIANCE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            points_patches: builtin_patches(),
        }
    }
}

impl CorrectionsConfig {
    /// Corrections switched off entirely.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!((config.repository.weight_tolerance - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.scoring.compliance_levels.len(), 4);
        assert!(config.corrections.enabled);
        assert!(config.profile("npc").is_some());
        assert!(config.profile("GDPR").is_none());
    }

    #[test]
    fn test_disabled_corrections_keep_other_defaults() {
        let c = CorrectionsConfig::disabled();
        assert!(!c.enabled);
        assert_eq!(c.full_compliance_patterns.len(), DEFAULT_FULL_COMPLIANCE_PATTERNS.len());
    }
}
