//! Configuration validation for compliance-engine.

use super::types::{CorrectionsConfig, EngineConfig, OutputConfig, RepositoryConfig, ScoringConfig};
use std::collections::HashSet;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn check_ratio(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::new(
            field,
            format!("Must be between 0.0 and 1.0, got {value}"),
        ));
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for EngineConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.repository.validate());
        errors.extend(self.scoring.validate());
        errors.extend(self.corrections.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for RepositoryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(0.0..0.5).contains(&self.weight_tolerance) {
            errors.push(ConfigError::new(
                "repository.weight_tolerance",
                format!(
                    "Tolerance must be in [0.0, 0.5), got {}",
                    self.weight_tolerance
                ),
            ));
        }

        if self.default_fallback_industry.trim().is_empty() {
            errors.push(ConfigError::new(
                "repository.default_fallback_industry",
                "Fallback industry must not be empty",
            ));
        }

        if let Some(ref dir) = self.questionnaire_dir {
            if !dir.is_dir() {
                errors.push(ConfigError::new(
                    "repository.questionnaire_dir",
                    format!("Not a directory: {}", dir.display()),
                ));
            }
        }

        let mut seen = HashSet::new();
        for (i, profile) in self.profiles.iter().enumerate() {
            let code = profile.code.trim().to_uppercase();
            if code.is_empty() {
                errors.push(ConfigError::new(
                    format!("repository.profiles[{i}].code"),
                    "Regulation code must not be empty",
                ));
            } else if !seen.insert(code.clone()) {
                errors.push(ConfigError::new(
                    format!("repository.profiles[{i}].code"),
                    format!("Duplicate profile for regulation '{code}'"),
                ));
            }
        }

        for (alias, target) in &self.regulation_aliases {
            if alias.trim().is_empty() || target.trim().is_empty() {
                errors.push(ConfigError::new(
                    "repository.regulation_aliases",
                    format!("Empty alias entry '{alias}' -> '{target}'"),
                ));
            }
        }

        errors
    }
}

impl Validatable for ScoringConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.compliance_levels.is_empty() {
            errors.push(ConfigError::new(
                "scoring.compliance_levels",
                "At least one compliance level is required",
            ));
        }
        for (i, level) in self.compliance_levels.iter().enumerate() {
            check_ratio(
                &mut errors,
                &format!("scoring.compliance_levels[{i}].threshold"),
                level.threshold,
            );
            if level.label.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("scoring.compliance_levels[{i}].label"),
                    "Label must not be empty",
                ));
            }
        }

        check_ratio(&mut errors, "scoring.high_risk_threshold", self.high_risk_threshold);
        check_ratio(&mut errors, "scoring.improvement_threshold", self.improvement_threshold);
        if self.high_risk_threshold > self.improvement_threshold {
            errors.push(ConfigError::new(
                "scoring.high_risk_threshold",
                format!(
                    "High-risk threshold ({}) exceeds improvement threshold ({})",
                    self.high_risk_threshold, self.improvement_threshold
                ),
            ));
        }

        errors
    }
}

impl Validatable for CorrectionsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        check_ratio(&mut errors, "corrections.precision_floor", self.precision_floor);

        if self
            .full_compliance_patterns
            .iter()
            .any(|p| p.trim().is_empty())
        {
            errors.push(ConfigError::new(
                "corrections.full_compliance_patterns",
                "Empty pattern would match every response",
            ));
        }

        for (i, patch) in self.points_patches.iter().enumerate() {
            check_ratio(
                &mut errors,
                &format!("corrections.points_patches[{i}].points"),
                patch.points,
            );
            if patch.answer.is_empty() {
                errors.push(ConfigError::new(
                    format!("corrections.points_patches[{i}].answer"),
                    "Answer text must not be empty",
                ));
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}
