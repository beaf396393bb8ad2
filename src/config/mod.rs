//! Configuration module for compliance-engine.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.compliance-engine.yaml` file in your project root or
//! `~/.config/compliance-engine/`:
//!
//! ```yaml
//! repository:
//!   questionnaire_dir: ./questionnaires
//! scoring:
//!   high_risk_threshold: 0.6
//! corrections:
//!   enabled: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_FALLBACK_INDUSTRY, DEFAULT_FULL_COMPLIANCE_PATTERNS, DEFAULT_HIGH_RISK_THRESHOLD,
    DEFAULT_IMPROVEMENT_THRESHOLD, DEFAULT_PRECISION_FLOOR, DEFAULT_WEIGHT_TOLERANCE,
};
pub use types::{
    CorrectionsConfig, EngineConfig, OutputConfig, OutputFormat, RepositoryConfig, ScoringConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    user_config_dir, CliOverrides, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `EngineConfig` configuration format.
///
/// Documents every option accepted in `.compliance-engine.yaml`, for editor
/// validation and autocompletion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(EngineConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
