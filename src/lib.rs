//! **Questionnaire-based compliance scoring.**
//!
//! `compliance-engine` scores answers to a regulation questionnaire (DPDP,
//! NPC, PDPPL, OAIC, ...) against per-regulation, per-industry rule sets.
//! It produces a weighted overall score, a qualitative compliance level,
//! high-risk sections, improvement priorities and recommendations.
//!
//! ## Core Concepts & Modules
//!
//! - **[`questionnaire`]**: the [`QuestionnaireRepository`] resolves a
//!   `(regulation, industry)` selector to a rule set. Missing rule sets fall
//!   back to the regulation's fallback industry and finally to a synthesized
//!   questionnaire; skewed section weights are repaired on load.
//! - **[`scoring`]**: maps free-text answers to points, scores sections
//!   (with named correction rules for known rule-set data problems) and
//!   combines them with the [`Scorer`].
//! - **[`recommendations`]**: turns section scores and responses into
//!   recommendation text with priority tiers.
//! - **[`model`]**: questionnaires, response maps and [`ScoreResult`].
//! - **[`config`]**: YAML configuration with validation and JSON schema.
//!
//! ## Getting Started
//!
//! ```no_run
//! use compliance_engine::{ComplianceEngine, EngineConfig, ResponseMap};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = EngineConfig::default();
//!     config.repository.questionnaire_dir = Some("questionnaires".into());
//!     let engine = ComplianceEngine::from_config(&config)?;
//!
//!     let responses = ResponseMap::from_json_file(Path::new("responses.json"))?;
//!     let assessment = engine.assess("DPDP", "E-commerce", &responses);
//!
//!     println!(
//!         "{:.1}% ({})",
//!         assessment.result.overall_score, assessment.result.compliance_level
//!     );
//!     for area in &assessment.result.high_risk_areas {
//!         println!("  high risk: {area}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `compliance-engine` binary wraps the library: `assess`, `industries`,
//! `validate`, `config` and `completions`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Counts become ratios and percentages; all values are small
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::unused_self
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod questionnaire;
pub mod recommendations;
pub mod scoring;

// Re-export main types for convenience
pub use config::{
    ConfigError, CorrectionsConfig, EngineConfig, OutputConfig, OutputFormat, RepositoryConfig,
    ScoringConfig, Validatable,
};
pub use engine::{Assessment, ComplianceEngine};
pub use error::{EngineError, ErrorContext, OptionContext, Result};
pub use model::{
    AnswerPoints, PointValue, Progress, Question, Questionnaire, QuestionnaireOrigin, ResponseKey,
    ResponseMap, ScoreResult, Section, SectionOutcome,
};
pub use questionnaire::{
    DirectorySource, MemorySource, QuestionnaireCache, QuestionnaireRepository, RegulationProfile,
    RuleSetSource,
};
pub use recommendations::{Priority, PriorityGroups, RecommendationResolver};
pub use scoring::{resolve_points, score_section, ComplianceLevels, Corrections, Scorer};
