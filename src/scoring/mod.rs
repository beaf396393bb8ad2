//! Compliance scoring.
//!
//! - [`points`]: response text to point value
//! - [`section`]: one section's score
//! - [`corrections`]: named score-correction rules
//! - [`patches`]: answer-table overrides
//! - [`levels`]: score to compliance level
//! - [`Scorer`]: overall score, risk areas, priorities, recommendations

pub mod corrections;
mod levels;
mod patches;
pub mod points;
mod scorer;
mod section;

pub use corrections::{
    AllFullPoints, Applied, CorrectionContext, Corrections, FullCompliancePhrases, PrecisionFloor,
    ScoreCorrection, ScoredResponse,
};
pub use levels::{default_levels, ComplianceLevels, ComplianceThreshold, NON_COMPLIANT};
pub use patches::{apply_patches, builtin_patches, PointsPatch};
pub use points::{builtin_table, resolve_points, Heuristic, MatchMethod, Resolution, HEURISTICS};
pub use scorer::Scorer;
pub use section::score_section;
