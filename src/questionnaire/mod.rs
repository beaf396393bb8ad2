//! Questionnaire repository.
//!
//! Resolves a `(regulation, industry)` selector to a normalized
//! [`Questionnaire`](crate::model::Questionnaire):
//!
//! - [`document`]: on-disk document shapes, both question formats
//! - [`normalize`]: structural validation and load-time repair
//! - [`source`]: storage backends (directory, memory)
//! - [`profile`]: declarative per-regulation lookup rules
//! - [`cache`]: shared snapshot cache with explicit invalidation
//! - [`repository`]: the lookup chain tying them together

pub mod cache;
pub mod document;
mod fallback;
pub mod normalize;
mod profile;
mod repository;
pub mod source;

pub use cache::{CacheKey, CacheStats, QuestionnaireCache};
pub use document::{DetailedQuestion, LegacyOptions, RawQuestion, RawQuestionnaire, RawSection};
pub use fallback::{synthesize, SAMPLE_OPTIONS};
pub use normalize::{IssueSeverity, ValidationIssue};
pub use profile::{
    builtin_profiles, builtin_regulation_aliases, generic_sections, RegulationProfile,
    GENERIC_FALLBACK_SECTIONS,
};
pub use repository::{QuestionnaireRepository, Selector};
pub use source::{DirectorySource, MemorySource, RuleSetSource};
