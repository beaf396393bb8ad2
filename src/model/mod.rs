//! Core data models for compliance-engine.
//!
//! Everything the scorers read (questionnaires, answer tables, response maps)
//! and everything they produce (score results, section outcomes, progress).

mod points;
mod progress;
mod questionnaire;
mod response;
mod result;

pub use points::{AnswerPoints, PointValue};
pub use progress::{Progress, SectionProgress};
pub use questionnaire::{Question, Questionnaire, QuestionnaireOrigin, Section};
pub use response::{ResponseKey, ResponseMap};
pub use result::{ScoreResult, SectionOutcome};
