//! Normalized questionnaire (rule set) types.
//!
//! These are the shapes the engine works with after a document has been
//! loaded, validated and repaired. Raw document shapes live in
//! [`crate::questionnaire::document`].

use super::{AnswerPoints, ResponseKey};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved questionnaire came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionnaireOrigin {
    /// Loaded from the document requested for the industry
    Document { name: String },
    /// Requested industry missing; the regulation's fallback document was used
    FallbackDocument { name: String },
    /// Nothing usable was found; a minimal questionnaire was synthesized
    Synthesized,
}

impl QuestionnaireOrigin {
    /// Document name the questionnaire was read from, if any.
    #[must_use]
    pub fn document_name(&self) -> Option<&str> {
        match self {
            Self::Document { name } | Self::FallbackDocument { name } => Some(name),
            Self::Synthesized => None,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        !matches!(self, Self::Document { .. })
    }
}

impl fmt::Display for QuestionnaireOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document { name } => write!(f, "{name}"),
            Self::FallbackDocument { name } => write!(f, "{name} (fallback)"),
            Self::Synthesized => write!(f, "synthesized"),
        }
    }
}

/// A single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within the section
    pub id: String,
    pub text: String,
    /// Allowed answers, in display order
    pub options: Vec<String>,
    /// Response text (or pattern) to recommendation text
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub recommendations: IndexMap<String, String>,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            options,
            recommendations: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_recommendation(
        mut self,
        response: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        self.recommendations
            .insert(response.into(), recommendation.into());
        self
    }
}

/// A weighted group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique within the questionnaire; keys score and recommendation maps
    pub name: String,
    /// Positive; all section weights of a questionnaire sum to 1.0
    pub weight: f64,
    /// Stable ordinal used in response keys
    pub index: usize,
    pub questions: Vec<Question>,
}

impl Section {
    /// Response key of the `question`-th question of this section.
    #[must_use]
    pub const fn key(&self, question: usize) -> ResponseKey {
        ResponseKey::new(self.index, question)
    }

    /// Questions paired with their response keys.
    pub fn keyed_questions(&self) -> impl Iterator<Item = (ResponseKey, &Question)> {
        self.questions
            .iter()
            .enumerate()
            .map(move |(i, q)| (self.key(i), q))
    }
}

/// A resolved, normalized rule set for one regulation and industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    /// Canonical regulation code (uppercase)
    pub regulation: String,
    /// Industry the questionnaire was resolved for (canonical form)
    pub industry: String,
    pub origin: QuestionnaireOrigin,
    pub sections: Vec<Section>,
    /// Declared answer table; `None` means the built-in table applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_points: Option<AnswerPoints>,
}

impl Questionnaire {
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn question(&self, key: ResponseKey) -> Option<&Question> {
        self.sections
            .get(key.section)
            .and_then(|s| s.questions.get(key.question))
    }

    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.sections.iter().map(|s| s.weight).sum()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Names of all sections, in declared order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Questionnaire {
        Questionnaire {
            regulation: "DPDP".to_string(),
            industry: "E-commerce".to_string(),
            origin: QuestionnaireOrigin::Document {
                name: "E-commerce".to_string(),
            },
            sections: vec![
                Section {
                    name: "Consent".to_string(),
                    weight: 0.5,
                    index: 0,
                    questions: vec![Question::new("c1", "Is consent recorded?", vec![])],
                },
                Section {
                    name: "Security".to_string(),
                    weight: 0.5,
                    index: 1,
                    questions: vec![
                        Question::new("s1", "Is data encrypted?", vec![]),
                        Question::new("s2", "Are backups tested?", vec![]),
                    ],
                },
            ],
            answer_points: None,
        }
    }

    #[test]
    fn test_question_lookup_by_key() {
        let q = sample();
        assert_eq!(q.question(ResponseKey::new(1, 1)).map(|q| q.id.as_str()), Some("s2"));
        assert!(q.question(ResponseKey::new(2, 0)).is_none());
        assert_eq!(q.question_count(), 3);
        assert!((q.total_weight() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_keyed_questions_use_section_index() {
        let q = sample();
        let keys: Vec<String> = q.sections[1]
            .keyed_questions()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, vec!["s1_q0", "s1_q1"]);
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(QuestionnaireOrigin::Synthesized.to_string(), "synthesized");
        let fb = QuestionnaireOrigin::FallbackDocument {
            name: "General".to_string(),
        };
        assert!(fb.is_fallback());
        assert_eq!(fb.document_name(), Some("General"));
    }
}
