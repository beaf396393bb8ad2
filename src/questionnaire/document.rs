//! Rule-set document shapes as stored on disk.
//!
//! Every field of a document may be missing or of the
//! wrong type, and questions come in two shapes. Nothing here is used by
//! the scorers directly; [`super::normalize`] turns a [`RawQuestionnaire`]
//! into a [`crate::model::Questionnaire`].

use crate::error::{ErrorContext, Result};
use crate::model::AnswerPoints;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level rule-set document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuestionnaire {
    #[serde(default)]
    pub sections: Vec<RawSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_points: Option<AnswerPoints>,
}

impl RawQuestionnaire {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str, context: &str) -> Result<Self> {
        serde_json::from_str(text).with_context(|| format!("parsing rule set {context}"))
    }
}

/// One section as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kept untyped so that strings, nulls and negatives can be repaired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
    /// Section-level options used by plain-text questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LegacyOptions>,
}

impl RawSection {
    /// The declared weight, if it is a positive finite number.
    #[must_use]
    pub fn valid_weight(&self) -> Option<f64> {
        self.weight
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|w| w.is_finite() && *w > 0.0)
    }
}

/// Section-level options of the legacy format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyOptions {
    /// One option list per question, by position
    PerQuestion(Vec<Vec<String>>),
    /// One option list shared by every question
    Shared(Vec<String>),
}

impl LegacyOptions {
    /// Options for the `index`-th question, if any.
    #[must_use]
    pub fn for_question(&self, index: usize) -> Option<&[String]> {
        match self {
            Self::PerQuestion(lists) => lists.get(index).map(Vec::as_slice),
            Self::Shared(list) => Some(list.as_slice()),
        }
    }
}

/// A question in either of its stored shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuestion {
    /// Legacy shape: only the question text
    PlainText(String),
    /// Full record
    Detailed(DetailedQuestion),
}

/// Full question record; every field optional at this layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedQuestion {
    /// String or number in the wild
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub recommendations: IndexMap<String, String>,
}

impl DetailedQuestion {
    /// The id rendered as text, if present and scalar.
    #[must_use]
    pub fn id_text(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_question_shapes() {
        let doc = RawQuestionnaire::from_json(
            r#"{"sections": [{"name": "A", "weight": 1.0, "questions": [
                "Plain question?",
                {"id": 7, "text": "Record question?", "options": ["Yes", "No"],
                 "recommendations": {"No": "Fix it"}}
            ]}]}"#,
            "test",
        )
        .unwrap();

        let questions = &doc.sections[0].questions;
        assert!(matches!(&questions[0], RawQuestion::PlainText(t) if t == "Plain question?"));
        match &questions[1] {
            RawQuestion::Detailed(q) => {
                assert_eq!(q.id_text().as_deref(), Some("7"));
                assert_eq!(q.recommendations.get("No").map(String::as_str), Some("Fix it"));
            }
            other => panic!("expected detailed question, got {other:?}"),
        }
    }

    #[test]
    fn test_weight_is_repairable() {
        let doc = RawQuestionnaire::from_json(
            r#"{"sections": [
                {"name": "A", "weight": "0.5"},
                {"name": "B", "weight": -1},
                {"name": "C", "weight": 0.25},
                {"name": "D"}
            ]}"#,
            "test",
        )
        .unwrap();
        let weights: Vec<Option<f64>> = doc.sections.iter().map(RawSection::valid_weight).collect();
        assert_eq!(weights, vec![None, None, Some(0.25), None]);
    }

    #[test]
    fn test_legacy_options_shapes() {
        let per: LegacyOptions = serde_json::from_str(r#"[["Yes","No"],["A","B","C"]]"#).unwrap();
        assert_eq!(per.for_question(1).map(<[String]>::len), Some(3));
        assert!(per.for_question(2).is_none());

        let shared: LegacyOptions = serde_json::from_str(r#"["Yes","No"]"#).unwrap();
        assert_eq!(shared.for_question(9).map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_missing_sections_parses_empty() {
        let doc = RawQuestionnaire::from_json("{}", "test").unwrap();
        assert!(doc.sections.is_empty());
        assert!(RawQuestionnaire::from_json("[1, 2", "broken").is_err());
    }
}
