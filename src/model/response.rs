//! Response keys and the per-session response map.

use crate::error::{DocumentErrorKind, EngineError, ErrorContext, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Composite key addressing one question: `(section_index, question_index)`.
///
/// The textual form is `s{section}_q{question}`, e.g. `s0_q2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponseKey {
    pub section: usize,
    pub question: usize,
}

impl ResponseKey {
    #[must_use]
    pub const fn new(section: usize, question: usize) -> Self {
        Self { section, question }
    }
}

impl fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}_q{}", self.section, self.question)
    }
}

impl FromStr for ResponseKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            EngineError::document(
                "response key",
                DocumentErrorKind::InvalidResponseKey(s.to_string()),
            )
        };

        let rest = s.trim().strip_prefix('s').ok_or_else(invalid)?;
        let (section, question) = rest.split_once("_q").ok_or_else(invalid)?;
        let section = section.parse::<usize>().map_err(|_| invalid())?;
        let question = question.parse::<usize>().map_err(|_| invalid())?;
        Ok(Self { section, question })
    }
}

impl Serialize for ResponseKey {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResponseKey {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Answers collected for one assessment session.
///
/// A missing key, a `null` value and an empty string are all "unanswered";
/// none of them is ever treated as scoring input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Option<String>>", into = "BTreeMap<String, Option<String>>")]
pub struct ResponseMap {
    answers: IndexMap<ResponseKey, String>,
}

impl ResponseMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from raw `"s{i}_q{j}"` keys.
    ///
    /// Keys that do not parse are logged and skipped; `None` values are
    /// dropped.
    pub fn from_raw<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            match key.as_ref().parse::<ResponseKey>() {
                Ok(parsed) => map.set(parsed, value),
                Err(e) => tracing::warn!("Ignoring response: {e}"),
            }
        }
        map
    }

    /// Load a response map from a JSON object file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let raw: BTreeMap<String, Option<String>> = serde_json::from_str(&content)
            .with_context(|| format!("parsing responses from {}", path.display()))?;
        Ok(Self::from_raw(raw))
    }

    /// Record (or clear, with `None`) the answer for a question.
    pub fn set(&mut self, key: ResponseKey, value: Option<String>) {
        match value {
            Some(text) if !text.is_empty() => {
                self.answers.insert(key, text);
            }
            _ => {
                self.answers.shift_remove(&key);
            }
        }
    }

    /// Builder-style insert, handy in tests and fixtures.
    #[must_use]
    pub fn with(mut self, section: usize, question: usize, text: impl Into<String>) -> Self {
        self.set(ResponseKey::new(section, question), Some(text.into()));
        self
    }

    #[must_use]
    pub fn get(&self, key: ResponseKey) -> Option<&str> {
        self.answers.get(&key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Iterate answers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ResponseKey, &str)> {
        self.answers.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of answers recorded for one section.
    #[must_use]
    pub fn answered_in_section(&self, section: usize) -> usize {
        self.answers.keys().filter(|k| k.section == section).count()
    }
}

impl From<BTreeMap<String, Option<String>>> for ResponseMap {
    fn from(raw: BTreeMap<String, Option<String>>) -> Self {
        Self::from_raw(raw)
    }
}

impl From<ResponseMap> for BTreeMap<String, Option<String>> {
    fn from(map: ResponseMap) -> Self {
        map.answers
            .into_iter()
            .map(|(k, v)| (k.to_string(), Some(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_and_parse() {
        let key = ResponseKey::new(3, 12);
        assert_eq!(key.to_string(), "s3_q12");
        assert_eq!("s3_q12".parse::<ResponseKey>().unwrap(), key);
    }

    #[test]
    fn test_key_rejects_malformed() {
        for bad in ["", "s", "q1_s2", "s1q2", "s-1_q2", "sX_q1", "s1_q", "s1_qx"] {
            assert!(bad.parse::<ResponseKey>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_null_and_empty_are_unanswered() {
        let map = ResponseMap::from_raw([
            ("s0_q0", Some("Yes".to_string())),
            ("s0_q1", None),
            ("s0_q2", Some(String::new())),
            ("garbage", Some("Yes".to_string())),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(ResponseKey::new(0, 0)), Some("Yes"));
        assert_eq!(map.get(ResponseKey::new(0, 1)), None);
        assert_eq!(map.get(ResponseKey::new(0, 2)), None);
    }

    #[test]
    fn test_set_none_clears_answer() {
        let mut map = ResponseMap::new().with(1, 0, "No");
        map.set(ResponseKey::new(1, 0), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let map: ResponseMap =
            serde_json::from_str(r#"{"s0_q0": "Yes", "s1_q0": null, "s1_q1": "No"}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.answered_in_section(1), 1);
    }
}
