//! Answer-to-points tables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Point value assigned to one canonical answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointValue {
    /// Scored answer worth `0.0..=1.0` points
    Points(f64),
    /// Answer left out of both numerator and denominator ("not applicable")
    Excluded,
}

impl PointValue {
    /// Points contributed, or `None` for excluded answers.
    #[must_use]
    pub fn points(self) -> Option<f64> {
        match self {
            Self::Points(p) => Some(p),
            Self::Excluded => None,
        }
    }

    #[must_use]
    pub const fn is_excluded(self) -> bool {
        matches!(self, Self::Excluded)
    }
}

impl From<Option<f64>> for PointValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Excluded, Self::Points)
    }
}

impl From<PointValue> for Option<f64> {
    fn from(value: PointValue) -> Self {
        value.points()
    }
}

impl Serialize for PointValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PointValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<f64>::deserialize(deserializer).map(Self::from)
    }
}

/// Mapping from canonical answer text to its point value.
///
/// Declaration order is kept; case-insensitive lookups return the first
/// matching entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerPoints {
    entries: IndexMap<String, PointValue>,
}

impl AnswerPoints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table used when a rule set declares no `answer_points`.
    #[must_use]
    pub fn builtin() -> Self {
        [
            ("Yes - Successfully completed", PointValue::Points(1.0)),
            ("Yes, with comprehensive documentation", PointValue::Points(1.0)),
            ("Yes, with full documentation", PointValue::Points(1.0)),
            ("Yes, fully compliant", PointValue::Points(1.0)),
            ("Yes", PointValue::Points(1.0)),
            ("Partially completed", PointValue::Points(0.5)),
            ("Partially compliant", PointValue::Points(0.5)),
            ("In progress", PointValue::Points(0.5)),
            ("Partially, but training needs improvement", PointValue::Points(0.5)),
            ("Partially, but the process needs improvement", PointValue::Points(0.5)),
            ("No - Not yet completed", PointValue::Points(0.0)),
            ("No - Not Applicable", PointValue::Excluded),
            ("No, not compliant", PointValue::Points(0.0)),
            ("No", PointValue::Points(0.0)),
            ("Not applicable", PointValue::Excluded),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, answer: impl Into<String>, value: PointValue) -> Option<PointValue> {
        self.entries.insert(answer.into(), value)
    }

    /// Exact lookup.
    #[must_use]
    pub fn get(&self, answer: &str) -> Option<PointValue> {
        self.entries.get(answer).copied()
    }

    /// Case-insensitive lookup, first declared entry wins.
    #[must_use]
    pub fn get_ignore_case(&self, answer: &str) -> Option<PointValue> {
        let needle = answer.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| key.to_lowercase() == needle)
            .map(|(_, value)| *value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PointValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, PointValue)> for AnswerPoints {
    fn from_iter<T: IntoIterator<Item = (K, PointValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
