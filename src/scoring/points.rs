//! Answer point resolution: free-text response to point value.
//!
//! Resolution order:
//! 1. exact key in the answer table;
//! 2. case-insensitive key in the answer table;
//! 3. substring heuristics, first rule wins (see [`HEURISTICS`]);
//! 4. unresolved: logged and scored as 0 points.
//!
//! Questionnaires without an answer table use [`AnswerPoints::builtin`].

use crate::model::{AnswerPoints, PointValue};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// How a response was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "rule", rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    CaseInsensitive,
    /// Matched by the named heuristic rule
    Heuristic(&'static str),
    /// Nothing matched; scored as 0
    Unresolved,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::CaseInsensitive => write!(f, "case-insensitive"),
            Self::Heuristic(rule) => write!(f, "heuristic:{rule}"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// A resolved response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub value: PointValue,
    pub method: MatchMethod,
}

impl Resolution {
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self.method, MatchMethod::Unresolved)
    }
}

/// A substring rule applied to the lowercased response.
#[derive(Debug, Clone, Copy)]
pub struct Heuristic {
    pub name: &'static str,
    /// Any of these substrings triggers the rule
    pub needles: &'static [&'static str],
    pub value: PointValue,
}

impl Heuristic {
    fn matches(&self, lowered: &str) -> bool {
        self.needles.iter().any(|needle| lowered.contains(needle))
    }
}

/// Heuristic rules in evaluation order.
///
/// Plain substring tests: "no" also fires inside "not applicable" and
/// "none", so the negative rule shadows the not-applicable rule for most
/// wordings.
pub const HEURISTICS: &[Heuristic] = &[
    Heuristic {
        name: "affirmative",
        needles: &["yes", "successfully completed"],
        value: PointValue::Points(1.0),
    },
    Heuristic {
        name: "negative",
        needles: &["no", "not yet completed"],
        value: PointValue::Points(0.0),
    },
    Heuristic {
        name: "partial",
        needles: &["partial", "needs improvement"],
        value: PointValue::Points(0.5),
    },
    Heuristic {
        name: "not-applicable",
        needles: &["not applicable"],
        value: PointValue::Excluded,
    },
];

/// Shared built-in answer table.
#[must_use]
pub fn builtin_table() -> &'static AnswerPoints {
    static BUILTIN: OnceLock<AnswerPoints> = OnceLock::new();
    BUILTIN.get_or_init(AnswerPoints::builtin)
}

/// Resolve a response against `table`, or the built-in table when `None`.
#[must_use]
pub fn resolve_points(response: &str, table: Option<&AnswerPoints>) -> Resolution {
    let table = match table {
        Some(t) if !t.is_empty() => t,
        _ => builtin_table(),
    };

    if let Some(value) = table.get(response) {
        return Resolution {
            value,
            method: MatchMethod::Exact,
        };
    }
    if let Some(value) = table.get_ignore_case(response) {
        tracing::debug!("Case-insensitive match for response '{response}'");
        return Resolution {
            value,
            method: MatchMethod::CaseInsensitive,
        };
    }

    let lowered = response.to_lowercase();
    if let Some(rule) = HEURISTICS.iter().find(|rule| rule.matches(&lowered)) {
        tracing::debug!(
            "Heuristic '{}' matched response '{response}' -> {:?}",
            rule.name,
            rule.value.points()
        );
        return Resolution {
            value: rule.value,
            method: MatchMethod::Heuristic(rule.name),
        };
    }

    tracing::warn!("Unable to determine points for response '{response}', scoring as 0");
    Resolution {
        value: PointValue::Points(0.0),
        method: MatchMethod::Unresolved,
    }
}
