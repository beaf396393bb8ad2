//! Structural validation and load-time repair of rule-set documents.
//!
//! Validation only reports; [`normalize`] never rejects a document that has
//! at least one section. Missing names, duplicate names, bad weights and
//! legacy question shapes are all repaired here, once, at load time.

use super::document::{RawQuestion, RawQuestionnaire, RawSection};
use crate::model::{Question, Questionnaire, QuestionnaireOrigin, Section};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// How serious a structural finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Repaired automatically at load time
    Warning,
    /// The document cannot be used as-is (it will be treated as missing)
    Error,
}

/// One structural finding in a rule-set document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    /// JSON-path-like location, e.g. `sections[2].questions[0].id`
    pub location: String,
    pub message: String,
}

impl ValidationIssue {
    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            location: location.into(),
            message: message.into(),
        }
    }

    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            IssueSeverity::Warning => "warning",
            IssueSeverity::Error => "error",
        };
        write!(f, "[{tag}] {}: {}", self.location, self.message)
    }
}

/// Check a document against the rule-set schema.
///
/// Reports every problem found; an empty list means the document loads
/// without any repair.
#[must_use]
pub fn validate(doc: &RawQuestionnaire, tolerance: f64) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if doc.sections.is_empty() {
        issues.push(ValidationIssue::error("sections", "no sections defined"));
        return issues;
    }

    let mut names = HashSet::new();
    for (i, section) in doc.sections.iter().enumerate() {
        let at = format!("sections[{i}]");
        match section.name.as_deref().map(str::trim) {
            None | Some("") => {
                issues.push(ValidationIssue::warning(format!("{at}.name"), "missing name"));
            }
            Some(name) => {
                if !names.insert(name.to_string()) {
                    issues.push(ValidationIssue::warning(
                        format!("{at}.name"),
                        format!("duplicate section name '{name}'"),
                    ));
                }
            }
        }
        if section.valid_weight().is_none() {
            issues.push(ValidationIssue::warning(
                format!("{at}.weight"),
                "missing or non-positive weight",
            ));
        }
        if section.questions.is_empty() {
            issues.push(ValidationIssue::warning(format!("{at}.questions"), "no questions"));
        }
        validate_questions(section, &at, &mut issues);
    }

    if doc.sections.iter().all(|s| s.valid_weight().is_some()) {
        let total: f64 = doc.sections.iter().filter_map(RawSection::valid_weight).sum();
        if (total - 1.0).abs() > tolerance {
            issues.push(ValidationIssue::warning(
                "sections[*].weight",
                format!("weights sum to {total:.4}, will be normalized"),
            ));
        }
    }

    issues
}

fn validate_questions(section: &RawSection, at: &str, issues: &mut Vec<ValidationIssue>) {
    let mut ids = HashSet::new();
    for (j, question) in section.questions.iter().enumerate() {
        let qat = format!("{at}.questions[{j}]");
        match question {
            RawQuestion::PlainText(_) => {
                if section.options.as_ref().and_then(|o| o.for_question(j)).is_none() {
                    issues.push(ValidationIssue::warning(
                        qat,
                        "plain-text question without section-level options",
                    ));
                }
            }
            RawQuestion::Detailed(q) => {
                match q.id_text() {
                    None => {
                        issues.push(ValidationIssue::warning(format!("{qat}.id"), "missing id"));
                    }
                    Some(id) => {
                        if !ids.insert(id.clone()) {
                            issues.push(ValidationIssue::warning(
                                format!("{qat}.id"),
                                format!("duplicate question id '{id}'"),
                            ));
                        }
                    }
                }
                if q.text.as_deref().map_or(true, |t| t.trim().is_empty()) {
                    issues.push(ValidationIssue::warning(format!("{qat}.text"), "missing text"));
                }
                if q.options.is_none() {
                    issues.push(ValidationIssue::warning(
                        format!("{qat}.options"),
                        "missing options",
                    ));
                }
            }
        }
    }
}

/// Turn a raw document into a normalized questionnaire.
///
/// Returns `None` when the document has no sections at all.
#[must_use]
pub fn normalize(
    doc: RawQuestionnaire,
    regulation: &str,
    industry: &str,
    origin: QuestionnaireOrigin,
    tolerance: f64,
) -> Option<Questionnaire> {
    if doc.sections.is_empty() {
        tracing::warn!("Rule set {regulation}/{industry} has no sections");
        return None;
    }

    let weights = repair_weights(&doc.sections, tolerance, regulation, industry);
    let names = section_names(&doc.sections);

    let sections = doc
        .sections
        .into_iter()
        .zip(names)
        .zip(weights)
        .enumerate()
        .map(|(index, ((raw, name), weight))| Section {
            questions: normalize_questions(raw, &name),
            name,
            weight,
            index,
        })
        .collect();

    Some(Questionnaire {
        regulation: regulation.to_string(),
        industry: industry.to_string(),
        origin,
        sections,
        answer_points: doc.answer_points,
    })
}

/// Unique, non-empty section names in declared order.
fn section_names(sections: &[RawSection]) -> Vec<String> {
    let mut seen = HashSet::new();
    sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let base = s
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map_or_else(|| format!("Section {}", i + 1), str::to_string);
            let mut name = base.clone();
            let mut n = 2;
            while !seen.insert(name.clone()) {
                name = format!("{base} ({n})");
                n += 1;
            }
            if name != base {
                tracing::warn!("Duplicate section name '{base}' renamed to '{name}'");
            }
            name
        })
        .collect()
}

/// Section weights after repair.
///
/// Any missing or invalid weight means equal weights for all sections;
/// otherwise a total outside `1.0 ± tolerance` is scaled proportionally.
#[must_use]
pub fn repair_weights(
    sections: &[RawSection],
    tolerance: f64,
    regulation: &str,
    industry: &str,
) -> Vec<f64> {
    let count = sections.len();
    if count == 0 {
        return Vec::new();
    }

    let declared: Option<Vec<f64>> = sections.iter().map(RawSection::valid_weight).collect();
    let Some(weights) = declared else {
        tracing::warn!(
            "Rule set {regulation}/{industry}: invalid section weights, using equal weights"
        );
        return vec![1.0 / count as f64; count];
    };

    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() <= tolerance {
        return weights;
    }

    tracing::warn!(
        "Rule set {regulation}/{industry}: section weights sum to {total:.4}, normalizing"
    );
    weights.into_iter().map(|w| w / total).collect()
}

fn normalize_questions(raw: RawSection, section_name: &str) -> Vec<Question> {
    let legacy = raw.options;
    let mut ids = HashSet::new();

    raw.questions
        .into_iter()
        .enumerate()
        .map(|(j, question)| {
            let legacy_options = || {
                legacy
                    .as_ref()
                    .and_then(|o| o.for_question(j))
                    .map(<[String]>::to_vec)
                    .unwrap_or_default()
            };
            let mut q = match question {
                RawQuestion::PlainText(text) => {
                    Question::new(format!("q{}", j + 1), text, legacy_options())
                }
                RawQuestion::Detailed(d) => Question {
                    id: d.id_text().unwrap_or_else(|| format!("q{}", j + 1)),
                    text: d.text.clone().unwrap_or_default(),
                    options: d.options.clone().unwrap_or_else(legacy_options),
                    recommendations: d.recommendations,
                },
            };
            if !ids.insert(q.id.clone()) {
                let renamed = format!("{}-{}", q.id, j + 1);
                tracing::warn!(
                    "Section '{section_name}': duplicate question id '{}' renamed to '{renamed}'",
                    q.id
                );
                q.id = renamed;
                ids.insert(q.id.clone());
            }
            q
        })
        .collect()
}
