//! Single-section scoring.

use super::corrections::{CorrectionContext, Corrections, ScoredResponse};
use super::points::resolve_points;
use crate::model::{AnswerPoints, ResponseMap, Section, SectionOutcome};

/// Score one section.
///
/// Unanswered questions are skipped, excluded answers leave both numerator
/// and denominator, and a section with nothing countable is unscored. The
/// raw ratio then goes through `corrections`.
#[must_use]
pub fn score_section(
    section: &Section,
    responses: &ResponseMap,
    table: &AnswerPoints,
    corrections: &Corrections,
) -> SectionOutcome {
    let scored: Vec<ScoredResponse<'_>> = section
        .keyed_questions()
        .filter_map(|(key, _)| {
            let text = responses.get(key)?;
            Some(ScoredResponse {
                text,
                resolution: resolve_points(text, Some(table)),
            })
        })
        .collect();

    let mut total = 0.0;
    let mut answered = 0usize;
    let mut excluded = 0usize;
    let mut unresolved = 0usize;
    for response in &scored {
        if response.resolution.is_unresolved() {
            unresolved += 1;
        }
        match response.resolution.value.points() {
            Some(points) => {
                total += clamp_points(points, response.text);
                answered += 1;
            }
            None => excluded += 1,
        }
    }

    if answered == 0 {
        tracing::debug!("Section '{}' has no countable responses", section.name);
        return SectionOutcome::unscored(excluded);
    }

    let raw = total / answered as f64;
    let applied = corrections.apply(&CorrectionContext {
        section: &section.name,
        raw,
        responses: &scored,
        table,
    });
    tracing::debug!(
        "Section '{}': {total}/{answered} = {raw:.4}{}",
        section.name,
        applied.map_or_else(String::new, |a| format!(" -> {:.4}", a.score))
    );

    SectionOutcome {
        raw: Some(raw),
        score: Some(applied.map_or(raw, |a| a.score)),
        correction: applied.map(|a| a.rule.to_string()),
        answered,
        excluded,
        unresolved,
    }
}

/// Point values outside `[0, 1]` come from broken tables.
fn clamp_points(points: f64, response: &str) -> f64 {
    if points.is_finite() && (0.0..=1.0).contains(&points) {
        return points;
    }
    tracing::warn!("Point value {points} for '{response}' is out of range, clamping");
    if points.is_nan() {
        0.0
    } else {
        points.clamp(0.0, 1.0)
    }
}
