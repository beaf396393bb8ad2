//! Named overrides applied to answer tables before scoring.
//!
//! Some shipped rule sets carry known bad entries in their `answer_points`
//! table. A patch names the answer, the value it is expected to have when
//! broken and the value to use instead.

use crate::model::{AnswerPoints, PointValue};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single answer-table override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PointsPatch {
    /// Short identifier used in logs
    pub name: String,
    /// Exact answer text in the table
    pub answer: String,
    /// Only patch when the current value equals this (any value when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,
    /// Replacement point value
    pub points: f64,
}

impl PointsPatch {
    /// Apply to `table`; returns `true` if the table changed.
    pub fn apply(&self, table: &mut AnswerPoints) -> bool {
        let Some(current) = table.get(&self.answer) else {
            return false;
        };
        let applies = match (self.expected, current) {
            (None, _) => true,
            (Some(expected), PointValue::Points(p)) => (p - expected).abs() < f64::EPSILON,
            (Some(_), PointValue::Excluded) => false,
        };
        if !applies || current == PointValue::Points(self.points) {
            return false;
        }
        tracing::warn!(
            "Patching answer points ({}): '{}' {:?} -> {}",
            self.name,
            self.answer,
            current.points(),
            self.points
        );
        table.insert(self.answer.clone(), PointValue::Points(self.points));
        true
    }
}

/// Apply every patch in order; returns the number that changed the table.
pub fn apply_patches(table: &mut AnswerPoints, patches: &[PointsPatch]) -> usize {
    patches.iter().filter(|patch| patch.apply(table)).count()
}

/// Patches for known data-quality problems in the shipped rule sets.
#[must_use]
pub fn builtin_patches() -> Vec<PointsPatch> {
    vec![PointsPatch {
        name: "dpdp-notice-languages".to_string(),
        answer: "Notices are provided in English and all 22 official Indian languages \
                 listed in the Eighth Schedule of the Constitution."
            .to_string(),
        expected: Some(0.0),
        points: 1.0,
    }]
}
