//! Compliance level classification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One step of the compliance ladder: scores at or above `threshold` earn
/// `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceThreshold {
    /// Minimum score in `[0, 1]`
    pub threshold: f64,
    pub label: String,
}

impl ComplianceThreshold {
    pub fn new(threshold: f64, label: impl Into<String>) -> Self {
        Self {
            threshold,
            label: label.into(),
        }
    }
}

/// Label for scores below every configured threshold.
pub const NON_COMPLIANT: &str = "Non-Compliant";

/// Default ladder.
#[must_use]
pub fn default_levels() -> Vec<ComplianceThreshold> {
    vec![
        ComplianceThreshold::new(0.85, "Highly Compliant"),
        ComplianceThreshold::new(0.70, "Substantially Compliant"),
        ComplianceThreshold::new(0.50, "Partially Compliant"),
        ComplianceThreshold::new(0.0, NON_COMPLIANT),
    ]
}

/// Threshold ladder sorted highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceLevels {
    ladder: Vec<ComplianceThreshold>,
}

impl ComplianceLevels {
    /// Build a ladder from thresholds in any order.
    #[must_use]
    pub fn new(mut thresholds: Vec<ComplianceThreshold>) -> Self {
        thresholds.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        Self { ladder: thresholds }
    }

    /// Label for `score` (a ratio in `[0, 1]`).
    ///
    /// The first threshold met wins; below all of them the score is
    /// [`NON_COMPLIANT`].
    #[must_use]
    pub fn classify(&self, score: f64) -> &str {
        self.ladder
            .iter()
            .find(|level| score >= level.threshold)
            .map_or(NON_COMPLIANT, |level| level.label.as_str())
    }

    /// Label of the lowest step.
    #[must_use]
    pub fn lowest(&self) -> &str {
        self.ladder
            .last()
            .map_or(NON_COMPLIANT, |level| level.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplianceThreshold> {
        self.ladder.iter()
    }
}

impl Default for ComplianceLevels {
    fn default() -> Self {
        Self::new(default_levels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ladder() {
        let levels = ComplianceLevels::default();
        assert_eq!(levels.classify(1.0), "Highly Compliant");
        assert_eq!(levels.classify(0.85), "Highly Compliant");
        assert_eq!(levels.classify(0.7), "Substantially Compliant");
        assert_eq!(levels.classify(0.5), "Partially Compliant");
        assert_eq!(levels.classify(0.49), "Non-Compliant");
        assert_eq!(levels.lowest(), "Non-Compliant");
    }

    #[test]
    fn test_unsorted_thresholds_are_sorted() {
        let levels = ComplianceLevels::new(vec![
            ComplianceThreshold::new(0.3, "Low"),
            ComplianceThreshold::new(0.9, "Top"),
        ]);
        assert_eq!(levels.classify(0.95), "Top");
        assert_eq!(levels.classify(0.5), "Low");
        assert_eq!(levels.classify(0.1), NON_COMPLIANT);
    }

    #[test]
    fn test_ladder_without_zero_step() {
        let levels = ComplianceLevels::new(vec![
            ComplianceThreshold::new(0.9, "Top"),
            ComplianceThreshold::new(0.3, "Low"),
        ]);
        assert_eq!(levels.classify(0.3), "Low");
        assert_eq!(levels.classify(0.0), NON_COMPLIANT);
    }

    #[test]
    fn test_empty_ladder() {
        let levels = ComplianceLevels::new(Vec::new());
        assert_eq!(levels.classify(0.99), NON_COMPLIANT);
    }
}
