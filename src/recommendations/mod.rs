//! Recommendation resolution.
//!
//! Turns section scores and the responses behind them into recommendation
//! text. Question-level recommendations come from the rule set; sections
//! without any get generic advice by score tier.

mod resolver;

pub use resolver::{normalize_for_match, RecommendationResolver, MAX_QUESTION_TEXT};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency of a section's recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which question and response produced a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub section: String,
    pub question_id: String,
    /// Question text, shortened to at most [`MAX_QUESTION_TEXT`] characters
    pub question_text: String,
    pub response: String,
    pub recommendation: String,
}

/// A section's recommendations with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedSection {
    pub section: String,
    /// Section score as a percentage
    pub score: f64,
    pub recommendations: Vec<String>,
}

/// Recommendations grouped by priority tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityGroups {
    pub high: Vec<PrioritizedSection>,
    pub medium: Vec<PrioritizedSection>,
    pub low: Vec<PrioritizedSection>,
}

impl PriorityGroups {
    pub fn tier(&self, priority: Priority) -> &[PrioritizedSection] {
        match priority {
            Priority::High => &self.high,
            Priority::Medium => &self.medium,
            Priority::Low => &self.low,
        }
    }

    fn tier_mut(&mut self, priority: Priority) -> &mut Vec<PrioritizedSection> {
        match priority {
            Priority::High => &mut self.high,
            Priority::Medium => &mut self.medium,
            Priority::Low => &mut self.low,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }
}
