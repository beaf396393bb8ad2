//! Section score corrections.
//!
//! Some shipped rule sets under-score sections whose answers are all fully
//! compliant. A correction inspects a section's raw score and responses and
//! may replace the score with a higher one. Corrections run only when the
//! raw score is below 1.0, in registration order, and the first one that
//! applies wins.

use super::points::Resolution;
use crate::config::CorrectionsConfig;
use crate::error::{EngineError, Result};
use crate::model::{AnswerPoints, PointValue};
use regex::RegexSet;

/// One scored response of a section.
#[derive(Debug, Clone, Copy)]
pub struct ScoredResponse<'a> {
    pub text: &'a str,
    pub resolution: Resolution,
}

/// What a correction rule gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionContext<'a> {
    pub section: &'a str,
    /// Raw score, always below 1.0 here
    pub raw: f64,
    /// Every present response of the section, excluded ones included
    pub responses: &'a [ScoredResponse<'a>],
    /// Answer table the responses were scored against
    pub table: &'a AnswerPoints,
}

impl<'a> CorrectionContext<'a> {
    /// Responses that count toward the section denominator.
    pub fn answered(&self) -> impl Iterator<Item = &ScoredResponse<'a>> {
        self.responses
            .iter()
            .filter(|r| !r.resolution.value.is_excluded())
    }
}

/// A named score-correction rule.
pub trait ScoreCorrection: Send + Sync {
    /// Identifier reported in section details.
    fn name(&self) -> &'static str;

    /// Corrected score, or `None` if the rule does not apply.
    fn apply(&self, ctx: &CorrectionContext<'_>) -> Option<f64>;
}

// ============================================================================
// Rules
// ============================================================================

/// Every answered response is worth exactly 1.0 in the answer table.
///
/// [`score_section`](super::score_section) resolves points from the same
/// table, so there this rule never fires. It covers callers that build
/// [`ScoredResponse`]s with points from elsewhere and run the chain
/// through [`Corrections::apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AllFullPoints;

impl ScoreCorrection for AllFullPoints {
    fn name(&self) -> &'static str {
        "all-full-points"
    }

    fn apply(&self, ctx: &CorrectionContext<'_>) -> Option<f64> {
        let mut answered = ctx.answered().peekable();
        answered.peek()?;
        answered
            .all(|r| ctx.table.get(r.text) == Some(PointValue::Points(1.0)))
            .then_some(1.0)
    }
}

/// Every response contains a full-compliance phrase.
#[derive(Debug, Clone)]
pub struct FullCompliancePhrases {
    phrases: RegexSet,
}

impl FullCompliancePhrases {
    /// Compile the phrases as case-insensitive literals.
    pub fn new<I, S>(phrases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = phrases
            .into_iter()
            .map(|p| format!("(?i){}", regex::escape(p.as_ref())))
            .collect();
        let phrases = RegexSet::new(&patterns)
            .map_err(|e| EngineError::config(format!("invalid full-compliance phrase: {e}")))?;
        Ok(Self { phrases })
    }

    #[must_use]
    pub fn is_full_compliance(&self, response: &str) -> bool {
        self.phrases.is_match(response)
    }
}

impl ScoreCorrection for FullCompliancePhrases {
    fn name(&self) -> &'static str {
        "full-compliance-phrases"
    }

    fn apply(&self, ctx: &CorrectionContext<'_>) -> Option<f64> {
        if ctx.responses.is_empty() || self.phrases.is_empty() {
            return None;
        }
        ctx.responses
            .iter()
            .all(|r| self.is_full_compliance(r.text))
            .then_some(1.0)
    }
}

/// Raw scores just under 1.0 are treated as rounding error.
#[derive(Debug, Clone, Copy)]
pub struct PrecisionFloor {
    pub floor: f64,
}

impl ScoreCorrection for PrecisionFloor {
    fn name(&self) -> &'static str {
        "precision-floor"
    }

    fn apply(&self, ctx: &CorrectionContext<'_>) -> Option<f64> {
        (ctx.raw >= self.floor && ctx.raw < 1.0).then_some(1.0)
    }
}

// ============================================================================
// Rule chain
// ============================================================================

/// An applied correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    pub rule: &'static str,
    pub score: f64,
}

/// Ordered list of correction rules.
#[derive(Default)]
pub struct Corrections {
    rules: Vec<Box<dyn ScoreCorrection>>,
}

impl std::fmt::Debug for Corrections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

impl Corrections {
    /// No corrections at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// The standard chain: all-full-points, full-compliance phrases,
    /// precision floor.
    pub fn from_config(config: &CorrectionsConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::none());
        }
        Ok(Self::none()
            .with(AllFullPoints)
            .with(FullCompliancePhrases::new(&config.full_compliance_patterns)?)
            .with(PrecisionFloor {
                floor: config.precision_floor,
            }))
    }

    /// Append a rule.
    #[must_use]
    pub fn with(mut self, rule: impl ScoreCorrection + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Names of the registered rules, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    /// Run the chain; `None` when the raw score stands.
    ///
    /// A rule never lowers a score: results below the raw score are
    /// ignored.
    #[must_use]
    pub fn apply(&self, ctx: &CorrectionContext<'_>) -> Option<Applied> {
        if ctx.raw >= 1.0 {
            return None;
        }
        self.rules.iter().find_map(|rule| {
            let score = rule.apply(ctx)?;
            (score > ctx.raw).then(|| {
                tracing::info!(
                    "Correcting section '{}' score from {:.4} to {:.4} ({})",
                    ctx.section,
                    ctx.raw,
                    score,
                    rule.name()
                );
                Applied {
                    rule: rule.name(),
                    score: score.min(1.0),
                }
            })
        })
    }
}
