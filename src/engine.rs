//! End-to-end assessment: resolve a rule set, score responses, report.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::{Progress, Questionnaire, ResponseMap, ScoreResult};
use crate::questionnaire::{QuestionnaireRepository, RuleSetSource};
use crate::recommendations::{PriorityGroups, RecommendationContext};
use crate::scoring::Scorer;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Everything computed for one `(regulation, industry, responses)` request.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    #[serde(skip)]
    pub questionnaire: Arc<Questionnaire>,
    pub result: ScoreResult,
    pub progress: Progress,
}

impl Assessment {
    /// Where the rule set came from, for display.
    #[must_use]
    pub fn origin(&self) -> String {
        self.questionnaire.origin.to_string()
    }
}

/// Repository plus scorer.
#[derive(Debug)]
pub struct ComplianceEngine {
    repository: QuestionnaireRepository,
    scorer: Scorer,
}

impl ComplianceEngine {
    #[must_use]
    pub fn new(repository: QuestionnaireRepository, scorer: Scorer) -> Self {
        Self { repository, scorer }
    }

    /// Directory-backed engine from configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(
            QuestionnaireRepository::from_config(&config.repository)?,
            Scorer::new(config)?,
        ))
    }

    /// Engine over any rule-set source.
    pub fn with_source(
        source: impl RuleSetSource + 'static,
        config: &EngineConfig,
    ) -> Result<Self> {
        Ok(Self::new(
            QuestionnaireRepository::new(source, config.repository.clone()),
            Scorer::new(config)?,
        ))
    }

    #[must_use]
    pub fn repository(&self) -> &QuestionnaireRepository {
        &self.repository
    }

    #[must_use]
    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Resolve the rule set for a selector, reloading once if the cached
    /// entry belongs to a different selector.
    pub fn questionnaire(&self, regulation: &str, industry: &str) -> Arc<Questionnaire> {
        let selector = self.repository.selector(regulation, industry);
        self.repository.resolve_verified(regulation, industry, |q| {
            q.regulation == selector.regulation
                && q.industry.eq_ignore_ascii_case(&selector.industry)
        })
    }

    /// Score `responses` against the rule set for `(regulation, industry)`.
    ///
    /// Never fails: missing rule sets fall back, unknown answers score 0.
    pub fn assess(&self, regulation: &str, industry: &str, responses: &ResponseMap) -> Assessment {
        let questionnaire = self.questionnaire(regulation, industry);
        let result = self.scorer.calculate(&questionnaire, responses);
        let progress = self.scorer.progress(&questionnaire, responses);
        Assessment {
            questionnaire,
            result,
            progress,
        }
    }

    /// Recommendations of an assessment grouped by priority.
    #[must_use]
    pub fn prioritize(&self, assessment: &Assessment) -> PriorityGroups {
        self.scorer.prioritize(&assessment.result)
    }

    /// Question-level recommendation triggers for an assessment.
    #[must_use]
    pub fn recommendation_contexts(
        &self,
        assessment: &Assessment,
        responses: &ResponseMap,
    ) -> IndexMap<String, Vec<RecommendationContext>> {
        self.scorer
            .recommendation_contexts(&assessment.questionnaire, responses)
    }

    /// Industries that can be requested for `regulation`.
    #[must_use]
    pub fn available_industries(&self, regulation: &str) -> Vec<String> {
        self.repository.available_industries(regulation)
    }

    /// Drop every cached rule set before the next resolve.
    pub fn request_invalidation(&self) {
        self.repository.request_invalidation();
    }
}
