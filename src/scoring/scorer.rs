//! Aggregate scoring: overall score, level, risk areas and priorities.

use super::corrections::Corrections;
use super::levels::ComplianceLevels;
use super::patches::{apply_patches, PointsPatch};
use super::points::builtin_table;
use super::section::score_section;
use crate::config::{EngineConfig, ScoringConfig};
use crate::error::Result;
use crate::model::{AnswerPoints, Progress, Questionnaire, ResponseMap, ScoreResult};
use crate::recommendations::{PriorityGroups, RecommendationContext, RecommendationResolver};
use indexmap::IndexMap;

/// Computes [`ScoreResult`]s for questionnaires.
///
/// Construction validates the correction rules; scoring itself never
/// fails and is deterministic for identical input.
#[derive(Debug)]
pub struct Scorer {
    corrections: Corrections,
    patches: Vec<PointsPatch>,
    levels: ComplianceLevels,
    high_risk_threshold: f64,
    improvement_threshold: f64,
    recommender: RecommendationResolver,
}

impl Scorer {
    /// Build a scorer from configuration.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let patches = if config.corrections.enabled {
            config.corrections.points_patches.clone()
        } else {
            Vec::new()
        };
        Ok(Self {
            corrections: Corrections::from_config(&config.corrections)?,
            patches,
            levels: ComplianceLevels::new(config.scoring.compliance_levels.clone()),
            high_risk_threshold: config.scoring.high_risk_threshold,
            improvement_threshold: config.scoring.improvement_threshold,
            recommender: RecommendationResolver::new(&config.scoring),
        })
    }

    /// Scorer with default thresholds and the standard correction chain.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&EngineConfig::default())
    }

    /// Replace the correction chain.
    #[must_use]
    pub fn with_corrections(mut self, corrections: Corrections) -> Self {
        self.corrections = corrections;
        self
    }

    /// Replace level thresholds and risk cut-offs.
    #[must_use]
    pub fn with_scoring(mut self, scoring: &ScoringConfig) -> Self {
        self.levels = ComplianceLevels::new(scoring.compliance_levels.clone());
        self.high_risk_threshold = scoring.high_risk_threshold;
        self.improvement_threshold = scoring.improvement_threshold;
        self.recommender = RecommendationResolver::new(scoring);
        self
    }

    #[must_use]
    pub fn levels(&self) -> &ComplianceLevels {
        &self.levels
    }

    #[must_use]
    pub fn recommender(&self) -> &RecommendationResolver {
        &self.recommender
    }

    /// Answer table used for `questionnaire`, patches applied.
    #[must_use]
    pub fn answer_table(&self, questionnaire: &Questionnaire) -> AnswerPoints {
        let mut table = match &questionnaire.answer_points {
            Some(table) if !table.is_empty() => table.clone(),
            _ => {
                tracing::debug!(
                    "No answer points in {}/{}, using built-in table",
                    questionnaire.regulation,
                    questionnaire.industry
                );
                builtin_table().clone()
            }
        };
        apply_patches(&mut table, &self.patches);
        table
    }

    /// Score every section and combine them into a result.
    #[must_use]
    pub fn calculate(&self, questionnaire: &Questionnaire, responses: &ResponseMap) -> ScoreResult {
        if responses.is_empty() {
            tracing::info!("No responses recorded, returning an empty result");
            return ScoreResult::empty(
                &questionnaire.regulation,
                &questionnaire.industry,
                self.levels.classify(0.0),
            );
        }

        let table = self.answer_table(questionnaire);
        let mut section_scores = IndexMap::with_capacity(questionnaire.sections.len());
        let mut section_details = IndexMap::with_capacity(questionnaire.sections.len());
        let mut weighted = 0.0;
        let mut total_weight = 0.0;

        for section in &questionnaire.sections {
            let outcome = score_section(section, responses, &table, &self.corrections);
            if let Some(score) = outcome.score {
                weighted += score * section.weight;
                total_weight += section.weight;
            }
            section_scores.insert(section.name.clone(), outcome.score);
            section_details.insert(section.name.clone(), outcome);
        }

        let overall_score = if total_weight > 0.0 {
            weighted / total_weight * 100.0
        } else {
            tracing::warn!("No section could be scored, overall score is 0");
            0.0
        };
        let compliance_level = self.levels.classify(overall_score / 100.0).to_string();

        let high_risk_areas = section_scores
            .iter()
            .filter_map(|(name, score)| {
                score
                    .filter(|s| *s < self.high_risk_threshold)
                    .map(|_| name.clone())
            })
            .collect();

        let mut priorities: Vec<(&String, f64)> = section_scores
            .iter()
            .filter_map(|(name, score)| {
                score
                    .filter(|s| *s < self.improvement_threshold)
                    .map(|s| (name, s))
            })
            .collect();
        priorities.sort_by(|a, b| a.1.total_cmp(&b.1));
        let improvement_priorities = priorities.into_iter().map(|(name, _)| name.clone()).collect();

        let recommendations = self
            .recommender
            .recommend(questionnaire, responses, &section_scores);

        tracing::info!(
            "{}/{}: overall {overall_score:.1}% ({compliance_level})",
            questionnaire.regulation,
            questionnaire.industry
        );

        ScoreResult {
            overall_score,
            compliance_level,
            section_scores,
            section_details,
            high_risk_areas,
            recommendations,
            improvement_priorities,
            regulation: questionnaire.regulation.clone(),
            industry: questionnaire.industry.clone(),
        }
    }

    /// Recommendations of `result` grouped by priority tier.
    #[must_use]
    pub fn prioritize(&self, result: &ScoreResult) -> PriorityGroups {
        self.recommender.group(result)
    }

    /// Which questions triggered which recommendations.
    #[must_use]
    pub fn recommendation_contexts(
        &self,
        questionnaire: &Questionnaire,
        responses: &ResponseMap,
    ) -> IndexMap<String, Vec<RecommendationContext>> {
        self.recommender.contexts(questionnaire, responses)
    }

    /// Answered/total progress for `questionnaire`.
    #[must_use]
    pub fn progress(&self, questionnaire: &Questionnaire, responses: &ResponseMap) -> Progress {
        Progress::compute(questionnaire, responses)
    }
}
