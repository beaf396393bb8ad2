use super::{Priority, PriorityGroups, PrioritizedSection, RecommendationContext};
use crate::config::{ScoringConfig, DEFAULT_HIGH_RISK_THRESHOLD, DEFAULT_IMPROVEMENT_THRESHOLD};
use crate::model::{Question, Questionnaire, ResponseMap, ScoreResult};
use indexmap::IndexMap;

/// Longest question text kept in a [`RecommendationContext`].
pub const MAX_QUESTION_TEXT: usize = 100;

/// Lowercase, trim and drop punctuation.
#[must_use]
pub fn normalize_for_match(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Maps section scores and responses to recommendations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationResolver {
    high_risk_threshold: f64,
    improvement_threshold: f64,
}

impl Default for RecommendationResolver {
    fn default() -> Self {
        Self {
            high_risk_threshold: DEFAULT_HIGH_RISK_THRESHOLD,
            improvement_threshold: DEFAULT_IMPROVEMENT_THRESHOLD,
        }
    }
}

impl RecommendationResolver {
    #[must_use]
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            high_risk_threshold: config.high_risk_threshold,
            improvement_threshold: config.improvement_threshold,
        }
    }

    /// Priority tier for a section score.
    #[must_use]
    pub fn priority(&self, score: f64) -> Priority {
        if score < self.high_risk_threshold {
            Priority::High
        } else if score < self.improvement_threshold {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Recommendations per scored section, in declared section order.
    ///
    /// Unscored sections get nothing. Sections with no matched
    /// question-level recommendation fall back to generic advice for
    /// their tier; low-priority sections have none.
    #[must_use]
    pub fn recommend(
        &self,
        questionnaire: &Questionnaire,
        responses: &ResponseMap,
        section_scores: &IndexMap<String, Option<f64>>,
    ) -> IndexMap<String, Vec<String>> {
        let mut result = IndexMap::new();

        for section in &questionnaire.sections {
            let Some(score) = section_scores.get(&section.name).copied().flatten() else {
                continue;
            };

            let mut recommendations: Vec<String> = Vec::new();
            for (key, question) in section.keyed_questions() {
                let Some(response) = responses.get(key) else {
                    continue;
                };
                if let Some(rec) = matching_recommendation(question, response) {
                    if !recommendations.iter().any(|r| r == rec) {
                        recommendations.push(rec.to_string());
                    }
                }
            }

            if recommendations.is_empty() {
                recommendations = self.generic(&section.name, score);
            }
            if !recommendations.is_empty() {
                result.insert(section.name.clone(), recommendations);
            }
        }

        result
    }

    /// Generic advice for a section without specific recommendations.
    #[must_use]
    pub fn generic(&self, section: &str, score: f64) -> Vec<String> {
        let name = section.to_lowercase();
        match self.priority(score) {
            Priority::High => vec![
                format!("Improve {name} practices with comprehensive controls"),
                format!("Develop formal policies for {name}"),
            ],
            Priority::Medium => vec![
                format!("Review and strengthen {name} controls"),
                format!("Enhance existing {name} practices"),
            ],
            Priority::Low => Vec::new(),
        }
    }

    /// Every question-level recommendation triggered by the responses,
    /// with the question and response that triggered it.
    #[must_use]
    pub fn contexts(
        &self,
        questionnaire: &Questionnaire,
        responses: &ResponseMap,
    ) -> IndexMap<String, Vec<RecommendationContext>> {
        let mut result = IndexMap::new();
        for section in &questionnaire.sections {
            let mut contexts = Vec::new();
            for (key, question) in section.keyed_questions() {
                let Some(response) = responses.get(key) else {
                    continue;
                };
                if let Some(rec) = matching_recommendation(question, response) {
                    contexts.push(RecommendationContext {
                        section: section.name.clone(),
                        question_id: question.id.clone(),
                        question_text: truncate(&question.text),
                        response: response.to_string(),
                        recommendation: rec.to_string(),
                    });
                }
            }
            if !contexts.is_empty() {
                result.insert(section.name.clone(), contexts);
            }
        }
        result
    }

    /// Group a result's recommendations by priority tier.
    #[must_use]
    pub fn group(&self, result: &ScoreResult) -> PriorityGroups {
        let mut groups = PriorityGroups::default();
        for (section, score) in result.scored_sections() {
            let Some(recommendations) = result.recommendations.get(section) else {
                continue;
            };
            if recommendations.is_empty() {
                continue;
            }
            groups.tier_mut(self.priority(score)).push(PrioritizedSection {
                section: section.to_string(),
                score: score * 100.0,
                recommendations: recommendations.clone(),
            });
        }
        groups
    }
}

/// Recommendation of `question` triggered by `response`.
///
/// An exact key wins; otherwise the first key, in declared order, whose
/// normalized form contains or is contained in the normalized response.
fn matching_recommendation<'q>(question: &'q Question, response: &str) -> Option<&'q str> {
    if question.recommendations.is_empty() {
        return None;
    }
    if let Some(rec) = question.recommendations.get(response) {
        return Some(rec.as_str());
    }

    let response = normalize_for_match(response);
    if response.is_empty() {
        return None;
    }
    question
        .recommendations
        .iter()
        .find(|(key, _)| {
            let key = normalize_for_match(key);
            !key.is_empty() && (key.contains(&response) || response.contains(&key))
        })
        .map(|(_, rec)| rec.as_str())
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_QUESTION_TEXT {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_QUESTION_TEXT - 3).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionnaireOrigin, Section};

    fn questionnaire() -> Questionnaire {
        let consent = Question::new("c1", "Do you record consent?", vec![])
            .with_recommendation("No", "Implement a consent register")
            .with_recommendation(
                "Partially, for some channels.",
                "Extend consent capture to all channels",
            );
        let retention = Question::new("r1", "x".repeat(150), vec![])
            .with_recommendation("No", "Define retention periods");
        Questionnaire {
            regulation: "DPDP".to_string(),
            industry: "E-commerce".to_string(),
            origin: QuestionnaireOrigin::Synthesized,
            sections: vec![
                Section {
                    name: "Consent".to_string(),
                    weight: 0.5,
                    index: 0,
                    questions: vec![consent.clone(), consent],
                },
                Section {
                    name: "Data Retention".to_string(),
                    weight: 0.3,
                    index: 1,
                    questions: vec![retention],
                },
                Section {
                    name: "Security".to_string(),
                    weight: 0.2,
                    index: 2,
                    questions: vec![Question::new("s1", "Encrypted?", vec![])],
                },
            ],
            answer_points: None,
        }
    }

    fn scores(values: &[(&str, Option<f64>)]) -> IndexMap<String, Option<f64>> {
        values.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_priority_tiers() {
        let r = RecommendationResolver::default();
        assert_eq!(r.priority(0.59), Priority::High);
        assert_eq!(r.priority(0.6), Priority::Medium);
        assert_eq!(r.priority(0.74), Priority::Medium);
        assert_eq!(r.priority(0.75), Priority::Low);
    }

    #[test]
    fn test_exact_match_and_dedup() {
        let r = RecommendationResolver::default();
        let responses = ResponseMap::new().with(0, 0, "No").with(0, 1, "No");
        let recs = r.recommend(
            &questionnaire(),
            &responses,
            &scores(&[("Consent", Some(0.0)), ("Data Retention", None), ("Security", None)]),
        );
        assert_eq!(recs["Consent"], vec!["Implement a consent register"]);
        assert!(!recs.contains_key("Data Retention"));
    }

    #[test]
    fn test_normalized_match() {
        let r = RecommendationResolver::default();
        let responses = ResponseMap::new().with(0, 0, "partially for some channels");
        let recs = r.recommend(&questionnaire(), &responses, &scores(&[("Consent", Some(0.5))]));
        assert_eq!(recs["Consent"], vec!["Extend consent capture to all channels"]);
    }

    #[test]
    fn test_first_matching_key_wins() {
        let rollout = Question::new("p1", "Is the programme rolled out?", vec![])
            .with_recommendation("Yes, partially", "Finish the rollout")
            .with_recommendation("No", "Start a programme");
        let q = Questionnaire {
            sections: vec![Section {
                name: "Programme".to_string(),
                weight: 1.0,
                index: 0,
                questions: vec![rollout],
            }],
            ..questionnaire()
        };
        let responses = ResponseMap::new().with(0, 0, "Yes, partially. Not everywhere");

        let r = RecommendationResolver::default();
        let recs = r.recommend(&q, &responses, &scores(&[("Programme", Some(0.5))]));
        assert_eq!(recs["Programme"], vec!["Finish the rollout"]);
        assert_eq!(r.contexts(&q, &responses)["Programme"].len(), 1);
    }

    #[test]
    fn test_generic_by_tier() {
        let r = RecommendationResolver::default();
        let responses = ResponseMap::new().with(2, 0, "Partially");
        let q = questionnaire();

        let recs = r.recommend(&q, &responses, &scores(&[("Security", Some(0.5))]));
        assert_eq!(
            recs["Security"],
            vec![
                "Improve security practices with comprehensive controls",
                "Develop formal policies for security"
            ]
        );

        let recs = r.recommend(&q, &responses, &scores(&[("Security", Some(0.7))]));
        assert_eq!(recs["Security"][0], "Review and strengthen security controls");

        let recs = r.recommend(&q, &responses, &scores(&[("Security", Some(0.9))]));
        assert!(recs.is_empty());
    }

    #[test]
    fn test_contexts_truncate_question_text() {
        let r = RecommendationResolver::default();
        let responses = ResponseMap::new().with(1, 0, "No");
        let contexts = r.contexts(&questionnaire(), &responses);
        let ctx = &contexts["Data Retention"][0];
        assert_eq!(ctx.question_text.chars().count(), MAX_QUESTION_TEXT);
        assert!(ctx.question_text.ends_with("..."));
        assert_eq!(ctx.recommendation, "Define retention periods");
        assert_eq!(ctx.question_id, "r1");
    }

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(normalize_for_match("  Yes, Fully.  "), "yes fully");
        assert_eq!(normalize_for_match("..."), "");
    }
}
