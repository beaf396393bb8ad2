//! Assessment progress (how much of a questionnaire has been answered).

use super::{Questionnaire, ResponseMap};
use serde::{Deserialize, Serialize};

/// Answered/total counts for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProgress {
    pub name: String,
    pub answered: usize,
    pub total: usize,
    pub percent: f64,
}

/// Answered/total counts for a whole questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    /// Percentage answered, capped at 100
    pub percent: f64,
    pub sections: Vec<SectionProgress>,
}

impl Progress {
    /// Count answers that address a question of `questionnaire`.
    ///
    /// Responses keyed to questions that do not exist are ignored, so stale
    /// answers from another rule set never push progress past 100%.
    #[must_use]
    pub fn compute(questionnaire: &Questionnaire, responses: &ResponseMap) -> Self {
        let sections: Vec<SectionProgress> = questionnaire
            .sections
            .iter()
            .map(|section| {
                let total = section.questions.len();
                let answered = section
                    .keyed_questions()
                    .filter(|(key, _)| responses.get(*key).is_some())
                    .count();
                SectionProgress {
                    name: section.name.clone(),
                    answered,
                    total,
                    percent: percent(answered, total),
                }
            })
            .collect();

        let answered = sections.iter().map(|s| s.answered).sum();
        let total = sections.iter().map(|s| s.total).sum();
        Self {
            answered,
            total,
            percent: percent(answered, total),
            sections,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.answered >= self.total
    }
}

fn percent(answered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (answered as f64 / total as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionnaireOrigin, Section};

    fn questionnaire() -> Questionnaire {
        let q = |id: &str| Question::new(id, id, vec![]);
        Questionnaire {
            regulation: "OAIC".to_string(),
            industry: "General".to_string(),
            origin: QuestionnaireOrigin::Synthesized,
            sections: vec![
                Section {
                    name: "A".to_string(),
                    weight: 0.5,
                    index: 0,
                    questions: vec![q("a1"), q("a2")],
                },
                Section {
                    name: "B".to_string(),
                    weight: 0.5,
                    index: 1,
                    questions: vec![q("b1"), q("b2")],
                },
            ],
            answer_points: None,
        }
    }

    #[test]
    fn test_progress_counts_known_questions_only() {
        let responses = ResponseMap::new()
            .with(0, 0, "Yes")
            .with(0, 1, "No")
            .with(1, 0, "Yes")
            .with(5, 0, "Yes");
        let progress = Progress::compute(&questionnaire(), &responses);
        assert_eq!(progress.answered, 3);
        assert_eq!(progress.total, 4);
        assert!((progress.percent - 75.0).abs() < 1e-9);
        assert!((progress.sections[0].percent - 100.0).abs() < 1e-9);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_empty_questionnaire_is_zero_percent() {
        let mut q = questionnaire();
        q.sections.clear();
        let progress = Progress::compute(&q, &ResponseMap::new());
        assert_eq!(progress.percent, 0.0);
        assert!(!progress.is_complete());
    }
}
