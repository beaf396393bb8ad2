//! Minimal questionnaires for selectors with no usable rule set.

use crate::model::{Question, Questionnaire, QuestionnaireOrigin, Section};

/// Answer options offered by synthesized sample questions.
pub const SAMPLE_OPTIONS: &[&str] = &[
    "Yes, fully compliant",
    "Partially compliant",
    "No, not compliant",
    "Not applicable",
];

/// Build a questionnaire with one sample question per section and equal
/// weights.
#[must_use]
pub fn synthesize(regulation: &str, industry: &str, section_names: &[String]) -> Questionnaire {
    tracing::warn!(
        "Using synthesized questionnaire for {regulation}/{industry} with {} sections",
        section_names.len()
    );
    let weight = if section_names.is_empty() {
        0.0
    } else {
        1.0 / section_names.len() as f64
    };
    let options: Vec<String> = SAMPLE_OPTIONS.iter().map(|o| (*o).to_string()).collect();

    let sections = section_names
        .iter()
        .enumerate()
        .map(|(index, name)| Section {
            name: name.clone(),
            weight,
            index,
            questions: vec![Question::new(
                "q1",
                format!("Sample question for {name}"),
                options.clone(),
            )],
        })
        .collect();

    Questionnaire {
        regulation: regulation.to_string(),
        industry: industry.to_string(),
        origin: QuestionnaireOrigin::Synthesized,
        sections,
        answer_points: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_weights_and_sample_questions() {
        let names = vec!["Data Collection".to_string(), "Data Processing".to_string()];
        let q = synthesize("GDPR", "retail", &names);
        assert_eq!(q.origin, QuestionnaireOrigin::Synthesized);
        assert_eq!(q.sections.len(), 2);
        assert!((q.total_weight() - 1.0).abs() < 1e-12);
        assert_eq!(q.sections[1].questions[0].text, "Sample question for Data Processing");
        assert_eq!(q.sections[1].questions[0].options.len(), 4);
    }
}
