//! Property-based tests for scoring and rule-set repair.
//!
//! Ensures the scoring invariants hold across random questionnaires and
//! response sets.

use compliance_engine::config::CorrectionsConfig;
use compliance_engine::questionnaire::normalize::repair_weights;
use compliance_engine::questionnaire::RawSection;
use compliance_engine::{
    score_section, AnswerPoints, Corrections, Question, Questionnaire, QuestionnaireOrigin,
    ResponseKey, ResponseMap, Scorer, Section,
};
use proptest::prelude::*;

const ANSWERS: &[&str] = &[
    "Yes",
    "Yes - Successfully completed",
    "Partially completed",
    "In progress",
    "No",
    "No - Not yet completed",
    "Not applicable",
    "Yes, with full documentation",
    "Somewhat done",
];

fn raw_sections(weights: &[f64]) -> Vec<RawSection> {
    weights
        .iter()
        .map(|w| RawSection {
            weight: Some(serde_json::json!(w)),
            ..RawSection::default()
        })
        .collect()
}

fn section(index: usize, weight: f64, questions: usize) -> Section {
    Section {
        name: format!("Section {index}"),
        weight,
        index,
        questions: (0..questions)
            .map(|j| Question::new(format!("q{j}"), "?", vec![]))
            .collect(),
    }
}

fn questionnaire(shape: &[usize]) -> Questionnaire {
    let weight = 1.0 / shape.len() as f64;
    Questionnaire {
        regulation: "OAIC".to_string(),
        industry: "General".to_string(),
        origin: QuestionnaireOrigin::Synthesized,
        sections: shape
            .iter()
            .enumerate()
            .map(|(i, n)| section(i, weight, *n))
            .collect(),
        answer_points: None,
    }
}

/// Responses for a questionnaire shape: `None` leaves a question unanswered.
fn responses(shape: &[usize], picks: &[Option<usize>]) -> ResponseMap {
    let mut map = ResponseMap::new();
    let mut picks = picks.iter().cycle();
    for (s, n) in shape.iter().enumerate() {
        for q in 0..*n {
            if let Some(Some(pick)) = picks.next() {
                map = map.with(s, q, ANSWERS[pick % ANSWERS.len()]);
            }
        }
    }
    map
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn repaired_weights_sum_to_one(weights in prop::collection::vec(0.001f64..100.0, 1..12)) {
        let repaired = repair_weights(&raw_sections(&weights), 0.02, "T", "t");
        let total: f64 = repaired.iter().sum();
        let declared: f64 = weights.iter().sum();

        if (declared - 1.0).abs() <= 0.02 {
            prop_assert_eq!(&repaired, &weights);
        } else {
            prop_assert!((total - 1.0).abs() < 1e-6, "sum was {}", total);
            for (r, w) in repaired.iter().zip(&weights) {
                prop_assert!((r / repaired[0] - w / weights[0]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn invalid_weight_means_equal_weights(
        weights in prop::collection::vec(0.001f64..10.0, 1..8),
        bad in any::<prop::sample::Index>(),
    ) {
        let mut sections = raw_sections(&weights);
        let i = bad.index(sections.len());
        sections[i].weight = Some(serde_json::json!(-1.0));

        let repaired = repair_weights(&sections, 0.02, "T", "t");
        let expected = 1.0 / sections.len() as f64;
        prop_assert!(repaired.iter().all(|w| (w - expected).abs() < 1e-12));
    }

    #[test]
    fn excluded_answers_never_count(yes in 0usize..5, no in 0usize..5, na in 0usize..5) {
        let total = yes + no + na;
        prop_assume!(total > 0);
        let s = section(0, 1.0, total);
        let mut map = ResponseMap::new();
        for q in 0..total {
            let answer = if q < yes {
                "Yes"
            } else if q < yes + no {
                "No"
            } else {
                "Not applicable"
            };
            map = map.with(0, q, answer);
        }

        let outcome = score_section(&s, &map, &AnswerPoints::builtin(), &Corrections::none());
        prop_assert_eq!(outcome.answered, yes + no);
        prop_assert_eq!(outcome.excluded, na);
        if yes + no == 0 {
            prop_assert!(outcome.score.is_none());
        } else {
            let expected = yes as f64 / (yes + no) as f64;
            prop_assert!((outcome.score.unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn corrections_never_lower_a_score(
        shape in prop::collection::vec(1usize..6, 1..5),
        picks in prop::collection::vec(prop::option::of(0usize..ANSWERS.len()), 1..30),
    ) {
        let q = questionnaire(&shape);
        let map = responses(&shape, &picks);
        let corrections = Corrections::from_config(&CorrectionsConfig::default()).unwrap();
        let table = AnswerPoints::builtin();

        for s in &q.sections {
            let outcome = score_section(s, &map, &table, &corrections);
            if let (Some(raw), Some(score)) = (outcome.raw, outcome.score) {
                prop_assert!(score >= raw);
                prop_assert!((0.0..=1.0).contains(&score));
            }
        }
    }

    #[test]
    fn scoring_is_idempotent(
        shape in prop::collection::vec(1usize..6, 1..5),
        picks in prop::collection::vec(prop::option::of(0usize..ANSWERS.len()), 1..30),
    ) {
        let q = questionnaire(&shape);
        let map = responses(&shape, &picks);
        let scorer = Scorer::with_defaults().unwrap();

        let a = scorer.calculate(&q, &map);
        let b = scorer.calculate(&q, &map);
        prop_assert_eq!(a.overall_score.to_bits(), b.overall_score.to_bits());
        prop_assert_eq!(&a, &b);
        prop_assert!((0.0..=100.0).contains(&a.overall_score));

        // Unscored sections never reach risk lists or priorities
        for (name, score) in &a.section_scores {
            if score.is_none() {
                prop_assert!(!a.high_risk_areas.contains(name));
                prop_assert!(!a.improvement_priorities.contains(name));
            }
        }
    }

    #[test]
    fn response_key_round_trip(section in 0usize..1000, question in 0usize..1000) {
        let key = ResponseKey::new(section, question);
        let parsed: ResponseKey = key.to_string().parse().unwrap();
        prop_assert_eq!(parsed, key);
    }

    #[test]
    fn response_key_parse_doesnt_panic(s in "\\PC{0,40}") {
        if let Ok(key) = s.parse::<ResponseKey>() {
            prop_assert_eq!(key.to_string().parse::<ResponseKey>().unwrap(), key);
        }
    }
}
