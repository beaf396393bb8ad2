//! Assess command handler.
//!
//! Implements the `assess` subcommand: resolve a rule set, score a response
//! file against it and print the result.

use super::{exit_codes, use_color, write_output, OutputTarget};
use crate::config::{EngineConfig, OutputFormat};
use crate::engine::{Assessment, ComplianceEngine};
use crate::model::ResponseMap;
use crate::recommendations::{Priority, PriorityGroups};
use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;

/// Assess command configuration
#[derive(Debug, Clone)]
pub struct AssessConfig {
    pub regulation: String,
    pub industry: String,
    pub responses: PathBuf,
    /// Minimum overall score (0-100); below it the command exits with 1
    pub min_score: Option<f64>,
    /// Group recommendations by priority tier
    pub priorities: bool,
}

/// Run the assess command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_assess(args: &AssessConfig, config: &EngineConfig) -> Result<i32> {
    let responses = ResponseMap::from_json_file(&args.responses)
        .with_context(|| format!("Failed to load responses from {}", args.responses.display()))?;
    let engine = ComplianceEngine::from_config(config).context("Failed to set up the engine")?;

    tracing::info!(
        "Assessing {} responses against {}/{}",
        responses.len(),
        args.regulation,
        args.industry
    );
    let assessment = engine.assess(&args.regulation, &args.industry, &responses);
    let groups = args.priorities.then(|| engine.prioritize(&assessment));

    let target = OutputTarget::from_option(config.output.file.clone());
    let output_text = match config.output.format {
        OutputFormat::Json => format_assessment_json(&assessment, groups.as_ref())?,
        OutputFormat::Summary => format_assessment_summary(
            &assessment,
            groups.as_ref(),
            use_color(config.output.no_color, &target),
        ),
    };
    write_output(&output_text, &target)?;

    if let Some(threshold) = args.min_score {
        if assessment.result.overall_score < threshold {
            tracing::error!(
                "Compliance score {:.1} is below minimum threshold {threshold:.1}",
                assessment.result.overall_score
            );
            return Ok(exit_codes::BELOW_THRESHOLD);
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Format an assessment as JSON
fn format_assessment_json(
    assessment: &Assessment,
    groups: Option<&PriorityGroups>,
) -> Result<String> {
    let output = json!({
        "tool": "compliance-engine",
        "version": env!("CARGO_PKG_VERSION"),
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "questionnaire": assessment.origin(),
        "result": assessment.result,
        "progress": assessment.progress,
        "priorities": groups,
    });
    serde_json::to_string_pretty(&output).context("Failed to serialize assessment")
}

/// Format an assessment for terminal output
fn format_assessment_summary(
    assessment: &Assessment,
    groups: Option<&PriorityGroups>,
    use_color: bool,
) -> String {
    let result = &assessment.result;
    let mut lines = Vec::new();

    let (level_color, reset) = if use_color {
        let color = match result.overall_score {
            s if s >= 70.0 => "\x1b[32m",
            s if s >= 50.0 => "\x1b[33m",
            _ => "\x1b[31m",
        };
        (color, "\x1b[0m")
    } else {
        ("", "")
    };

    lines.push(format!(
        "Compliance Assessment: {} / {}",
        result.regulation, result.industry
    ));
    lines.push(format!("Rule set: {}", assessment.origin()));
    lines.push(format!(
        "Answered: {}/{} questions ({:.0}%)",
        assessment.progress.answered, assessment.progress.total, assessment.progress.percent
    ));
    lines.push(String::new());

    lines.push(format!(
        "Overall Score: {level_color}{:.1}/100 ({}){reset}",
        result.overall_score, result.compliance_level
    ));
    lines.push(String::new());

    if !result.section_scores.is_empty() {
        lines.push("Section Scores:".to_string());
        let width = result.section_scores.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        for (name, detail) in &result.section_details {
            let score = match detail.score {
                Some(score) => format!("{:.1}%", score * 100.0),
                None => "not scored".to_string(),
            };
            let note = detail
                .correction
                .as_ref()
                .map_or_else(String::new, |rule| format!("  [corrected: {rule}]"));
            lines.push(format!("  {name:<width$}  {score}{note}"));
        }
        lines.push(String::new());
    }

    if !result.high_risk_areas.is_empty() {
        lines.push("High-Risk Areas:".to_string());
        for area in &result.high_risk_areas {
            lines.push(format!("  - {area}"));
        }
        lines.push(String::new());
    }

    if !result.improvement_priorities.is_empty() {
        lines.push("Improvement Priorities:".to_string());
        for (i, area) in result.improvement_priorities.iter().enumerate() {
            lines.push(format!("  {}. {area}", i + 1));
        }
        lines.push(String::new());
    }

    match groups {
        Some(groups) if !groups.is_empty() => {
            for priority in [Priority::High, Priority::Medium, Priority::Low] {
                let tier = groups.tier(priority);
                if tier.is_empty() {
                    continue;
                }
                lines.push(format!("Recommendations ({priority} priority):"));
                for section in tier {
                    lines.push(format!("  {} ({:.1}%)", section.section, section.score));
                    for rec in &section.recommendations {
                        lines.push(format!("    - {rec}"));
                    }
                }
                lines.push(String::new());
            }
        }
        _ if !result.recommendations.is_empty() => {
            lines.push("Recommendations:".to_string());
            for (section, recs) in &result.recommendations {
                lines.push(format!("  {section}"));
                for rec in recs {
                    lines.push(format!("    - {rec}"));
                }
            }
            lines.push(String::new());
        }
        _ => {}
    }

    lines.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::MemorySource;

    const DOC: &str = r#"{"sections": [
        {"name": "Consent", "weight": 0.5, "questions": [
            {"id": "c1", "text": "Is consent recorded?", "options": ["Yes", "No"]}
        ]},
        {"name": "Security", "weight": 0.5, "questions": [
            {"id": "s1", "text": "Is data encrypted?", "options": ["Yes", "No"]}
        ]}
    ]}"#;

    fn assessment() -> (ComplianceEngine, Assessment) {
        let source = MemorySource::new().with_json("OAIC", "General", DOC).unwrap();
        let engine = ComplianceEngine::with_source(source, &EngineConfig::default()).unwrap();
        let responses = ResponseMap::new().with(0, 0, "Yes").with(1, 0, "No");
        let assessment = engine.assess("OAIC", "General", &responses);
        (engine, assessment)
    }

    #[test]
    fn test_summary_lists_sections_and_risks() {
        let (_, assessment) = assessment();
        let text = format_assessment_summary(&assessment, None, false);
        assert!(text.contains("Overall Score: 50.0/100 (Partially Compliant)"));
        assert!(text.contains("High-Risk Areas:\n  - Security"));
        assert!(text.contains("Improve security practices with comprehensive controls"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_summary_with_priorities() {
        let (engine, assessment) = assessment();
        let groups = engine.prioritize(&assessment);
        let text = format_assessment_summary(&assessment, Some(&groups), false);
        assert!(text.contains("Recommendations (high priority):"));
        assert!(text.contains("  Security (0.0%)"));
    }

    #[test]
    fn test_report_file_below_min_score() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("questionnaires");
        std::fs::create_dir_all(dir.join("OAIC")).unwrap();
        std::fs::write(dir.join("OAIC").join("General.json"), DOC).unwrap();
        let responses = tmp.path().join("answers.json");
        std::fs::write(&responses, r#"{"s0_q0": "Yes", "s1_q0": "No"}"#).unwrap();

        let mut config = EngineConfig::default();
        config.repository.questionnaire_dir = Some(dir);
        config.output.file = Some(tmp.path().join("report.txt"));
        let args = AssessConfig {
            regulation: "OAIC".to_string(),
            industry: "General".to_string(),
            responses,
            min_score: Some(70.0),
            priorities: false,
        };

        assert_eq!(run_assess(&args, &config).unwrap(), exit_codes::BELOW_THRESHOLD);
        let report = std::fs::read_to_string(tmp.path().join("report.txt")).unwrap();
        assert!(report.contains("Overall Score: 50.0/100"));
        assert!(!report.contains('\x1b'));
    }

    #[test]
    fn test_json_envelope() {
        let (_, assessment) = assessment();
        let text = format_assessment_json(&assessment, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tool"], "compliance-engine");
        assert_eq!(value["result"]["overall_score"], 50.0);
        assert_eq!(value["result"]["section_scores"]["Consent"], 1.0);
        assert!(value["priorities"].is_null());
    }
}
