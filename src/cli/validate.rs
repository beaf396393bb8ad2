//! Validate command handler.
//!
//! Implements the `validate` subcommand: a structural report for one
//! rule-set document.

use super::{exit_codes, use_color, write_output, OutputTarget};
use crate::config::{EngineConfig, OutputFormat};
use crate::questionnaire::normalize::validate;
use crate::questionnaire::{IssueSeverity, RawQuestionnaire, ValidationIssue};
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

/// Run the validate command, returning the desired exit code.
///
/// Exits with 1 when the document has errors; warnings are repaired at
/// load time and do not fail the command.
pub fn run_validate(path: &Path, config: &EngineConfig) -> Result<i32> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = RawQuestionnaire::from_json(&text, &path.display().to_string())?;
    let issues = validate(&doc, config.repository.weight_tolerance);

    let errors = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count();
    tracing::debug!("{} issues in {} ({errors} errors)", issues.len(), path.display());

    let target = OutputTarget::from_option(config.output.file.clone());
    let output_text = match config.output.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "file": path.display().to_string(),
            "sections": doc.sections.len(),
            "valid": errors == 0,
            "issues": issues,
        }))
        .context("Failed to serialize validation report")?,
        OutputFormat::Summary => {
            format_issues(path, &issues, use_color(config.output.no_color, &target))
        }
    };
    write_output(&output_text, &target)?;

    Ok(if errors > 0 {
        exit_codes::BELOW_THRESHOLD
    } else {
        exit_codes::SUCCESS
    })
}

fn format_issues(path: &Path, issues: &[ValidationIssue], use_color: bool) -> String {
    let (red, yellow, green, reset) = if use_color {
        ("\x1b[31m", "\x1b[33m", "\x1b[32m", "\x1b[0m")
    } else {
        ("", "", "", "")
    };

    if issues.is_empty() {
        return format!("{}: {green}OK{reset}", path.display());
    }

    let mut lines = vec![format!("{}: {} issue(s)", path.display(), issues.len())];
    for issue in issues {
        let color = match issue.severity {
            IssueSeverity::Error => red,
            IssueSeverity::Warning => yellow,
        };
        lines.push(format!("  {color}{issue}{reset}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_document_exits_zero() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("General.json");
        std::fs::write(
            &path,
            r#"{"sections": [{"name": "A", "weight": 1.0, "questions": [
                {"id": "q1", "text": "?", "options": ["Yes", "No"]}
            ]}]}"#,
        )
        .unwrap();
        let mut config = EngineConfig::default();
        config.output.file = Some(tmp.path().join("report.txt"));

        assert_eq!(run_validate(&path, &config).unwrap(), exit_codes::SUCCESS);
        let report = std::fs::read_to_string(tmp.path().join("report.txt")).unwrap();
        assert!(report.ends_with("OK"));
        assert!(!report.contains('\x1b'));
    }

    #[test]
    fn test_empty_document_exits_one() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Empty.json");
        std::fs::write(&path, r#"{"sections": []}"#).unwrap();
        let mut config = EngineConfig::default();
        config.output.format = OutputFormat::Json;
        config.output.file = Some(tmp.path().join("report.json"));

        assert_eq!(run_validate(&path, &config).unwrap(), exit_codes::BELOW_THRESHOLD);
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(tmp.path().join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["valid"], false);
        assert_eq!(report["issues"][0]["severity"], "error");
    }

    #[test]
    fn test_unparseable_document_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Broken.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(run_validate(&path, &EngineConfig::default()).is_err());
    }
}
