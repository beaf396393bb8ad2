//! Industries command handler.

use super::{write_output, OutputTarget};
use crate::config::{EngineConfig, OutputFormat};
use crate::questionnaire::QuestionnaireRepository;
use anyhow::{Context, Result};
use serde_json::json;

/// List the industries that can be requested for `regulation`.
pub fn run_industries(regulation: &str, config: &EngineConfig) -> Result<()> {
    let repository = QuestionnaireRepository::from_config(&config.repository)
        .context("Failed to open the questionnaire directory")?;
    let canonical = repository.canonical_regulation(regulation);
    let industries = repository.available_industries(regulation);

    let output_text = match config.output.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "regulation": canonical,
            "industries": industries,
        }))
        .context("Failed to serialize industries")?,
        OutputFormat::Summary => {
            let mut lines = vec![format!("Industries for {canonical}:")];
            lines.extend(industries.iter().map(|i| format!("  {i}")));
            lines.join("\n")
        }
    };
    write_output(&output_text, &OutputTarget::from_option(config.output.file.clone()))
}
