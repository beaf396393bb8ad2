//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::{EngineConfig, OutputFormat};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".compliance-engine.yaml",
    ".compliance-engine.yml",
    "compliance-engine.yaml",
    "compliance-engine.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/compliance-engine/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    if let Some(config_dir) = user_config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir) {
            return Some(path);
        }
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// `~/.config/compliance-engine` (platform equivalent).
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("compliance-engine"))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `EngineConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<EngineConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (EngineConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (EngineConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (EngineConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

/// Settings given on the command line that override the file config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub questionnaire_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub no_color: bool,
    pub no_corrections: bool,
}

impl EngineConfig {
    /// Merge CLI overrides into this config; overrides win when set.
    pub fn merge(&mut self, overrides: &CliOverrides) {
        if overrides.questionnaire_dir.is_some() {
            self.repository
                .questionnaire_dir
                .clone_from(&overrides.questionnaire_dir);
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.output_file.is_some() {
            self.output.file.clone_from(&overrides.output_file);
        }
        if overrides.no_color {
            self.output.no_color = true;
        }
        if overrides.no_corrections {
            self.corrections.enabled = false;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &CliOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = EngineConfig::default();
    format!(
        r"# compliance-engine configuration
# Place this file at .compliance-engine.yaml in your project root
# or in ~/.config/compliance-engine/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".compliance-engine.yaml");
        std::fs::write(&config_path, "scoring:\n  high_risk_threshold: 0.5\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_partial_config_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let yaml = r#"
scoring:
  high_risk_threshold: 0.5
  compliance_levels:
    - threshold: 0.9
      label: Excellent
    - threshold: 0.0
      label: Poor
corrections:
  enabled: false
"#;
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!((config.scoring.high_risk_threshold - 0.5).abs() < f64::EPSILON);
        assert!((config.scoring.improvement_threshold - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.scoring.compliance_levels[0].label, "Excellent");
        assert!(!config.corrections.enabled);
        assert!(!config.repository.profiles.is_empty());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_yaml_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("broken.yaml");
        std::fs::write(&config_path, "scoring: [not, a, map").unwrap();

        let (config, loaded_from) = load_or_default(Some(&config_path));
        assert_eq!(config, EngineConfig::default());
        assert!(loaded_from.is_none());
    }

    #[test]
    fn test_merge_overrides() {
        let mut config = EngineConfig::default();
        config.merge(&CliOverrides {
            questionnaire_dir: Some(PathBuf::from("/rules")),
            format: Some(OutputFormat::Json),
            no_corrections: true,
            ..CliOverrides::default()
        });

        assert_eq!(config.repository.questionnaire_dir, Some(PathBuf::from("/rules")));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.corrections.enabled);
        assert!(!config.output.no_color);
    }

    #[test]
    fn test_example_config_round_trips() {
        let example = generate_example_config();
        assert!(example.contains("weight_tolerance"));
        let parsed: EngineConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }
}
