//! Rule-set storage backends.
//!
//! A source maps `(regulation, document name)` to a raw document. The
//! reference layout on disk is `<root>/<REGULATION>/<document>.json`.

use super::document::RawQuestionnaire;
use crate::error::{DocumentErrorKind, EngineError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Storage of rule-set documents.
pub trait RuleSetSource: Send + Sync {
    /// Document names available for a regulation, sorted.
    ///
    /// `Ok(None)` means the source has no collection for the regulation.
    fn list(&self, regulation: &str) -> Result<Option<Vec<String>>>;

    /// Load one document; `Ok(None)` when it does not exist.
    fn load(&self, regulation: &str, name: &str) -> Result<Option<RawQuestionnaire>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Reject names that could escape the source root.
pub fn ensure_safe_name(name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || Path::new(name).is_absolute();
    if unsafe_name {
        return Err(EngineError::document(
            "rule-set lookup",
            DocumentErrorKind::UnsafeName(name.to_string()),
        ));
    }
    Ok(())
}

// ============================================================================
// Directory source
// ============================================================================

/// Documents stored as `<root>/<REGULATION>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn regulation_dir(&self, regulation: &str) -> Result<PathBuf> {
        ensure_safe_name(regulation)?;
        Ok(self.root.join(regulation))
    }
}

impl RuleSetSource for DirectorySource {
    fn list(&self, regulation: &str) -> Result<Option<Vec<String>>> {
        let dir = self.regulation_dir(regulation)?;
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| EngineError::io(&dir, e))? {
            let path = entry.map_err(|e| EngineError::io(&dir, e))?.path();
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if !is_json || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(Some(names))
    }

    fn load(&self, regulation: &str, name: &str) -> Result<Option<RawQuestionnaire>> {
        ensure_safe_name(name)?;
        let path = self.regulation_dir(regulation)?.join(format!("{name}.json"));
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!("Reading rule set {}", path.display());
        let text = std::fs::read_to_string(&path).map_err(|e| EngineError::io(&path, e))?;
        RawQuestionnaire::from_json(&text, &path.display().to_string()).map(Some)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

// ============================================================================
// In-memory source
// ============================================================================

/// Documents held in memory, keyed by regulation then document name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: BTreeMap<String, BTreeMap<String, RawQuestionnaire>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a document.
    pub fn insert(
        &mut self,
        regulation: impl Into<String>,
        name: impl Into<String>,
        doc: RawQuestionnaire,
    ) {
        self.documents
            .entry(regulation.into())
            .or_default()
            .insert(name.into(), doc);
    }

    /// Builder-style [`insert`](Self::insert) from JSON text.
    pub fn with_json(mut self, regulation: &str, name: &str, json: &str) -> Result<Self> {
        let doc = RawQuestionnaire::from_json(json, &format!("{regulation}/{name}"))?;
        self.insert(regulation, name, doc);
        Ok(self)
    }
}

impl RuleSetSource for MemorySource {
    fn list(&self, regulation: &str) -> Result<Option<Vec<String>>> {
        Ok(self
            .documents
            .get(regulation)
            .map(|docs| docs.keys().cloned().collect()))
    }

    fn load(&self, regulation: &str, name: &str) -> Result<Option<RawQuestionnaire>> {
        Ok(self
            .documents
            .get(regulation)
            .and_then(|docs| docs.get(name))
            .cloned())
    }

    fn describe(&self) -> String {
        format!("memory ({} regulations)", self.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = r#"{"sections": [{"name": "A", "weight": 1.0, "questions": ["Q?"]}]}"#;

    #[test]
    fn test_unsafe_names_rejected() {
        for name in ["", ".", "..", "../etc", "a/b", "a\\b", "/abs"] {
            assert!(ensure_safe_name(name).is_err(), "{name:?} should be rejected");
        }
        assert!(ensure_safe_name("Banking and finance").is_ok());
        assert!(ensure_safe_name("E-commerce").is_ok());
    }

    #[test]
    fn test_directory_source_lists_and_loads() {
        let tmp = TempDir::new().unwrap();
        let reg = tmp.path().join("DPDP");
        std::fs::create_dir_all(&reg).unwrap();
        std::fs::write(reg.join("E-commerce.json"), DOC).unwrap();
        std::fs::write(reg.join("Banking and finance.json"), DOC).unwrap();
        std::fs::write(reg.join("notes.txt"), "ignored").unwrap();

        let source = DirectorySource::new(tmp.path());
        assert_eq!(
            source.list("DPDP").unwrap(),
            Some(vec!["Banking and finance".to_string(), "E-commerce".to_string()])
        );
        assert_eq!(source.list("GDPR").unwrap(), None);
        assert!(source.load("DPDP", "E-commerce").unwrap().is_some());
        assert!(source.load("DPDP", "Retail").unwrap().is_none());
        assert!(source.load("DPDP", "../DPDP/E-commerce").is_err());
    }

    #[test]
    fn test_directory_source_reports_bad_json() {
        let tmp = TempDir::new().unwrap();
        let reg = tmp.path().join("OAIC");
        std::fs::create_dir_all(&reg).unwrap();
        std::fs::write(reg.join("General.json"), "{ not json").unwrap();

        let source = DirectorySource::new(tmp.path());
        assert!(source.load("OAIC", "General").is_err());
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with_json("NPC", "npc", DOC).unwrap();
        assert_eq!(source.list("NPC").unwrap(), Some(vec!["npc".to_string()]));
        assert!(source.load("NPC", "npc").unwrap().is_some());
        assert!(source.load("NPC", "other").unwrap().is_none());
    }
}
