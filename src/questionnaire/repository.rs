//! Resolution of `(regulation, industry)` selectors to questionnaires.
//!
//! Lookup order for a selector:
//! 1. the regulation's canonical industry, if its profile declares one,
//!    otherwise the industry alias, otherwise the requested industry;
//! 2. a document with exactly that name;
//! 3. a document whose name matches case-insensitively;
//! 4. the regulation's fallback document (not for canonical profiles);
//! 5. a synthesized minimal questionnaire.
//!
//! Resolution never fails. Broken documents are logged and skipped.

use super::cache::{CacheKey, QuestionnaireCache};
use super::fallback::synthesize;
use super::normalize::normalize;
use super::profile::{generic_sections, RegulationProfile};
use super::source::{DirectorySource, RuleSetSource};
use crate::config::RepositoryConfig;
use crate::error::{OptionContext, Result};
use crate::model::{Questionnaire, QuestionnaireOrigin};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A caller's selector after trimming, case folding and alias resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Canonical regulation code (uppercase)
    pub regulation: String,
    /// Industry as the caller wrote it (trimmed), for display
    pub requested_industry: String,
    /// Document name to look for
    pub industry: String,
}

impl Selector {
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.regulation, self.industry.to_lowercase())
    }
}

/// Resolves selectors against a [`RuleSetSource`], with caching.
pub struct QuestionnaireRepository {
    source: Box<dyn RuleSetSource>,
    cache: Arc<QuestionnaireCache>,
    config: RepositoryConfig,
    invalidation_requested: AtomicBool,
}

impl std::fmt::Debug for QuestionnaireRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionnaireRepository")
            .field("source", &self.source.describe())
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl QuestionnaireRepository {
    /// Repository with its own, empty cache.
    pub fn new(source: impl RuleSetSource + 'static, config: RepositoryConfig) -> Self {
        Self::with_cache(source, config, Arc::new(QuestionnaireCache::new()))
    }

    /// Repository sharing an existing cache.
    pub fn with_cache(
        source: impl RuleSetSource + 'static,
        config: RepositoryConfig,
        cache: Arc<QuestionnaireCache>,
    ) -> Self {
        Self {
            source: Box::new(source),
            cache,
            config,
            invalidation_requested: AtomicBool::new(false),
        }
    }

    /// Directory-backed repository from configuration.
    pub fn from_config(config: &RepositoryConfig) -> Result<Self> {
        let dir = config
            .questionnaire_dir
            .clone()
            .context_none("repository.questionnaire_dir is not set")?;
        Ok(Self::new(DirectorySource::new(dir), config.clone()))
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<QuestionnaireCache> {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Ask for every cached rule set to be dropped before the next resolve.
    pub fn request_invalidation(&self) {
        self.invalidation_requested.store(true, Ordering::SeqCst);
    }

    /// Drop the cached entry for one selector.
    pub fn invalidate(&self, regulation: &str, industry: &str) -> bool {
        self.cache.invalidate(&self.selector(regulation, industry).cache_key())
    }

    fn profile(&self, regulation: &str) -> Option<&RegulationProfile> {
        self.config
            .profiles
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(regulation))
    }

    /// Canonical regulation code for a caller-supplied code.
    #[must_use]
    pub fn canonical_regulation(&self, regulation: &str) -> String {
        let trimmed = regulation.trim();
        self.config
            .regulation_aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
            .map_or(trimmed, |(_, target)| target.as_str())
            .to_uppercase()
    }

    /// Normalize a selector without touching the source.
    #[must_use]
    pub fn selector(&self, regulation: &str, industry: &str) -> Selector {
        let regulation = self.canonical_regulation(regulation);
        let requested = industry.trim().to_string();
        let key = requested.to_lowercase();

        let industry = match self.profile(&regulation) {
            Some(profile) => profile
                .canonical_industry
                .clone()
                .or_else(|| profile.resolve_alias(&key).map(str::to_string))
                .unwrap_or_else(|| requested.clone()),
            None => requested.clone(),
        };

        Selector {
            regulation,
            requested_industry: requested,
            industry,
        }
    }

    /// Resolve a selector to a questionnaire.
    pub fn resolve(&self, regulation: &str, industry: &str) -> Arc<Questionnaire> {
        if self.invalidation_requested.swap(false, Ordering::SeqCst) {
            tracing::info!("Clearing questionnaire cache on request");
            self.cache.clear();
        }

        let selector = self.selector(regulation, industry);
        let key = selector.cache_key();
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!("Rule set cache hit for {key}");
            return hit;
        }

        let questionnaire = Arc::new(self.load(&selector));
        tracing::info!(
            "Resolved {}/{} to {} ({} sections)",
            selector.regulation,
            selector.requested_industry,
            questionnaire.origin,
            questionnaire.sections.len()
        );
        self.cache.put(key, Arc::clone(&questionnaire));
        questionnaire
    }

    /// Resolve, and if `is_expected` rejects the result, invalidate the
    /// entry and resolve once more.
    ///
    /// A second mismatch is logged and the second result returned as-is.
    pub fn resolve_verified<F>(
        &self,
        regulation: &str,
        industry: &str,
        is_expected: F,
    ) -> Arc<Questionnaire>
    where
        F: Fn(&Questionnaire) -> bool,
    {
        let first = self.resolve(regulation, industry);
        if is_expected(&first) {
            return first;
        }

        tracing::warn!("Cached rule set for {regulation}/{industry} does not match, reloading");
        self.invalidate(regulation, industry);
        let second = self.resolve(regulation, industry);
        if !is_expected(&second) {
            tracing::warn!(
                "Rule set for {regulation}/{industry} still does not match, using it as-is"
            );
        }
        second
    }

    /// Industries that can be requested for a regulation.
    ///
    /// Document names plus industry aliases; `general` when nothing is
    /// known about the regulation.
    #[must_use]
    pub fn available_industries(&self, regulation: &str) -> Vec<String> {
        let regulation = self.canonical_regulation(regulation);
        let mut industries = self.list_documents(&regulation).unwrap_or_default();
        if let Some(profile) = self.profile(&regulation) {
            industries.extend(profile.industry_aliases.keys().cloned());
        }
        industries.sort_by_key(|name| name.to_lowercase());
        industries.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        if industries.is_empty() {
            industries.push("general".to_string());
        }
        industries
    }

    fn list_documents(&self, regulation: &str) -> Option<Vec<String>> {
        match self.source.list(regulation) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Cannot list rule sets for {regulation}: {e}");
                None
            }
        }
    }

    fn load(&self, selector: &Selector) -> Questionnaire {
        let regulation = selector.regulation.as_str();
        let profile = self.profile(regulation);
        let industry_key = selector.industry.to_lowercase();

        let synthesized = || {
            let sections = profile.map_or_else(generic_sections, |p| {
                p.synthesized_sections(&industry_key)
            });
            synthesize(regulation, &selector.industry, &sections)
        };

        let Some(documents) = self.list_documents(regulation) else {
            tracing::warn!(
                "No rule sets for regulation {regulation} in {}",
                self.source.describe()
            );
            return synthesized();
        };

        let find = |name: &str| -> Option<String> {
            documents
                .iter()
                .find(|d| d.as_str() == name)
                .or_else(|| documents.iter().find(|d| d.eq_ignore_ascii_case(name)))
                .cloned()
        };

        if let Some(name) = find(&selector.industry) {
            let origin = QuestionnaireOrigin::Document { name: name.clone() };
            if let Some(q) = self.load_document(regulation, &name, &selector.industry, origin) {
                return q;
            }
        }

        let canonical = profile.is_some_and(|p| p.canonical_industry.is_some());
        if !canonical {
            let fallback = profile
                .and_then(|p| p.fallback_industry.as_deref())
                .unwrap_or(self.config.default_fallback_industry.as_str());
            if !fallback.eq_ignore_ascii_case(&industry_key) {
                if let Some(name) = find(fallback) {
                    tracing::warn!(
                        "No {regulation} rule set for '{}', falling back to '{name}'",
                        selector.requested_industry
                    );
                    let origin = QuestionnaireOrigin::FallbackDocument { name: name.clone() };
                    let industry = &selector.industry;
                    if let Some(q) = self.load_document(regulation, &name, industry, origin) {
                        return q;
                    }
                }
            }
        }

        synthesized()
    }

    fn load_document(
        &self,
        regulation: &str,
        name: &str,
        industry: &str,
        origin: QuestionnaireOrigin,
    ) -> Option<Questionnaire> {
        match self.source.load(regulation, name) {
            Ok(Some(doc)) => {
                normalize(doc, regulation, industry, origin, self.config.weight_tolerance)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Skipping rule set {regulation}/{name}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::source::MemorySource;

    fn doc(first_section: &str) -> String {
        format!(
            r#"{{"sections": [
                {{"name": "{first_section}", "weight": 0.5, "questions": ["Q1?"]}},
                {{"name": "Other", "weight": 0.5, "questions": ["Q2?"]}}
            ]}}"#
        )
    }

    fn repository() -> QuestionnaireRepository {
        let source = MemorySource::new()
            .with_json("NPC", "npc", &doc("NPC Governance"))
            .and_then(|s| s.with_json("DPDP", "Banking and finance", &doc("Banking")))
            .and_then(|s| s.with_json("DPDP", "E-commerce", &doc("Commerce")))
            .and_then(|s| s.with_json("PDPPL", "Oil_and_Gas", &doc("Oil")))
            .unwrap();
        QuestionnaireRepository::new(source, RepositoryConfig::default())
    }

    fn first_section(q: &Questionnaire) -> &str {
        q.sections[0].name.as_str()
    }

    #[test]
    fn test_selector_normalization() {
        let repo = repository();
        let s = repo.selector(" dpdp ", " ECommerce ");
        assert_eq!(s.regulation, "DPDP");
        assert_eq!(s.industry, "E-commerce");
        assert_eq!(s.requested_industry, "ECommerce");

        assert_eq!(repo.selector("ndp_qatar", "x").regulation, "PDPPL");
        assert_eq!(repo.selector("npc", "Retail").industry, "npc");
    }

    #[test]
    fn test_exact_and_case_insensitive_match() {
        let repo = repository();
        assert_eq!(first_section(&repo.resolve("DPDP", "E-commerce")), "Commerce");
        let q = repo.resolve("DPDP", "e-COMMERCE");
        assert_eq!(first_section(&q), "Commerce");
        assert!(!q.origin.is_fallback());
    }

    #[test]
    fn test_profile_fallback_document() {
        let repo = repository();
        let q = repo.resolve("DPDP", "Healthcare");
        assert_eq!(first_section(&q), "Banking");
        assert!(matches!(q.origin, QuestionnaireOrigin::FallbackDocument { .. }));

        let q = repo.resolve("PDPPL", "Retail");
        assert_eq!(first_section(&q), "Oil");
    }

    #[test]
    fn test_npc_ignores_industry() {
        let repo = repository();
        let a = repo.resolve("NPC", "Retail");
        let b = repo.resolve("NPC", "Banking");
        assert_eq!(a, b);
        assert_eq!(first_section(&a), "NPC Governance");
    }

    #[test]
    fn test_unknown_regulation_synthesized() {
        let repo = repository();
        let q = repo.resolve("GDPR", "Retail");
        assert_eq!(q.origin, QuestionnaireOrigin::Synthesized);
        let names: Vec<&str> = q.section_names().collect();
        assert_eq!(names, vec!["Data Collection", "Data Processing"]);
    }

    #[test]
    fn test_results_are_cached_until_invalidated() {
        let repo = repository();
        let first = repo.resolve("DPDP", "E-commerce");
        let second = repo.resolve("dpdp", "e-commerce");
        assert!(Arc::ptr_eq(&first, &second));

        assert!(repo.invalidate("DPDP", "E-commerce"));
        let third = repo.resolve("DPDP", "E-commerce");
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(first, third);

        repo.request_invalidation();
        let fourth = repo.resolve("DPDP", "E-commerce");
        assert!(!Arc::ptr_eq(&third, &fourth));
    }

    #[test]
    fn test_resolve_verified_retries_once() {
        let repo = repository();
        let calls = std::cell::Cell::new(0);
        let q = repo.resolve_verified("DPDP", "E-commerce", |q| {
            calls.set(calls.get() + 1);
            first_section(q) == "Something else"
        });
        assert_eq!(calls.get(), 2);
        assert_eq!(first_section(&q), "Commerce");
    }

    #[test]
    fn test_available_industries() {
        let repo = repository();
        let dpdp = repo.available_industries("DPDP");
        assert!(dpdp.contains(&"E-commerce".to_string()));
        assert!(dpdp.contains(&"ecommerce".to_string()));
        assert_eq!(repo.available_industries("GDPR"), vec!["general"]);
    }
}
