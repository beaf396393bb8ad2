//! Shared cache of resolved questionnaires.
//!
//! Entries are immutable snapshots behind `Arc`; invalidation removes an
//! entry and never mutates one in place.

use crate::model::Questionnaire;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Cache key: canonical regulation code and lowercase industry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub regulation: String,
    pub industry: String,
}

impl CacheKey {
    pub fn new(regulation: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            regulation: regulation.into(),
            industry: industry.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.regulation, self.industry)
    }
}

/// Statistics for cache performance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total cache lookups
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    /// Entries removed by invalidation or clearing
    pub invalidations: u64,
}

impl CacheStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

/// Read-mostly map from selector to resolved questionnaire.
#[derive(Debug, Default)]
pub struct QuestionnaireCache {
    entries: RwLock<HashMap<CacheKey, Arc<Questionnaire>>>,
    stats: RwLock<CacheStats>,
}

impl QuestionnaireCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached questionnaire.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Questionnaire>> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.lookups += 1;
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Store a questionnaire, replacing any previous entry for the key.
    pub fn put(&self, key: CacheKey, questionnaire: Arc<Questionnaire>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, questionnaire);
    }

    /// Drop one entry; returns whether it was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            tracing::debug!("Invalidated cached rule set {key}");
            self.stats
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .invalidations += 1;
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let count = entries.len() as u64;
        entries.clear();
        drop(entries);
        self.stats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidations += count;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::fallback::synthesize;

    fn entry() -> Arc<Questionnaire> {
        Arc::new(synthesize("GDPR", "retail", &["A".to_string()]))
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = QuestionnaireCache::new();
        let key = CacheKey::new("GDPR", "retail");
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), entry());
        assert!(cache.get(&key).is_some());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalidate_removes_without_touching_snapshot() {
        let cache = QuestionnaireCache::new();
        let key = CacheKey::new("GDPR", "retail");
        cache.put(key.clone(), entry());

        let held = cache.get(&key).unwrap();
        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        assert!(cache.get(&key).is_none());
        assert_eq!(held.sections.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = QuestionnaireCache::new();
        cache.put(CacheKey::new("A", "x"), entry());
        cache.put(CacheKey::new("B", "y"), entry());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 2);
    }
}
