//! Declarative per-regulation lookup rules.
//!
//! Every regulation-specific quirk of rule-set resolution is data on a
//! [`RegulationProfile`]: a canonical industry override, a fallback
//! industry, industry aliases and the section names used when a
//! questionnaire has to be synthesized.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Section names used for synthesized questionnaires of unknown regulations.
pub const GENERIC_FALLBACK_SECTIONS: &[&str] = &["Data Collection", "Data Processing"];

/// Lookup rules for one regulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegulationProfile {
    /// Regulation code (matched case-insensitively)
    pub code: String,
    /// Industry that always applies, whatever the caller asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_industry: Option<String>,
    /// Document used when the requested industry has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_industry: Option<String>,
    /// Lowercase industry alias to document name
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub industry_aliases: IndexMap<String, String>,
    /// Section names for a synthesized questionnaire
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallback_sections: Vec<String>,
    /// Per-industry (lowercase) overrides of `fallback_sections`
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub industry_fallback_sections: IndexMap<String, Vec<String>>,
}

impl RegulationProfile {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn canonical(mut self, industry: impl Into<String>) -> Self {
        self.canonical_industry = Some(industry.into());
        self
    }

    #[must_use]
    pub fn fallback(mut self, industry: impl Into<String>) -> Self {
        self.fallback_industry = Some(industry.into());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>, industry: impl Into<String>) -> Self {
        self.industry_aliases
            .insert(alias.into().to_lowercase(), industry.into());
        self
    }

    #[must_use]
    pub fn sections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_sections = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn industry_sections<I, S>(mut self, industry: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.industry_fallback_sections.insert(
            industry.into().to_lowercase(),
            names.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Resolve an alias for a lowercase industry key.
    #[must_use]
    pub fn resolve_alias(&self, industry_key: &str) -> Option<&str> {
        self.industry_aliases.get(industry_key).map(String::as_str)
    }

    /// Section names for a synthesized questionnaire of `industry_key`.
    #[must_use]
    pub fn synthesized_sections(&self, industry_key: &str) -> Vec<String> {
        if let Some(names) = self.industry_fallback_sections.get(industry_key) {
            if !names.is_empty() {
                return names.clone();
            }
        }
        if self.fallback_sections.is_empty() {
            generic_sections()
        } else {
            self.fallback_sections.clone()
        }
    }
}

/// [`GENERIC_FALLBACK_SECTIONS`] as owned strings.
#[must_use]
pub fn generic_sections() -> Vec<String> {
    GENERIC_FALLBACK_SECTIONS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

/// Built-in profiles for the regulations shipped with the engine.
#[must_use]
pub fn builtin_profiles() -> Vec<RegulationProfile> {
    vec![
        RegulationProfile::new("NPC")
            .canonical("npc")
            .alias("general", "npc"),
        RegulationProfile::new("PDPPL").fallback("Oil_and_Gas"),
        RegulationProfile::new("OAIC").fallback("General"),
        RegulationProfile::new("DPDP")
            .fallback("Banking and finance")
            .alias("general", "Banking and finance")
            .alias("banking", "Banking and finance")
            .alias("finance", "Banking and finance")
            .alias("ecommerce", "E-commerce")
            .alias("e_commerce", "E-commerce")
            .sections(["Data Collection and Processing", "Data Principal Rights"])
            .industry_sections(
                "e-commerce",
                [
                    "DPDP Data Collection and Processing",
                    "DPDP Data Principal Rights",
                    "DPDP Data Breach and Security",
                    "DPDP Governance and Documentation",
                ],
            ),
    ]
}

/// Built-in regulation aliases (lowercase alias to regulation code).
#[must_use]
pub fn builtin_regulation_aliases() -> IndexMap<String, String> {
    [("ndp_qatar", "PDPPL"), ("qatar", "PDPPL")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dpdp() -> RegulationProfile {
        builtin_profiles()
            .into_iter()
            .find(|p| p.code == "DPDP")
            .unwrap()
    }

    #[test]
    fn test_alias_resolution() {
        let profile = dpdp();
        assert_eq!(profile.resolve_alias("ecommerce"), Some("E-commerce"));
        assert_eq!(profile.resolve_alias("insurance"), None);
    }

    #[test]
    fn test_synthesized_sections_by_industry() {
        let profile = dpdp();
        assert_eq!(profile.synthesized_sections("e-commerce").len(), 4);
        assert_eq!(
            profile.synthesized_sections("healthcare"),
            vec!["Data Collection and Processing", "Data Principal Rights"]
        );
        assert_eq!(
            RegulationProfile::new("GDPR").synthesized_sections("retail"),
            vec!["Data Collection", "Data Processing"]
        );
    }

    #[test]
    fn test_npc_is_canonical() {
        let npc = builtin_profiles().into_iter().find(|p| p.code == "NPC").unwrap();
        assert_eq!(npc.canonical_industry.as_deref(), Some("npc"));
    }
}
