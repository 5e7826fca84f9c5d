//! Shared types used across the pipeline.
//!
//! An [`Entry`] is parsed once from its source file and never mutated; locale
//! overlays produce fresh copies. Field names serialize in `camelCase` so the
//! same struct reads entry files and writes the published manifest; keys the
//! struct does not know ride along in [`Entry::extra`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// One before/after code pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub slug: String,
    pub category: String,
    pub title: String,
    pub summary: String,
    pub difficulty: String,
    /// Release that introduced the modern approach.
    #[serde(alias = "jdkVersion")]
    pub version: String,
    pub old_label: String,
    pub modern_label: String,
    pub old_code: String,
    pub modern_code: String,
    pub old_approach: String,
    pub modern_approach: String,
    pub explanation: String,
    pub support: Support,
    pub why_modern_wins: Vec<WhyCard>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<DocLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Keys without a typed field. Never rendered, but republished as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Entry {
    /// Composite `category/slug` key.
    pub fn key(&self) -> String {
        crate::naming::entry_key(&self.category, &self.slug)
    }
}

/// Platform support descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Support {
    pub state: SupportState,
    pub description: String,
}

/// Support maturity. Unknown states are kept verbatim and render as available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SupportState {
    Available,
    Preview,
    Experimental,
    Other(String),
}

impl SupportState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "available",
            Self::Preview => "preview",
            Self::Experimental => "experimental",
            Self::Other(s) => s,
        }
    }

    /// CSS modifier for the support badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Experimental => "experimental",
            Self::Available | Self::Other(_) => "widely",
        }
    }

    /// UI string key for the badge label.
    pub fn badge_key(&self) -> &'static str {
        match self {
            Self::Preview => "support.preview",
            Self::Experimental => "support.experimental",
            Self::Available | Self::Other(_) => "support.available",
        }
    }
}

impl From<String> for SupportState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "available" => Self::Available,
            "preview" => Self::Preview,
            "experimental" => Self::Experimental,
            _ => Self::Other(s),
        }
    }
}

impl From<SupportState> for String {
    fn from(state: SupportState) -> Self {
        match state {
            SupportState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SupportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A "why the modern way wins" card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhyCard {
    pub icon: String,
    pub title: String,
    pub desc: String,
}

/// Link to reference documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocLink {
    pub title: String,
    pub href: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn support_state_known_values() {
        let s: SupportState = serde_json::from_value(json!("preview")).unwrap();
        assert_eq!(s, SupportState::Preview);
        assert_eq!(s.badge_class(), "preview");
        assert_eq!(s.badge_key(), "support.preview");
    }

    #[test]
    fn support_state_unknown_kept_verbatim() {
        let s: SupportState = serde_json::from_value(json!("widely")).unwrap();
        assert_eq!(s, SupportState::Other("widely".to_string()));
        assert_eq!(s.badge_class(), "widely");
        assert_eq!(serde_json::to_value(&s).unwrap(), json!("widely"));
    }

    #[test]
    fn entry_accepts_legacy_version_field() {
        let mut value = crate::test_helpers::entry_value("language", "records");
        let obj = value.as_object_mut().unwrap();
        let version = obj.remove("version").unwrap();
        obj.insert("jdkVersion".to_string(), version);

        let entry: Entry = serde_json::from_value(value).unwrap();
        assert_eq!(entry.version, "16");
        assert_eq!(entry.key(), "language/records");
    }

    #[test]
    fn optional_links_skipped_when_absent() {
        let entry: Entry =
            serde_json::from_value(crate::test_helpers::entry_value("language", "records"))
                .unwrap();
        let out = serde_json::to_value(&entry).unwrap();
        assert!(out.get("prev").is_none());
        assert!(out.get("next").is_none());
        assert!(out.get("related").is_none());
        assert_eq!(out["oldCode"], json!("old();"));
    }
}
