//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults are
//! the base layer; the project's `site.toml` (if any) is merged on top.
//!
//! ## Config File Location
//!
//! ```text
//! project/
//! ├── site.toml                  # Optional, overrides stock defaults
//! ├── html-generators/
//! │   ├── categories.properties  # Declared category order
//! │   └── locales.properties     # Declared locale order
//! ├── content/                   # Entry files, one directory per category
//! ├── translations/              # strings/<locale>.* and content/<locale>/...
//! └── templates/                 # Page templates
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! base_url = "https://example.github.io"
//! site_name = "code.evolved"
//! baseline_locale = "en"
//! rtl_locales = ["ar"]
//! issues_url = ""              # Empty disables contribute links
//! proof_url = ""               # Empty disables proof links
//! proof_extension = "java"
//!
//! [paths]
//! content = "content"
//! translations = "translations"
//! templates = "templates"
//! output = "site"
//! categories = "html-generators/categories.properties"
//! locales = "html-generators/locales.properties"
//! proof = "proof"
//! ```
//!
//! Relative paths resolve against the project root. Unknown keys are rejected
//! to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute origin used for canonical and alternate links, no trailing slash.
    pub base_url: String,
    /// Site name appended to shared titles.
    pub site_name: String,
    /// Canonical locale: source of truth and fallback for all others.
    pub baseline_locale: String,
    /// Locales rendered right-to-left.
    pub rtl_locales: Vec<String>,
    /// Issue tracker "new issue" URL for contribute links. Empty disables them.
    pub issues_url: String,
    /// Base URL of browsable proof sources. Empty disables proof links.
    pub proof_url: String,
    /// File extension of proof sources.
    pub proof_extension: String,
    /// Input and output locations.
    pub paths: PathsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.github.io".to_string(),
            site_name: "code.evolved".to_string(),
            baseline_locale: "en".to_string(),
            rtl_locales: vec!["ar".to_string()],
            issues_url: String::new(),
            proof_url: String::new(),
            proof_extension: "java".to_string(),
            paths: PathsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline_locale.trim().is_empty() {
            return Err(ConfigError::Validation(
                "baseline_locale must not be empty".into(),
            ));
        }
        if self.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "base_url must not end with '/'".into(),
            ));
        }
        if self.proof_extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "proof_extension must not start with '.'".into(),
            ));
        }
        Ok(())
    }

    pub fn is_baseline(&self, locale: &str) -> bool {
        locale == self.baseline_locale
    }

    pub fn is_rtl(&self, locale: &str) -> bool {
        self.rtl_locales.iter().any(|l| l == locale)
    }
}

/// Input and output locations, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub content: PathBuf,
    pub translations: PathBuf,
    pub templates: PathBuf,
    pub output: PathBuf,
    pub categories: PathBuf,
    pub locales: PathBuf,
    pub proof: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            translations: "translations".into(),
            templates: "templates".into(),
            output: "site".into(),
            categories: "html-generators/categories.properties".into(),
            locales: "html-generators/locales.properties".into(),
            proof: "proof".into(),
        }
    }
}

impl PathsConfig {
    /// Resolve every relative path against `root`.
    pub fn resolved(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| root.join(p);
        Self {
            content: join(&self.content),
            translations: join(&self.translations),
            templates: join(&self.templates),
            output: join(&self.output),
            categories: join(&self.categories),
            locales: join(&self.locales),
            proof: join(&self.proof),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site.toml` in the project root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Configuration
# ==================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Absolute origin for canonical and alternate-language links (no trailing slash).
base_url = "https://example.github.io"

# Appended to titles in social share text.
site_name = "code.evolved"

# Canonical locale. Its strings bundle is mandatory and defines every UI key;
# all other locales fall back to it.
baseline_locale = "en"

# Locales rendered with dir="rtl".
rtl_locales = ["ar"]

# "New issue" URL of the issue tracker. When set, pages link to prefilled
# code-issue, translation-issue and new-pattern forms.
issues_url = ""

# Browsable base URL for proof sources. When set, entries with a proof file
# at <paths.proof>/<category>/<PascalSlug>.<proof_extension> link to it.
proof_url = ""
proof_extension = "java"

# ---------------------------------------------------------------------------
# Paths (relative to the project root)
# ---------------------------------------------------------------------------
[paths]
content = "content"
translations = "translations"
templates = "templates"
output = "site"
categories = "html-generators/categories.properties"
locales = "html-generators/locales.properties"
proof = "proof"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.baseline_locale, "en");
        assert_eq!(config.paths.output, PathBuf::from("site"));
        assert!(config.is_rtl("ar"));
        assert!(!config.is_rtl("en"));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.base_url, "https://example.github.io");
    }

    #[test]
    fn load_config_reads_partial_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
base_url = "https://patterns.example.org"

[paths]
output = "public"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.base_url, "https://patterns.example.org");
        assert_eq!(config.paths.output, PathBuf::from("public"));
        // Unspecified values keep their defaults
        assert_eq!(config.paths.content, PathBuf::from("content"));
        assert_eq!(config.baseline_locale, "en");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "base_ulr = \"typo\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml_str = "[paths]\ncontnet = \"x\"\n";
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn validate_trailing_slash_rejected() {
        let config = SiteConfig {
            base_url: "https://x.org/".into(),
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_baseline_rejected() {
        let config = SiteConfig {
            baseline_locale: " ".into(),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[paths]\ncontent = \"a\"\noutput = \"b\"").unwrap();
        let overlay: toml::Value = toml::from_str("[paths]\noutput = \"c\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["paths"]["content"].as_str(), Some("a"));
        assert_eq!(merged["paths"]["output"].as_str(), Some("c"));
    }

    #[test]
    fn paths_resolved_against_root() {
        let paths = PathsConfig::default().resolved(Path::new("/project"));
        assert_eq!(paths.content, PathBuf::from("/project/content"));
        assert_eq!(
            paths.locales,
            PathBuf::from("/project/html-generators/locales.properties")
        );
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.rtl_locales, defaults.rtl_locales);
        assert_eq!(config.paths.output, defaults.paths.output);
    }
}
