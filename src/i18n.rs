//! Locale string bundles and translated entry views.
//!
//! ## Layout
//!
//! ```text
//! translations/
//! ├── strings/
//! │   ├── en.yaml                  # Baseline bundle (mandatory)
//! │   ├── es.json                  # Sparse overrides
//! │   └── ar.yml
//! └── content/
//!     └── es/
//!         └── language/
//!             └── records.json     # Overlay for language/records
//! ```
//!
//! ## UI Strings
//!
//! Bundles are nested key-value documents flattened to dot-qualified keys
//! (`{"nav": {"home": "Home"}}` → `nav.home`). The baseline bundle defines the
//! closed key set: a merged bundle for any locale has exactly the baseline's
//! keys, each taking the locale's value when present and the baseline's value
//! otherwise. Keys the baseline does not know are never admitted.
//!
//! ## Entry Overlays
//!
//! A translation file may replace only the fields listed in
//! [`TRANSLATABLE_FIELDS`], each with its [`OverlayPolicy`]. `support` is
//! merged one sub-field deep so its `state`, which drives badge rendering,
//! always comes from the baseline. Translation problems never abort a build:
//! they log a warning and the entry renders untranslated.

use crate::format::{self, FormatError};
use crate::types::Entry;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Baseline strings bundle '{locale}' not found in {dir}")]
    MissingBaseline { locale: String, dir: PathBuf },
    #[error("Baseline strings bundle {path} is malformed: {source}")]
    MalformedBaseline { path: PathBuf, source: FormatError },
}

/// How a translation value is layered onto the baseline field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPolicy {
    /// The translated value replaces the baseline value wholesale.
    Replace,
    /// Only the named sub-field of an object value is replaced.
    MergeSubfield(&'static str),
}

/// The closed set of fields a translation file may override.
pub const TRANSLATABLE_FIELDS: &[(&str, OverlayPolicy)] = &[
    ("title", OverlayPolicy::Replace),
    ("summary", OverlayPolicy::Replace),
    ("explanation", OverlayPolicy::Replace),
    ("oldApproach", OverlayPolicy::Replace),
    ("modernApproach", OverlayPolicy::Replace),
    ("whyModernWins", OverlayPolicy::Replace),
    ("support", OverlayPolicy::MergeSubfield("description")),
];

// ============================================================================
// Locale bundles
// ============================================================================

/// Flat, dot-keyed UI strings for one locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleBundle {
    locale: String,
    strings: BTreeMap<String, String>,
}

impl LocaleBundle {
    pub fn new(locale: impl Into<String>, strings: BTreeMap<String, String>) -> Self {
        Self {
            locale: locale.into(),
            strings,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Look up a key, falling back to `default` when the bundle lacks it.
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    /// `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Overlay `overrides` onto this (baseline) bundle for `locale`.
    ///
    /// Returns the merged bundle and the baseline keys `overrides` lacked.
    pub fn merged_with(
        &self,
        locale: &str,
        overrides: &BTreeMap<String, String>,
    ) -> (LocaleBundle, Vec<String>) {
        let mut merged = self.strings.clone();
        let mut missing = Vec::new();
        for (key, value) in merged.iter_mut() {
            match overrides.get(key) {
                Some(localized) => *value = localized.clone(),
                None => missing.push(key.clone()),
            }
        }
        (LocaleBundle::new(locale, merged), missing)
    }
}

/// Flatten a nested document into dot-qualified string keys.
///
/// Scalars other than strings keep their JSON text (`3`, `true`); `null` and
/// arrays are skipped since no UI string is shaped that way.
pub fn flatten(value: &Value) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    flatten_into(value, None, &mut result);
    result
}

fn flatten_into(value: &Value, prefix: Option<&str>, result: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
                flatten_into(child, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        Value::Null | Value::Array(_) => {}
        scalar => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), scalar.to_string());
            }
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Loads locale bundles and builds translated entry views.
#[derive(Debug, Clone)]
pub struct TranslationResolver {
    translations_dir: PathBuf,
    baseline: String,
}

impl TranslationResolver {
    pub fn new(translations_dir: impl Into<PathBuf>, baseline: impl Into<String>) -> Self {
        Self {
            translations_dir: translations_dir.into(),
            baseline: baseline.into(),
        }
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    fn strings_dir(&self) -> PathBuf {
        self.translations_dir.join("strings")
    }

    /// Load the baseline bundle. Absent or malformed is fatal.
    pub fn load_baseline(&self) -> Result<LocaleBundle, I18nError> {
        let dir = self.strings_dir();
        let path = format::find_with_extensions(&dir, &self.baseline).ok_or_else(|| {
            I18nError::MissingBaseline {
                locale: self.baseline.clone(),
                dir: dir.clone(),
            }
        })?;
        let value = format::read_value(&path)
            .map_err(|source| I18nError::MalformedBaseline { path, source })?;
        Ok(LocaleBundle::new(self.baseline.clone(), flatten(&value)))
    }

    /// Load the merged UI strings for `locale`.
    ///
    /// The result always has exactly the baseline key set. A missing or
    /// malformed locale bundle degrades to baseline text with a warning; each
    /// key missing from a present bundle falls back individually with a
    /// warning.
    pub fn load_strings(&self, locale: &str) -> Result<LocaleBundle, I18nError> {
        let baseline = self.load_baseline()?;
        if locale == self.baseline {
            return Ok(baseline);
        }

        let Some(path) = format::find_with_extensions(&self.strings_dir(), locale) else {
            tracing::warn!(
                locale,
                "strings/{locale}.{{json,yaml,yml}} not found; using all {} strings",
                self.baseline
            );
            return Ok(LocaleBundle::new(locale, baseline.strings));
        };

        let overrides = match format::read_value(&path) {
            Ok(value) => flatten(&value),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "unreadable strings bundle; using all {} strings",
                    self.baseline
                );
                return Ok(LocaleBundle::new(locale, baseline.strings));
            }
        };

        let (merged, missing) = baseline.merged_with(locale, &overrides);
        let file = file_name(&path);
        for key in &missing {
            tracing::warn!("{file}: missing key \"{key}\"; using {} fallback", self.baseline);
        }
        for key in overrides.keys().filter(|k| !baseline.contains_key(k)) {
            tracing::debug!("{file}: ignoring key \"{key}\" unknown to the baseline");
        }
        Ok(merged)
    }

    /// Path of the translation file for an entry, if one exists.
    pub fn translation_path(&self, entry: &Entry, locale: &str) -> Option<PathBuf> {
        let dir = self
            .translations_dir
            .join("content")
            .join(locale)
            .join(&entry.category);
        format::find_with_extensions(&dir, &entry.slug)
    }

    /// The view of `entry` under `locale`.
    ///
    /// Baseline and untranslated entries are borrowed unchanged; translated
    /// entries are fresh copies. A broken translation file logs a warning and
    /// yields the baseline entry.
    pub fn resolve_entry<'e>(&self, entry: &'e Entry, locale: &str) -> Cow<'e, Entry> {
        if locale == self.baseline {
            return Cow::Borrowed(entry);
        }
        let Some(path) = self.translation_path(entry, locale) else {
            return Cow::Borrowed(entry);
        };

        let translated = format::read_value(&path)
            .map_err(|e| e.to_string())
            .and_then(|value| overlay_entry(entry, &value).map_err(|e| e.to_string()));
        match translated {
            Ok(resolved) => Cow::Owned(resolved),
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "failed to load translation; using {}",
                    self.baseline
                );
                Cow::Borrowed(entry)
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Apply [`TRANSLATABLE_FIELDS`] from `translation` onto `base`, in place.
///
/// Non-object inputs are left untouched, as are `MergeSubfield` targets whose
/// translated value is not an object.
pub fn apply_overlay(base: &mut Value, translation: &Value) {
    let (Some(base_obj), Some(source)) = (base.as_object_mut(), translation.as_object()) else {
        return;
    };
    for (field, policy) in TRANSLATABLE_FIELDS {
        let Some(value) = source.get(*field) else {
            continue;
        };
        match policy {
            OverlayPolicy::Replace => {
                base_obj.insert((*field).to_string(), value.clone());
            }
            OverlayPolicy::MergeSubfield(sub) => {
                if let Some(target) = base_obj.get_mut(*field).and_then(Value::as_object_mut)
                    && let Some(sub_value) = value.get(*sub)
                {
                    target.insert((*sub).to_string(), sub_value.clone());
                }
            }
        }
    }
}

/// Produce a translated copy of `entry` from a parsed translation document.
pub fn overlay_entry(entry: &Entry, translation: &Value) -> Result<Entry, serde_json::Error> {
    let mut value = serde_json::to_value(entry)?;
    apply_overlay(&mut value, translation);
    serde_json::from_value(value)
}
