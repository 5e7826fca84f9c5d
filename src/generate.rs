//! Site build driver.
//!
//! Loads a project (config, declarations, templates, content) once, then
//! builds each requested locale in declared order. A locale build writes
//! every entry page, the index page, and the search manifest.
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── index.html                       # Baseline locale at the root
//! ├── data/snippets.json
//! ├── language/
//! │   ├── records.html
//! │   └── switch-expressions.html
//! └── es/                              # Every other locale under its id
//!     ├── index.html
//!     ├── data/snippets.json
//!     └── language/
//!         └── records.html
//! ```
//!
//! The run is deterministic: unchanged inputs produce byte-identical output.

use crate::assemble::Site;
use crate::config::{self, ConfigError, PathsConfig, SiteConfig};
use crate::declarations::{DeclarationError, Declarations};
use crate::i18n::{I18nError, TranslationResolver};
use crate::store::{self, ContentStore, StoreError};
use crate::template::{TemplateError, Templates};
use crate::types::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest location inside each locale directory.
pub const MANIFEST_PATH: &str = "data/snippets.json";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Declarations(#[from] DeclarationError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    I18n(#[from] I18nError),
    #[error("Locale '{0}' is not declared in the locales file")]
    UnknownLocale(String),
}

// ============================================================================
// Project
// ============================================================================

/// Everything loaded once per run and shared by every locale build.
#[derive(Debug)]
pub struct Project {
    pub config: SiteConfig,
    /// Paths from the config, resolved against the project root.
    pub paths: PathsConfig,
    pub declarations: Declarations,
    pub templates: Templates,
    pub store: ContentStore,
    pub resolver: TranslationResolver,
}

impl Project {
    /// Load config, declarations, templates and content from `root`.
    ///
    /// Any failure here is fatal: nothing is written.
    pub fn load(root: &Path) -> Result<Self, GenerateError> {
        let config = config::load_config(root)?;
        let paths = config.paths.resolved(root);
        let declarations = Declarations::load(&paths.categories, &paths.locales)?;
        let templates = Templates::load(&paths.templates)?;
        let store = store::load_all(&paths.content, &declarations.categories)?;
        let resolver = TranslationResolver::new(&paths.translations, &config.baseline_locale);
        tracing::info!(
            entries = store.len(),
            categories = declarations.categories.len(),
            locales = declarations.locales.len(),
            "project loaded"
        );
        Ok(Self {
            config,
            paths,
            declarations,
            templates,
            store,
            resolver,
        })
    }

    /// Redirect output, e.g. from a command-line override.
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.paths.output = output;
        self
    }

    pub fn site(&self) -> Site<'_> {
        Site {
            config: &self.config,
            declarations: &self.declarations,
            templates: &self.templates,
            store: &self.store,
            resolver: &self.resolver,
            proof_dir: &self.paths.proof,
        }
    }

    /// Output directory for one locale: the root for the baseline, a
    /// `<locale>/` subdirectory otherwise.
    pub fn locale_dir(&self, locale: &str) -> PathBuf {
        if self.config.is_baseline(locale) {
            self.paths.output.clone()
        } else {
            self.paths.output.join(locale)
        }
    }
}

// ============================================================================
// Build
// ============================================================================

/// Which locales a build covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LocaleSelection {
    /// Every declared locale, in declared order.
    #[default]
    All,
    One(String),
}

impl LocaleSelection {
    pub fn resolve(&self, declarations: &Declarations) -> Result<Vec<String>, GenerateError> {
        match self {
            Self::All => Ok(declarations.locales.ids().map(str::to_string).collect()),
            Self::One(locale) if declarations.locales.contains(locale) => Ok(vec![locale.clone()]),
            Self::One(locale) => Err(GenerateError::UnknownLocale(locale.clone())),
        }
    }
}

/// What one locale build wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleReport {
    pub locale: String,
    pub locale_name: String,
    pub dir: PathBuf,
    /// Entry page paths relative to `dir`, in store order.
    pub pages: Vec<PathBuf>,
    /// Entries with a translation file for this locale.
    pub translated: usize,
}

impl LocaleReport {
    pub fn index_path(&self) -> PathBuf {
        self.dir.join("index.html")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_PATH)
    }
}

/// Build the selected locales in order.
pub fn build(project: &Project, selection: &LocaleSelection) -> Result<Vec<LocaleReport>, GenerateError> {
    selection
        .resolve(&project.declarations)?
        .iter()
        .map(|locale| build_locale(project, locale))
        .collect()
}

/// Build one locale: entry pages, index page, manifest.
pub fn build_locale(project: &Project, locale: &str) -> Result<LocaleReport, GenerateError> {
    let site = project.site();
    let strings = project.resolver.load_strings(locale)?;
    let shell = site.locale_shell(&strings);
    let dir = project.locale_dir(locale);
    let locale_name = project.declarations.locale_name(locale).to_string();
    tracing::info!(locale, name = %locale_name, dir = %dir.display(), "building locale");

    let mut pages = Vec::with_capacity(project.store.len());
    let mut translated = 0;
    for entry in project.store.iter() {
        if has_translation(project, entry, locale) {
            translated += 1;
        }
        let rel_path = Path::new(&entry.category).join(format!("{}.html", entry.slug));
        let html = site.assemble_entry_page(entry, &shell);
        write_file(&dir.join(&rel_path), html.trim())?;
        pages.push(rel_path);
    }

    write_file(&dir.join("index.html"), &site.assemble_index_page(&shell))?;
    write_file(
        &dir.join(MANIFEST_PATH),
        &render_manifest(&project.store, &project.resolver, locale)?,
    )?;

    Ok(LocaleReport {
        locale: locale.to_string(),
        locale_name,
        dir,
        pages,
        translated,
    })
}

/// The search manifest for one locale: every entry, resolved, without its
/// cross-references. Unknown source keys are kept and absent optional lists
/// stay absent. Pretty JSON with a trailing newline.
pub fn render_manifest(
    store: &ContentStore,
    resolver: &TranslationResolver,
    locale: &str,
) -> Result<String, serde_json::Error> {
    let entries: Vec<Entry> = store
        .iter()
        .map(|entry| manifest_entry(resolver.resolve_entry(entry, locale).into_owned()))
        .collect();
    let mut json = serde_json::to_string_pretty(&entries)?;
    json.push('\n');
    Ok(json)
}

/// Strip `prev`, `next` and `related`; they serialize only when set.
fn manifest_entry(mut entry: Entry) -> Entry {
    entry.prev = None;
    entry.next = None;
    entry.related.clear();
    entry
}

fn has_translation(project: &Project, entry: &Entry, locale: &str) -> bool {
    !project.config.is_baseline(locale)
        && project.resolver.translation_path(entry, locale).is_some()
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

// ============================================================================
// Check
// ============================================================================

/// Result of validating a project without writing output.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// `(category id, entry count)` in declared order.
    pub categories: Vec<(String, usize)>,
    pub locales: Vec<LocaleCheck>,
    /// `(from key, to key)` references with no target.
    pub dangling: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocaleCheck {
    pub locale: String,
    pub name: String,
    pub strings: usize,
    pub translated: usize,
}

/// Load every locale bundle and audit cross-references.
///
/// Fallback warnings surface through the log exactly as during a build.
pub fn check(project: &Project) -> Result<CheckReport, GenerateError> {
    let categories = project
        .declarations
        .categories
        .ids()
        .map(|id| (id.to_string(), project.store.in_category(id).count()))
        .collect();

    let mut locales = Vec::new();
    for locale in project.declarations.locales.ids() {
        let strings = project.resolver.load_strings(locale)?;
        let translated = project
            .store
            .iter()
            .filter(|e| has_translation(project, e, locale))
            .count();
        locales.push(LocaleCheck {
            locale: locale.to_string(),
            name: project.declarations.locale_name(locale).to_string(),
            strings: strings.len(),
            translated,
        });
    }

    for (from, to) in project.store.malformed_references() {
        tracing::warn!(from = %from, to = %to, "reference is not a category/slug key");
    }
    let dangling = project.store.dangling_references();
    for (from, to) in &dangling {
        tracing::info!(from = %from, to = %to, "reference to missing entry");
    }

    Ok(CheckReport {
        categories,
        locales,
        dangling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn load_fixture_project() -> (tempfile::TempDir, Project) {
        let tmp = setup_fixtures();
        let project = Project::load(tmp.path()).unwrap();
        (tmp, project)
    }

    #[test]
    fn project_loads_fixture_site() {
        let (_tmp, project) = load_fixture_project();
        assert_eq!(project.store.len(), 4);
        assert_eq!(
            project.declarations.locales.ids().collect::<Vec<_>>(),
            vec!["en", "es"]
        );
    }

    #[test]
    fn locale_dir_nests_non_baseline() {
        let (tmp, project) = load_fixture_project();
        assert_eq!(project.locale_dir("en"), tmp.path().join("site"));
        assert_eq!(project.locale_dir("es"), tmp.path().join("site/es"));
    }

    #[test]
    fn selection_rejects_undeclared_locale() {
        let (_tmp, project) = load_fixture_project();
        let result = LocaleSelection::One("fr".into()).resolve(&project.declarations);
        assert!(matches!(result, Err(GenerateError::UnknownLocale(l)) if l == "fr"));
    }

    #[test]
    fn build_single_locale_only_writes_that_locale() {
        let (tmp, project) = load_fixture_project();
        let reports = build(&project, &LocaleSelection::One("es".into())).unwrap();

        assert_eq!(reports.len(), 1);
        assert!(tmp.path().join("site/es/language/records.html").is_file());
        assert!(!tmp.path().join("site/index.html").exists());
    }

    #[test]
    fn build_locale_report_lists_pages_in_store_order() {
        let (_tmp, project) = load_fixture_project();
        let report = build_locale(&project, "es").unwrap();

        assert_eq!(
            report.pages,
            vec![
                PathBuf::from("language/records.html"),
                PathBuf::from("language/sealed-classes.html"),
                PathBuf::from("language/switch-expressions.html"),
                PathBuf::from("io/reading-files.html"),
            ]
        );
        assert_eq!(report.translated, 1);
        assert_eq!(report.locale_name, "Español");
        assert!(report.index_path().is_file());
        assert!(report.manifest_path().is_file());
    }

    #[test]
    fn entry_pages_are_trimmed() {
        let (_tmp, project) = load_fixture_project();
        let report = build_locale(&project, "en").unwrap();
        let html = fs::read_to_string(report.dir.join(&report.pages[0])).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn manifest_drops_cross_references() {
        let (_tmp, project) = load_fixture_project();
        let json = render_manifest(&project.store, &project.resolver, "en").unwrap();
        assert!(json.ends_with("]\n"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        for entry in entries {
            assert!(entry.get("prev").is_none());
            assert!(entry.get("next").is_none());
            assert!(entry.get("related").is_none());
        }
        assert_eq!(entries[2]["slug"], "switch-expressions");
    }

    #[test]
    fn manifest_is_resolved_and_keeps_unicode() {
        let (_tmp, project) = load_fixture_project();
        let json = render_manifest(&project.store, &project.resolver, "es").unwrap();
        assert!(json.contains("\"title\": \"Registros\""));
        assert!(json.contains("Menos código"));
    }

    #[test]
    fn check_reports_counts_and_dangling() {
        let (_tmp, project) = load_fixture_project();
        let report = check(&project).unwrap();

        assert_eq!(
            report.categories,
            vec![("language".to_string(), 3), ("io".to_string(), 1)]
        );
        assert_eq!(report.locales.len(), 2);
        assert_eq!(report.locales[1].translated, 1);
        assert_eq!(report.locales[0].strings, report.locales[1].strings);
        assert_eq!(
            report.dangling,
            vec![(
                "language/switch-expressions".to_string(),
                "language/missing".to_string()
            )]
        );
    }

    #[test]
    fn manifest_republishes_unknown_keys_and_omits_absent_docs() {
        let mut value = entry_value("language", "records");
        value["draft"] = serde_json::json!(true);
        value["tags"] = serde_json::json!(["data", "immutability"]);
        value.as_object_mut().unwrap().remove("docs");
        let record: Entry = serde_json::from_value(value).unwrap();
        let store = ContentStore::from_entries([record]);
        let tmp = tempfile::TempDir::new().unwrap();
        let resolver = TranslationResolver::new(tmp.path(), "en");

        let json = render_manifest(&store, &resolver, "en").unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest[0]["draft"], true);
        assert_eq!(manifest[0]["tags"][1], "immutability");
        assert!(manifest[0].get("docs").is_none());
    }
}
