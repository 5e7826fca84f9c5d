//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what the user authored (categories, entries, locales)
//! and shows filesystem paths as secondary context. Every entity line follows
//! the same shape: a positional index, then a name, then optional detail.
//!
//! # Output Format
//!
//! ## Load
//!
//! ```text
//! Entries
//! 001 Language (3 entries)
//!     001 Records
//!         Source: language/records
//! 002 I/O (1 entry)
//!     001 Reading files
//!         Source: io/reading-files
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 English (en) → .
//!     001 language/records.html
//!     002 io/reading-files.html
//!     index.html
//!     data/snippets.json
//! 002 Español (es, 1 translated) → es
//!     ...
//! Built 2 locales, 4 pages
//! ```
//!
//! ## Check
//!
//! ```text
//! Categories
//! 001 Language (3 entries)
//!
//! Locales
//! 001 English (en): 42 strings, 0 translated entries
//!
//! Dangling references
//!     language/switch-expressions → language/missing
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::convert::{ConvertOutcome, ConvertStatus};
use crate::declarations::Declarations;
use crate::generate::{CheckReport, LocaleReport, MANIFEST_PATH};
use crate::store::ContentStore;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn entries_label(n: usize) -> String {
    if n == 1 {
        "1 entry".to_string()
    } else {
        format!("{n} entries")
    }
}

/// Format an entity header: positional index + name, with optional detail.
///
/// ```text
/// 001 Language (3 entries)
/// 001 Records
/// ```
fn entity_header(index: usize, name: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), name, d),
        None => format!("{} {}", format_index(index), name),
    }
}

/// Display a path relative to `base` when possible.
fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Load
// ============================================================================

/// Content inventory: categories in declared order with their entries.
///
/// Declared categories with no entries are omitted.
pub fn format_load_output(store: &ContentStore, declarations: &Declarations) -> Vec<String> {
    let mut lines = vec!["Entries".to_string()];
    let mut position = 0;
    for (id, name) in declarations.categories.iter() {
        let entries: Vec<_> = store.in_category(id).collect();
        if entries.is_empty() {
            continue;
        }
        position += 1;
        lines.push(entity_header(
            position,
            name,
            Some(entries_label(entries.len()).as_str()),
        ));
        for (i, entry) in entries.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), entity_header(i + 1, &entry.title, None)));
            lines.push(format!("{}Source: {}", indent(2), entry.key()));
        }
    }
    lines
}

pub fn print_load_output(store: &ContentStore, declarations: &Declarations) {
    for line in format_load_output(store, declarations) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Per-locale listing of written files, relative to the output root.
pub fn format_build_output(reports: &[LocaleReport], output_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total_pages = 0;
    for (i, report) in reports.iter().enumerate() {
        let detail = if report.translated > 0 {
            format!("{}, {} translated", report.locale, report.translated)
        } else {
            report.locale.clone()
        };
        let dir = relative(&report.dir, output_root);
        let dir = if dir.is_empty() { ".".to_string() } else { dir };
        lines.push(format!(
            "{} \u{2192} {}",
            entity_header(i + 1, &report.locale_name, Some(detail.as_str())),
            dir
        ));
        for (j, page) in report.pages.iter().enumerate() {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                format_index(j + 1),
                page.display()
            ));
        }
        lines.push(format!("{}index.html", indent(1)));
        lines.push(format!("{}{}", indent(1), MANIFEST_PATH));
        total_pages += report.pages.len();
    }
    let locale_word = if reports.len() == 1 { "locale" } else { "locales" };
    lines.push(format!(
        "Built {} {}, {} pages",
        reports.len(),
        locale_word,
        total_pages
    ));
    lines
}

pub fn print_build_output(reports: &[LocaleReport], output_root: &Path) {
    for line in format_build_output(reports, output_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(report: &CheckReport, declarations: &Declarations) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, (id, count)) in report.categories.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            declarations.category_name(id),
            Some(entries_label(*count).as_str()),
        ));
    }

    lines.push(String::new());
    lines.push("Locales".to_string());
    for (i, locale) in report.locales.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}): {} strings, {} translated entries",
            format_index(i + 1),
            locale.name,
            locale.locale,
            locale.strings,
            locale.translated
        ));
    }

    if !report.dangling.is_empty() {
        lines.push(String::new());
        lines.push("Dangling references".to_string());
        for (from, to) in &report.dangling {
            lines.push(format!("{}{} \u{2192} {}", indent(1), from, to));
        }
    }
    lines
}

pub fn print_check_output(report: &CheckReport, declarations: &Declarations) {
    for line in format_check_output(report, declarations) {
        println!("{}", line);
    }
}

// ============================================================================
// Convert
// ============================================================================

pub fn format_convert_output(outcomes: &[ConvertOutcome], content_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut written, mut verified, mut skipped, mut mismatched, mut failed) = (0, 0, 0, 0, 0);
    for (i, outcome) in outcomes.iter().enumerate() {
        let status = match &outcome.status {
            ConvertStatus::Written(dest) => {
                written += 1;
                format!("\u{2192} {}", dest.display())
            }
            ConvertStatus::Verified => {
                verified += 1;
                "verified".to_string()
            }
            ConvertStatus::Skipped => {
                skipped += 1;
                "already in target format".to_string()
            }
            ConvertStatus::Mismatch => {
                mismatched += 1;
                "MISMATCH, not converted".to_string()
            }
            ConvertStatus::Failed(reason) => {
                failed += 1;
                format!("FAILED: {reason}")
            }
        };
        lines.push(format!(
            "{} {} {}",
            format_index(i + 1),
            relative(&outcome.source, content_dir),
            status
        ));
    }
    lines.push(format!(
        "Written {written}, verified {verified}, skipped {skipped}, mismatched {mismatched}, failed {failed}"
    ));
    lines
}

pub fn print_convert_output(outcomes: &[ConvertOutcome], content_dir: &Path) {
    for line in format_convert_output(outcomes, content_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
