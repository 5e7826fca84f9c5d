//! Shared test utilities.
//!
//! Provides the fixture site copy, canned entry documents, and small
//! extractors over a loaded [`ContentStore`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let decl = load_fixture_declarations(tmp.path());
//! let store = load_all(&tmp.path().join("content"), &decl.categories).unwrap();
//!
//! assert_eq!(find_entry(&store, "language/records").title, "Records");
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::declarations::Declarations;
use crate::format;
use crate::naming;
use crate::store::ContentStore;
use crate::types::Entry;
use serde_json::{Value, json};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Category and locale tables of a fixture copy.
pub fn load_fixture_declarations(root: &Path) -> Declarations {
    let dir = root.join("html-generators");
    Declarations::load(
        &dir.join("categories.properties"),
        &dir.join("locales.properties"),
    )
    .unwrap()
}

// =========================================================================
// Canned entries
// =========================================================================

/// A complete, valid entry document with no cross-references.
pub fn entry_value(category: &str, slug: &str) -> Value {
    let name = naming::slug_to_pascal_case(slug);
    json!({
        "slug": slug,
        "category": category,
        "title": format!("{name} title"),
        "summary": format!("{name} summary"),
        "difficulty": "beginner",
        "version": "16",
        "oldLabel": "Java 8",
        "modernLabel": "Java 16+",
        "oldCode": "old();",
        "modernCode": "modern();",
        "oldApproach": "Old way",
        "modernApproach": "Modern way",
        "explanation": format!("Why {slug} matters."),
        "support": {"state": "available", "description": "Widely available"},
        "whyModernWins": [
            {"icon": "⚡", "title": "Concise", "desc": "Less code to read."}
        ],
        "docs": [
            {"title": "Reference", "href": format!("https://docs.example.org/{slug}")}
        ]
    })
}

pub fn entry(category: &str, slug: &str) -> Entry {
    serde_json::from_value(entry_value(category, slug)).unwrap()
}

/// Write [`entry_value`] to `<root>/<category>/<slug>.<ext>` in that format.
pub fn write_entry(root: &Path, category: &str, slug: &str, ext: &str) {
    let dir = root.join(category);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{slug}.{ext}"));
    let codec = format::codec_for(&path)
        .unwrap_or_else(|| panic!("no codec for extension '{ext}'"));
    let text = codec.serialize(&entry_value(category, slug)).unwrap();
    fs::write(path, text).unwrap();
}

// =========================================================================
// Store lookups: panic with a clear message on miss
// =========================================================================

/// Keys in store order.
pub fn entry_keys(store: &ContentStore) -> Vec<String> {
    store.iter().map(Entry::key).collect()
}

/// Find an entry by key. Panics if not found.
pub fn find_entry<'a>(store: &'a ContentStore, key: &str) -> &'a Entry {
    store.get(key).unwrap_or_else(|| {
        let keys = entry_keys(store);
        panic!("entry '{key}' not found. Available: {keys:?}")
    })
}

// =========================================================================
// Log capture
// =========================================================================

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a thread-local subscriber. Returns its result and the
/// plain-text log lines emitted at DEBUG and above.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
