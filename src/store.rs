//! Content discovery and indexing.
//!
//! First stage of the build. Walks the content directory one declared category
//! at a time and parses every entry file into an [`Entry`], producing a
//! [`ContentStore`] keyed by `category/slug`.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── language/                    # One directory per declared category
//! │   ├── records.json
//! │   ├── sealed-classes.yaml      # Formats can be mixed freely
//! │   └── switch-expressions.yml
//! └── io/
//!     └── reading-files.json
//! ```
//!
//! ## Ordering
//!
//! Store order is (declared category order, then lexical filename order). It
//! is the single source of truth for page iteration and index card order, so
//! two runs over unchanged input always visit entries identically.
//!
//! ## Validation
//!
//! - A malformed entry file aborts the load, naming the file.
//! - Undeclared category directories are ignored; declared but missing ones
//!   are skipped.
//! - A key seen twice keeps its first position and takes the later entry,
//!   with a warning.

use crate::declarations::OrderedTable;
use crate::format::{self, FormatError};
use crate::naming;
use crate::types::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot list {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("Malformed entry file {path}: {source}")]
    Parse { path: PathBuf, source: FormatError },
}

/// Ordered, key-indexed collection of baseline entries.
///
/// Read-only once loaded; shared by reference across every locale build.
#[derive(Debug, Default)]
pub struct ContentStore {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ContentStore {
    /// Build a store from entries already in the desired order.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut store = Self::default();
        for entry in entries {
            store.insert(entry);
        }
        store
    }

    /// Insert an entry, returning the one it replaced, if any.
    fn insert(&mut self, entry: Entry) -> Option<Entry> {
        let key = entry.key();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], entry)),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Entries in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Entries of one category, in store order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Entry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every `related`/`prev`/`next` reference whose target is not in the store,
    /// as `(from_key, to_key)` pairs in store order.
    ///
    /// Rendering drops these silently; this is for the `check` command.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut dangling = Vec::new();
        for entry in &self.entries {
            let targets = references(entry);
            for target in targets {
                if !self.contains(target) {
                    dangling.push((entry.key(), target.clone()));
                }
            }
        }
        dangling
    }

    /// References that are not even shaped like `category/slug`.
    pub fn malformed_references(&self) -> Vec<(String, String)> {
        let mut malformed = Vec::new();
        for entry in &self.entries {
            let targets = references(entry);
            for target in targets {
                if naming::parse_key(target).is_none() {
                    malformed.push((entry.key(), target.clone()));
                }
            }
        }
        malformed
    }
}

/// Every cross-reference an entry makes. Empty `prev`/`next` count as absent.
fn references(entry: &Entry) -> impl Iterator<Item = &String> {
    let nav = entry.prev.iter().chain(entry.next.iter()).filter(|k| !k.is_empty());
    entry.related.iter().chain(nav)
}

/// Load every entry of every declared category.
pub fn load_all(content_dir: &Path, categories: &OrderedTable) -> Result<ContentStore, StoreError> {
    let mut store = ContentStore::default();

    for category in categories.ids() {
        let cat_dir = content_dir.join(category);
        if !cat_dir.is_dir() {
            tracing::debug!(category, "no content directory, skipping");
            continue;
        }

        for path in entry_files(&cat_dir)? {
            let entry: Entry = format::read(&path).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
            let key = entry.key();
            if store.insert(entry).is_some() {
                tracing::warn!(
                    key = %key,
                    path = %path.display(),
                    "duplicate entry key; later file replaces the earlier entry"
                );
            }
        }
    }

    Ok(store)
}

/// Data files directly inside `dir`, in lexical filename order.
pub(crate) fn entry_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut files = Vec::new();
    for item in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let item = item.map_err(|source| StoreError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = item.into_path();
        let hidden = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if !hidden && format::is_data_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}
