//! Declared category and locale order.
//!
//! Two `.properties`-style files drive iteration order for the whole build:
//!
//! ```text
//! # categories.properties        # locales.properties
//! language=Language              en=English
//! collections=Collections        es=Español
//! io=I/O                         ar=العربية
//! ```
//!
//! One `id=Display Name` pair per line; blank lines and `#` comments are
//! skipped; the first `=` splits key from value. Line order is significant:
//! categories load in this order (and so navigation follows it), locales build
//! and list alternates in this order.
//!
//! Both tables are loaded once and passed explicitly to every component that
//! iterates them.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeclarationError {
    #[error("Cannot read declaration file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Declaration file {0} declares nothing")]
    Empty(PathBuf),
}

/// An ordered `id → display name` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedTable {
    pairs: Vec<(String, String)>,
}

impl OrderedTable {
    /// Parse `.properties` text. A repeated id keeps its first position and
    /// takes the last value.
    pub fn parse(text: &str) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = value.trim().to_string();
            match pairs.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value,
                None => pairs.push((key.to_string(), value)),
            }
        }
        Self { pairs }
    }

    pub fn load(path: &Path) -> Result<Self, DeclarationError> {
        let text = fs::read_to_string(path).map_err(|source| DeclarationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&text);
        if table.is_empty() {
            return Err(DeclarationError::Empty(path.to_path_buf()));
        }
        Ok(table)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Category and locale order for one run.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    pub categories: OrderedTable,
    pub locales: OrderedTable,
}

impl Declarations {
    pub fn load(categories: &Path, locales: &Path) -> Result<Self, DeclarationError> {
        Ok(Self {
            categories: OrderedTable::load(categories)?,
            locales: OrderedTable::load(locales)?,
        })
    }

    /// Display name for a category; the id itself when undeclared.
    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories.get(id).unwrap_or(id)
    }

    /// Display name for a locale; the id itself when undeclared.
    pub fn locale_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.locales.get(id).unwrap_or(id)
    }
}
