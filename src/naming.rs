//! Centralized naming for entry keys, slugs, and derived file names.
//!
//! Entries are addressed by a composite `category/slug` key everywhere: in
//! `related`/`prev`/`next` references, in the content store, and in URLs.
//! This module is the single place that builds and splits those keys.
//!
//! ## Proof Files
//!
//! Each entry may have a runnable proof source named after its slug in
//! PascalCase:
//! - `switch-expressions` → `SwitchExpressions`
//! - `type-inference-with-var` → `TypeInferenceWithVar`

/// Build the composite key for an entry.
pub fn entry_key(category: &str, slug: &str) -> String {
    format!("{category}/{slug}")
}

/// A parsed `category/slug` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKey<'a> {
    pub category: &'a str,
    pub slug: &'a str,
}

/// Split a composite key on its first `/`.
///
/// Returns `None` for keys without a separator or with an empty half.
pub fn parse_key(key: &str) -> Option<EntryKey<'_>> {
    let (category, slug) = key.split_once('/')?;
    if category.is_empty() || slug.is_empty() {
        return None;
    }
    Some(EntryKey { category, slug })
}

/// Convert a hyphen-delimited slug to PascalCase.
///
/// Empty segments (leading, trailing, or doubled dashes) are skipped.
pub fn slug_to_pascal_case(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}
