//! # Evolved Site
//!
//! A static site generator for catalogs of before/after code patterns,
//! published in several locales at once. Each entry is one data file; each
//! declared locale gets a complete copy of the site with untranslated text
//! falling back to the baseline locale.
//!
//! # Architecture: Load Once, Build Per Locale
//!
//! ```text
//! 1. Load     site.toml, declarations, templates, content/  →  Project
//! 2. Resolve  strings/<locale>.* + content/<locale>/...      →  LocaleBundle, translated entries
//! 3. Assemble Project + locale                               →  pages, index, snippets.json
//! ```
//!
//! Loading is all-or-nothing: a malformed entry, a missing template or a
//! missing baseline bundle aborts before anything is written. Everything
//! after that degrades per entry or per key with a logged warning instead of
//! failing the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Walks declared categories and parses entry files into an ordered, key-indexed store |
//! | [`i18n`] | Locale string bundles with baseline fallback; translated entry views |
//! | [`template`] | Bounded `{{token}}` substitution and the fixed template set |
//! | [`assemble`] | Entry and index pages: URLs, nav arrows, related cards, alternates, fragments |
//! | [`generate`] | Build driver: per-locale output, manifest, project check |
//! | [`convert`] | Entry file format conversion with round-trip verification |
//! | [`format`] | JSON/YAML codec registry selected by file extension |
//! | [`declarations`] | Ordered `id=Display Name` tables for categories and locales |
//! | [`config`] | `site.toml` loading, validation and merging over stock defaults |
//! | [`types`] | The `Entry` data model shared by every stage |
//! | [`naming`] | `category/slug` keys and slug casing |
//! | [`escape`] | HTML, JSON-LD, JavaScript and URL escaping |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Text Templates, Not Compiled Ones
//!
//! Page layouts live in plain HTML files with `{{token}}` placeholders so
//! that site maintainers can edit them without rebuilding the tool. Small
//! structural fragments with no editorial content (nav arrows, the locale
//! picker, alternate links) are generated with Maud and spliced in as
//! tokens, which keeps their escaping compile-time checked.
//!
//! ## Declared Order Everywhere
//!
//! Category and locale order come from two `.properties` files, never from
//! the filesystem. Together with lexical filename order inside a category
//! this makes every run visit entries identically, so unchanged input yields
//! byte-identical output.
//!
//! ## Closed Translation Surface
//!
//! Only a fixed set of prose fields can be translated. Code, links and
//! cross-references always come from the baseline entry, so a stale
//! translation can never break navigation.

pub mod assemble;
pub mod config;
pub mod convert;
pub mod declarations;
pub mod escape;
pub mod format;
pub mod generate;
pub mod i18n;
pub mod naming;
pub mod output;
pub mod store;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
