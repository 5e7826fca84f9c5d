//! Flat `{{token}}` substitution and the fixed template set.
//!
//! Templates are plain text with `{{name}}` placeholders, where a name is a
//! run of word characters and dots (`{{title}}`, `{{nav.home}}`). There is no
//! control flow: a template is filled from a value mapping and nothing else.
//!
//! ## Bounded Fixed Point
//!
//! Replacement values may themselves contain tokens (a localized phrase such
//! as `"{{snippetCount}} patterns"`), so substitution repeats full passes over
//! the text, up to [`MAX_PASSES`], stopping early after a pass that replaced
//! nothing. Chains deeper than that, including self-references, are left
//! partially unresolved instead of looping. Tokens missing from the mapping
//! stay in the output verbatim.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Maximum number of scan-and-replace passes per substitution.
pub const MAX_PASSES: usize = 3;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([\w.]+)\}\}").expect("token pattern is valid"));

/// Token name → replacement text.
pub type Tokens = HashMap<String, String>;

/// Replace `{{token}}` placeholders from `values`, repeating up to
/// [`MAX_PASSES`] times.
pub fn substitute(template: &str, values: &Tokens) -> String {
    let mut text = template.to_string();
    for _ in 0..MAX_PASSES {
        let mut replaced = false;
        let next = TOKEN.replace_all(&text, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => {
                replaced = true;
                value.clone()
            }
            None => caps[0].to_string(),
        });
        if !replaced {
            break;
        }
        text = next.into_owned();
    }
    text
}

/// Token names referenced by a template, in first-appearance order.
pub fn token_names(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in TOKEN.captures_iter(template) {
        if let Some(m) = caps.get(1)
            && !names.contains(&m.as_str())
        {
            names.push(m.as_str());
        }
    }
    names
}

// ============================================================================
// Template set
// ============================================================================

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Missing template {0}")]
    Missing(PathBuf),
    #[error("Cannot read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The fixed set of named templates a build needs.
#[derive(Debug, Clone)]
pub struct Templates {
    pub page: String,
    pub why_card: String,
    pub related_card: String,
    pub social_share: String,
    pub index: String,
    pub index_card: String,
    pub doc_link: String,
}

impl Templates {
    /// File names, in load order.
    pub const FILES: [&'static str; 7] = [
        "slug-template.html",
        "why-card.html",
        "related-card.html",
        "social-share.html",
        "index.html",
        "index-card.html",
        "doc-link.html",
    ];

    /// Load all templates from `dir`. Any missing file is fatal.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let read = |name: &str| -> Result<String, TemplateError> {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(TemplateError::Missing(path));
            }
            fs::read_to_string(&path).map_err(|source| TemplateError::Io { path, source })
        };
        let [page, why, related, social, index, index_card, doc] = Self::FILES;
        Ok(Self {
            page: read(page)?,
            why_card: read(why)?,
            related_card: read(related)?,
            social_share: read(social)?,
            index: read(index)?,
            index_card: read(index_card)?,
            doc_link: read(doc)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens(pairs: &[(&str, &str)]) -> Tokens {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_known_tokens() {
        let out = substitute(
            "<h1>{{title}}</h1><p>{{summary}}</p>",
            &tokens(&[("title", "Records"), ("summary", "Less boilerplate")]),
        );
        assert_eq!(out, "<h1>Records</h1><p>Less boilerplate</p>");
    }

    #[test]
    fn dotted_tokens() {
        let out = substitute("{{nav.home}}", &tokens(&[("nav.home", "Inicio")]));
        assert_eq!(out, "Inicio");
    }

    #[test]
    fn unknown_tokens_stay_literal() {
        let out = substitute("{{known}} {{unknown}}", &tokens(&[("known", "yes")]));
        assert_eq!(out, "yes {{unknown}}");
    }

    #[test]
    fn partial_delimiters_are_literal() {
        let t = tokens(&[("a", "A")]);
        assert_eq!(substitute("{a} {{a} {a}} {{ a }}", &t), "{a} {{a} {a}} {{ a }}");
        assert_eq!(substitute("{{{a}}}", &t), "{A}");
    }

    #[test]
    fn nested_value_resolves_within_bound() {
        let t = tokens(&[
            ("heading", "{{cards.count}}"),
            ("cards.count", "{{snippetCount}} patterns"),
            ("snippetCount", "42"),
        ]);
        assert_eq!(substitute("<h2>{{heading}}</h2>", &t), "<h2>42 patterns</h2>");
    }

    #[test]
    fn chain_deeper_than_bound_left_partial() {
        let t = tokens(&[("a", "{{b}}"), ("b", "{{c}}"), ("c", "{{d}}"), ("d", "end")]);
        assert_eq!(substitute("{{a}}", &t), "{{d}}");
    }

    #[test]
    fn self_reference_terminates_as_literal() {
        let t = tokens(&[("loop", "{{loop}}")]);
        assert_eq!(substitute("x {{loop}} y", &t), "x {{loop}} y");
    }

    #[test]
    fn mutual_reference_terminates() {
        let t = tokens(&[("ping", "{{pong}}"), ("pong", "{{ping}}")]);
        assert_eq!(substitute("{{ping}}", &t), "{{pong}}");
    }

    #[test]
    fn no_tokens_returns_input() {
        assert_eq!(substitute("plain text", &Tokens::new()), "plain text");
        assert_eq!(substitute("", &Tokens::new()), "");
    }

    #[test]
    fn replacement_text_is_not_reinterpreted_as_regex() {
        let t = tokens(&[("price", "$1 and ${name}")]);
        assert_eq!(substitute("{{price}}", &t), "$1 and ${name}");
    }

    #[test]
    fn token_names_in_order_without_duplicates() {
        assert_eq!(
            token_names("{{b}} {{a.x}} {{b}} {c}"),
            vec!["b", "a.x"]
        );
    }

    // =========================================================================
    // Template loading
    // =========================================================================

    fn write_all_templates(dir: &Path) {
        for name in Templates::FILES {
            fs::write(dir.join(name), format!("<!-- {name} -->")).unwrap();
        }
    }

    #[test]
    fn load_reads_every_template() {
        let tmp = TempDir::new().unwrap();
        write_all_templates(tmp.path());

        let templates = Templates::load(tmp.path()).unwrap();
        assert_eq!(templates.page, "<!-- slug-template.html -->");
        assert_eq!(templates.doc_link, "<!-- doc-link.html -->");
    }

    #[test]
    fn missing_template_is_fatal() {
        let tmp = TempDir::new().unwrap();
        write_all_templates(tmp.path());
        fs::remove_file(tmp.path().join("related-card.html")).unwrap();

        match Templates::load(tmp.path()) {
            Err(TemplateError::Missing(path)) => assert!(path.ends_with("related-card.html")),
            other => panic!("expected missing template, got {other:?}"),
        }
    }
}
