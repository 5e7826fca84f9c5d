//! Page assembly: entry pages, the index page, and their shared fragments.
//!
//! Every page is produced the same way: build a [`Tokens`] map from the
//! locale's UI strings plus page-specific values and pre-rendered fragments,
//! then run one [`substitute`] over the page template. Fragments (nav arrows,
//! related cards, alternate links, ...) are themselves rendered from the small
//! card templates or from Maud markup.
//!
//! ## URL Scheme
//!
//! | Page | Baseline locale | Other locale |
//! |------|-----------------|--------------|
//! | Entry | `/category/slug.html` | `/es/category/slug.html` |
//! | Index | `/` | `/es/` |
//!
//! Absolute URLs prefix `base_url`. The same scheme feeds nav links, related
//! and index cards, canonical links, and `hreflang` alternates.
//!
//! ## Cross-References
//!
//! - `related` keys render in declared order; keys missing from the store are
//!   dropped without a diagnostic.
//! - A missing `prev` renders a disabled arrow; a missing `next` renders
//!   nothing at all.

use crate::config::SiteConfig;
use crate::declarations::{Declarations, OrderedTable};
use crate::escape;
use crate::i18n::{LocaleBundle, TranslationResolver};
use crate::naming;
use crate::store::ContentStore;
use crate::template::{Templates, Tokens, substitute};
use crate::types::{DocLink, Entry, WhyCard};
use maud::html;
use std::path::Path;

// ============================================================================
// URLs
// ============================================================================

/// Locale-aware URL builder.
#[derive(Debug, Clone, Copy)]
pub struct UrlScheme<'a> {
    pub base_url: &'a str,
    pub baseline: &'a str,
}

impl<'a> UrlScheme<'a> {
    pub fn new(base_url: &'a str, baseline: &'a str) -> Self {
        Self { base_url, baseline }
    }

    /// `""` for the baseline locale, `"/<locale>"` otherwise.
    pub fn prefix(&self, locale: &str) -> String {
        if locale == self.baseline {
            String::new()
        } else {
            format!("/{locale}")
        }
    }

    /// Root-relative path of an entry page.
    pub fn entry_path(&self, locale: &str, key: &str) -> String {
        format!("{}/{key}.html", self.prefix(locale))
    }

    /// Root-relative path of the index page.
    pub fn index_path(&self, locale: &str) -> String {
        format!("{}/", self.prefix(locale))
    }

    pub fn entry_url(&self, locale: &str, key: &str) -> String {
        format!("{}{}", self.base_url, self.entry_path(locale, key))
    }

    pub fn index_url(&self, locale: &str) -> String {
        format!("{}{}", self.base_url, self.index_path(locale))
    }

    /// Absolute URL of `page` under `locale`.
    pub fn page_url(&self, locale: &str, page: PageRef<'_>) -> String {
        match page {
            PageRef::Index => self.index_url(locale),
            PageRef::Entry(key) => self.entry_url(locale, key),
        }
    }
}

/// The logical page an alternate link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRef<'a> {
    Index,
    /// An entry page, by `category/slug` key.
    Entry(&'a str),
}

/// One `hreflang` link per declared locale in order, then one `x-default`
/// pointing at the baseline URL.
pub fn render_alternates(urls: &UrlScheme<'_>, locales: &OrderedTable, page: PageRef<'_>) -> String {
    let mut lines: Vec<String> = locales
        .ids()
        .map(|loc| alternate_link(loc, &urls.page_url(loc, page)))
        .collect();
    lines.push(alternate_link("x-default", &urls.page_url(urls.baseline, page)));
    lines.join("\n")
}

fn alternate_link(hreflang: &str, href: &str) -> String {
    let link = html! { link rel="alternate" hreflang=(hreflang) href=(href); };
    format!("  {}", link.into_string())
}

// ============================================================================
// Navigation
// ============================================================================

/// Previous/next arrows for an entry page.
///
/// Absent `prev` → disabled placeholder; absent `next` → empty string.
/// An empty key counts as absent.
pub fn render_nav(urls: &UrlScheme<'_>, entry: &Entry, locale: &str) -> String {
    let prev = match nav_target(&entry.prev) {
        Some(key) => html! {
            a href=(urls.entry_path(locale, key)) aria-label="Previous pattern" { "←" }
        },
        None => html! { span.nav-arrow-disabled { "←" } },
    };
    let next = match nav_target(&entry.next) {
        Some(key) => html! {
            a href=(urls.entry_path(locale, key)) aria-label="Next pattern" { "→" }
        }
        .into_string(),
        None => String::new(),
    };
    format!("{}\n          {}", prev.into_string(), next)
}

fn nav_target(key: &Option<String>) -> Option<&str> {
    key.as_deref().filter(|k| !k.is_empty())
}

// ============================================================================
// Display helpers
// ============================================================================

pub fn difficulty_display<'a>(difficulty: &'a str, strings: &'a LocaleBundle) -> &'a str {
    strings
        .get(&format!("difficulty.{difficulty}"))
        .unwrap_or(difficulty)
}

pub fn support_badge<'a>(entry: &Entry, strings: &'a LocaleBundle) -> &'a str {
    let state = &entry.support.state;
    let default = match state.badge_class() {
        "preview" => "Preview",
        "experimental" => "Experimental",
        _ => "Available",
    };
    strings.text(state.badge_key(), default)
}

/// Strip leading non-letters (flag emoji and the like) from a display name.
fn plain_locale_name(name: &str) -> &str {
    name.trim_start_matches(|c: char| !c.is_alphabetic())
}

// ============================================================================
// Card fragments
// ============================================================================

pub fn render_why_cards(template: &str, cards: &[WhyCard]) -> String {
    cards
        .iter()
        .map(|card| {
            substitute(
                template,
                &Tokens::from([
                    ("icon".to_string(), card.icon.clone()),
                    ("title".to_string(), escape::html(&card.title)),
                    ("desc".to_string(), escape::html(&card.desc)),
                ]),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_doc_links(template: &str, docs: &[DocLink]) -> String {
    docs.iter()
        .map(|doc| {
            substitute(
                template,
                &Tokens::from([
                    ("docTitle".to_string(), escape::html(&doc.title)),
                    ("docHref".to_string(), escape::html(&doc.href)),
                ]),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Site context
// ============================================================================

/// Everything page assembly reads. Shared, read-only, for a whole run.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub declarations: &'a Declarations,
    pub templates: &'a Templates,
    pub store: &'a ContentStore,
    pub resolver: &'a TranslationResolver,
    /// Directory searched for proof sources.
    pub proof_dir: &'a Path,
}

/// Tokens shared by every page of one locale.
#[derive(Debug, Clone)]
pub struct LocaleShell<'a> {
    pub locale: &'a str,
    pub strings: &'a LocaleBundle,
    tokens: Tokens,
}

impl<'a> Site<'a> {
    pub fn urls(&self) -> UrlScheme<'a> {
        UrlScheme::new(&self.config.base_url, &self.config.baseline_locale)
    }

    fn is_baseline(&self, locale: &str) -> bool {
        self.config.is_baseline(locale)
    }

    /// Build the per-locale shell: all UI strings as tokens, plus locale
    /// metadata, the locale picker, and the client-side i18n script.
    pub fn locale_shell(&self, strings: &'a LocaleBundle) -> LocaleShell<'a> {
        let locale = strings.locale();
        let mut tokens: Tokens = strings
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let html_dir = if self.config.is_rtl(locale) { "rtl" } else { "ltr" };
        tokens.extend([
            ("locale".to_string(), locale.to_string()),
            ("htmlDir".to_string(), html_dir.to_string()),
            ("ogLocale".to_string(), locale.replace('-', "_")),
            ("homeUrl".to_string(), self.urls().index_path(locale)),
            ("siteName".to_string(), escape::html(&self.config.site_name)),
            ("localePicker".to_string(), self.render_locale_picker(locale)),
            ("i18nScript".to_string(), self.render_i18n_script(strings)),
        ]);
        LocaleShell {
            locale,
            strings,
            tokens,
        }
    }

    /// Locale dropdown listing declared locales, current one marked active.
    pub fn render_locale_picker(&self, current: &str) -> String {
        html! {
            div.locale-picker #localePicker {
                button.locale-toggle type="button" aria-haspopup="listbox"
                    aria-expanded="false" aria-label="Select language" { "🌐" }
                ul role="listbox" aria-label="Language" {
                    @for (loc, name) in self.declarations.locales.iter() {
                        @let selected = loc == current;
                        li role="option" data-locale=(loc)
                            aria-selected=(if selected { "true" } else { "false" })
                            class=[selected.then_some("active")] { (name) }
                    }
                }
            }
        }
        .into_string()
    }

    /// `window.i18n` block for the client-side scripts.
    pub fn render_i18n_script(&self, strings: &LocaleBundle) -> String {
        let locale_array = self
            .declarations
            .locales
            .ids()
            .map(|loc| format!("\"{}\"", escape::js_string(loc)))
            .collect::<Vec<_>>()
            .join(", ");
        let js = |key: &str, default: &str| escape::js_string(strings.text(key, default));
        format!(
            "<script>\n  window.i18n = {{\n    locale: \"{locale}\",\n    availableLocales: [{locale_array}],\n    searchPlaceholder: \"{search}\",\n    noResults: \"{no_results}\",\n    copied: \"{copied}\",\n    expandAll: \"{expand}\",\n    collapseAll: \"{collapse}\",\n    hoverHint: \"{hover}\",\n    touchHint: \"{touch}\"\n  }};\n</script>",
            locale = escape::js_string(strings.locale()),
            search = js("search.placeholder", "Search snippets…"),
            no_results = js("search.noResults", "No results found."),
            copied = js("copy.copied", "Copied!"),
            expand = js("view.expandAll", "Expand All"),
            collapse = js("view.collapseAll", "Collapse All"),
            hover = js("cards.hoverHint", "hover to see modern →"),
            touch = js("cards.touchHint", "tap or swipe →"),
        )
    }

    /// One related card per related key present in the store, in declared
    /// order. Card text comes from the baseline entry; only the link and the
    /// hover hint follow the page's locale.
    pub fn render_related(&self, entry: &Entry, shell: &LocaleShell<'_>) -> String {
        entry
            .related
            .iter()
            .filter_map(|key| self.store.get(key))
            .map(|target| self.render_related_card(target, shell))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_related_card(&self, rel: &Entry, shell: &LocaleShell<'_>) -> String {
        let strings = shell.strings;
        let tokens = Tokens::from([
            ("category".to_string(), rel.category.clone()),
            ("slug".to_string(), rel.slug.clone()),
            (
                "catDisplay".to_string(),
                escape::html(self.declarations.category_name(&rel.category)),
            ),
            ("difficulty".to_string(), rel.difficulty.clone()),
            (
                "difficultyDisplay".to_string(),
                difficulty_display(&rel.difficulty, strings).to_string(),
            ),
            ("title".to_string(), escape::html(&rel.title)),
            ("oldLabel".to_string(), escape::html(&rel.old_label)),
            ("oldCode".to_string(), escape::html(&rel.old_code)),
            ("modernLabel".to_string(), escape::html(&rel.modern_label)),
            ("modernCode".to_string(), escape::html(&rel.modern_code)),
            ("version".to_string(), escape::html(&rel.version)),
            (
                "relatedHref".to_string(),
                self.urls().entry_path(shell.locale, &rel.key()),
            ),
            (
                "cards.hoverHintRelated".to_string(),
                strings
                    .text("cards.hoverHintRelated", "Hover to see modern ➜")
                    .to_string(),
            ),
        ]);
        substitute(&self.templates.related_card, &tokens)
    }

    pub fn render_social_share(&self, entry: &Entry, shell: &LocaleShell<'_>) -> String {
        let url = self.urls().entry_url(shell.locale, &entry.key());
        let text = format!("{} – {}", entry.title, self.config.site_name);
        let tokens = Tokens::from([
            ("encodedUrl".to_string(), escape::url_component(&url)),
            ("encodedText".to_string(), escape::url_component(&text)),
            (
                "share.label".to_string(),
                shell.strings.text("share.label", "Share").to_string(),
            ),
        ]);
        substitute(&self.templates.social_share, &tokens)
    }

    /// Link to the entry's proof source, or empty when there is none.
    pub fn render_proof_section(&self, entry: &Entry, strings: &LocaleBundle) -> String {
        if self.config.proof_url.is_empty() {
            return String::new();
        }
        let file = format!(
            "{}.{}",
            naming::slug_to_pascal_case(&entry.slug),
            self.config.proof_extension
        );
        if !self.proof_dir.join(&entry.category).join(&file).is_file() {
            return String::new();
        }
        let url = format!(
            "{}/{}/{}",
            self.config.proof_url.trim_end_matches('/'),
            entry.category,
            file
        );
        let label = strings.text("sections.proof", "Proof");
        let link_text = strings.text("sections.proofLink", "View proof source");
        html! {
            section.docs-section {
                div.section-label { (label) }
                div.docs-links {
                    a.doc-link href=(url) target="_blank" rel="noopener" { (link_text) " ↗" }
                }
            }
        }
        .into_string()
    }

    /// Prefilled issue-tracker URLs. Empty values when no tracker is configured.
    pub fn contribute_urls(&self, entry: &Entry, shell: &LocaleShell<'_>) -> [(String, String); 3] {
        let base = self.config.issues_url.as_str();
        if base.is_empty() {
            return [
                ("contributeCodeIssueUrl".to_string(), String::new()),
                ("contributeTranslationIssueUrl".to_string(), String::new()),
                ("contributeSuggestUrl".to_string(), String::new()),
            ];
        }
        let enc = escape::url_component;
        let locale_name = plain_locale_name(self.declarations.locale_name(shell.locale));
        let code = format!(
            "{base}?template=code-issue.yml&title={}&category={}&slug={}",
            enc(&format!("[Code Issue] {}", entry.title)),
            enc(&entry.category),
            enc(&entry.slug),
        );
        let translation = format!(
            "{base}?template=translation-issue.yml&title={}&locale={}&pattern={}&area={}",
            enc(&format!("[Translation] {} ({locale_name})", entry.title)),
            enc(shell.locale),
            enc(&entry.slug),
            enc("Pattern content"),
        );
        let suggest = format!("{base}?template=new-pattern.yml");
        [
            ("contributeCodeIssueUrl".to_string(), escape::html(&code)),
            (
                "contributeTranslationIssueUrl".to_string(),
                escape::html(&translation),
            ),
            ("contributeSuggestUrl".to_string(), escape::html(&suggest)),
        ]
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Full HTML for one entry page under the shell's locale.
    pub fn assemble_entry_page(&self, entry: &Entry, shell: &LocaleShell<'_>) -> String {
        let locale = shell.locale;
        let strings = shell.strings;
        let data = self.resolver.resolve_entry(entry, locale);
        let key = data.key();
        let urls = self.urls();
        let cat_display = self.declarations.category_name(&data.category);
        let base_prefix = if self.is_baseline(locale) { "../" } else { "../../" };

        let mut tokens = shell.tokens.clone();
        tokens.extend([
            ("title".to_string(), escape::html(&data.title)),
            ("summary".to_string(), escape::html(&data.summary)),
            ("slug".to_string(), data.slug.clone()),
            ("category".to_string(), data.category.clone()),
            ("categoryDisplay".to_string(), escape::html(cat_display)),
            ("difficulty".to_string(), data.difficulty.clone()),
            (
                "difficultyDisplay".to_string(),
                difficulty_display(&data.difficulty, strings).to_string(),
            ),
            ("version".to_string(), escape::html(&data.version)),
            ("oldLabel".to_string(), escape::html(&data.old_label)),
            ("modernLabel".to_string(), escape::html(&data.modern_label)),
            ("oldCode".to_string(), escape::html(&data.old_code)),
            ("modernCode".to_string(), escape::html(&data.modern_code)),
            ("oldApproach".to_string(), escape::html(&data.old_approach)),
            ("modernApproach".to_string(), escape::html(&data.modern_approach)),
            ("explanation".to_string(), escape::html(&data.explanation)),
            (
                "supportDescription".to_string(),
                escape::html(&data.support.description),
            ),
            (
                "supportBadge".to_string(),
                support_badge(&data, strings).to_string(),
            ),
            (
                "supportBadgeClass".to_string(),
                data.support.state.badge_class().to_string(),
            ),
            ("canonicalUrl".to_string(), urls.entry_url(locale, &key)),
            ("basePrefix".to_string(), base_prefix.to_string()),
            ("titleJson".to_string(), escape::json_string(&data.title)),
            ("summaryJson".to_string(), escape::json_string(&data.summary)),
            (
                "categoryDisplayJson".to_string(),
                escape::json_string(cat_display),
            ),
            (
                "hreflangLinks".to_string(),
                render_alternates(&urls, &self.declarations.locales, PageRef::Entry(&key)),
            ),
            ("navArrows".to_string(), render_nav(&urls, &data, locale)),
            (
                "whyCards".to_string(),
                render_why_cards(&self.templates.why_card, &data.why_modern_wins),
            ),
            (
                "docLinks".to_string(),
                render_doc_links(&self.templates.doc_link, &data.docs),
            ),
            (
                "proofSection".to_string(),
                self.render_proof_section(&data, strings),
            ),
            ("relatedCards".to_string(), self.render_related(&data, shell)),
            (
                "socialShare".to_string(),
                self.render_social_share(&data, shell),
            ),
        ]);
        tokens.extend(self.contribute_urls(&data, shell));

        substitute(&self.templates.page, &tokens)
    }

    fn render_index_card(&self, entry: &Entry, shell: &LocaleShell<'_>) -> String {
        let data = self.resolver.resolve_entry(entry, shell.locale);
        let strings = shell.strings;
        let tokens = Tokens::from([
            ("category".to_string(), data.category.clone()),
            ("slug".to_string(), data.slug.clone()),
            (
                "catDisplay".to_string(),
                escape::html(self.declarations.category_name(&data.category)),
            ),
            ("title".to_string(), escape::html(&data.title)),
            ("summary".to_string(), escape::html(&data.summary)),
            ("difficulty".to_string(), data.difficulty.clone()),
            (
                "difficultyDisplay".to_string(),
                difficulty_display(&data.difficulty, strings).to_string(),
            ),
            ("oldCode".to_string(), escape::html(&data.old_code)),
            ("modernCode".to_string(), escape::html(&data.modern_code)),
            ("version".to_string(), escape::html(&data.version)),
            (
                "cardHref".to_string(),
                self.urls().entry_path(shell.locale, &data.key()),
            ),
            (
                "cards.old".to_string(),
                strings.text("cards.old", "Old").to_string(),
            ),
            (
                "cards.modern".to_string(),
                strings.text("cards.modern", "Modern").to_string(),
            ),
            (
                "cards.hoverHint".to_string(),
                strings
                    .text("cards.hoverHint", "hover to see modern →")
                    .to_string(),
            ),
            (
                "cards.learnMore".to_string(),
                strings.text("cards.learnMore", "learn more").to_string(),
            ),
        ]);
        substitute(&self.templates.index_card, &tokens)
    }

    /// Full HTML for the index page under the shell's locale.
    pub fn assemble_index_page(&self, shell: &LocaleShell<'_>) -> String {
        let locale = shell.locale;
        let urls = self.urls();
        let tip_cards = self
            .store
            .iter()
            .map(|entry| self.render_index_card(entry, shell))
            .collect::<Vec<_>>()
            .join("\n");
        let index_prefix = if self.is_baseline(locale) { "" } else { "../" };

        let mut tokens = shell.tokens.clone();
        tokens.extend([
            ("tipCards".to_string(), tip_cards),
            ("snippetCount".to_string(), self.store.len().to_string()),
            ("canonicalUrl".to_string(), urls.index_url(locale)),
            ("indexBasePrefix".to_string(), index_prefix.to_string()),
            (
                "hreflangLinks".to_string(),
                render_alternates(&urls, &self.declarations.locales, PageRef::Index),
            ),
        ]);
        substitute(&self.templates.index, &tokens)
    }
}
