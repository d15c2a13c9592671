//! On-page feature extraction: one fetched document in, one [`Page`] out.

use crate::config::ExtractorOptions;
use crate::parsers::ParserType;
use crate::parsers::html::{self, HtmlDocument, RawAnchor};
use crate::parsers::text::{NgramCounts, TokenFilter, fold_for_hash};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use url::Url;

/// Anchor texts that say nothing about the target
pub const GENERIC_ANCHOR_TEXT: &[&str] = &[
    "click here",
    "read more",
    "learn more",
    "more",
    "here",
    "link",
    "this page",
    "continue",
    "go",
    "page",
    "article",
];

const IGNORED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Meta tags kept in the extra-tag inventory besides `og:*` and `twitter:*`
const EXTRA_META: &[&str] = &["robots", "viewport", "keywords", "author", "generator"];

/// A resolved link found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: Option<String>,
    pub has_alt: bool,
}

/// Presence of the Open Graph tags social previews rely on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    pub title: bool,
    pub description: bool,
    pub image: bool,
}

/// Settings shared by every page of a run
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub thresholds: ExtractorOptions,
    pub token_filter: TokenFilter,
    pub analyze_headings: bool,
    pub analyze_extra_tags: bool,
}

impl PageOptions {
    pub fn new(thresholds: ExtractorOptions, analyze_headings: bool, analyze_extra_tags: bool) -> Self {
        let token_filter = TokenFilter::new(thresholds.min_word_length, &thresholds.extra_stop_words);
        Self {
            thresholds,
            token_filter,
            analyze_headings,
            analyze_extra_tags,
        }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::new(ExtractorOptions::default(), false, false)
    }
}

/// Features extracted from one fetched document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Normalized URL the page was fetched from
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Number of H1..H6 elements
    pub heading_counts: [usize; 6],
    /// Heading texts keyed `h1`..`h6`, only filled when headings are analyzed
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub headings: BTreeMap<String, Vec<String>>,
    pub internal_links: Vec<Link>,
    pub external_links: Vec<Link>,
    pub images: Vec<Image>,
    pub open_graph: OpenGraph,
    /// Canonical, robots and social meta tags, only filled when extra tags are analyzed
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extra_tags: BTreeMap<String, String>,
    /// Visible text, whitespace-collapsed
    pub content: String,
    /// Tokens counted after stop-word filtering
    pub word_count: usize,
    /// SHA-256 of the normalized visible text; `None` when nothing could be extracted
    pub content_hash: Option<String>,
    #[serde(skip)]
    pub counts: NgramCounts,
    pub warnings: Vec<String>,
}

impl Page {
    /// Run feature extraction over a fetched body
    pub fn analyze(url: &str, body: &str, parser_type: ParserType, options: &PageOptions) -> Self {
        Self::analyze_at(url, url, body, parser_type, options)
    }

    /// Like [`Page::analyze`] for a body served from `base_url` after redirects.
    /// Links resolve against `base_url`; the page keeps `url` as its key.
    pub fn analyze_at(
        url: &str,
        base_url: &str,
        body: &str,
        parser_type: ParserType,
        options: &PageOptions,
    ) -> Self {
        if !parser_type.is_analyzable() {
            return Self::unextractable(url, &format!("unsupported document type ({parser_type:?})"));
        }
        if body.trim().is_empty() {
            return Self::unextractable(url, "empty document");
        }

        let doc = html::parse(body);
        let mut page = Self {
            url: url.to_string(),
            ..Self::default()
        };

        page.analyze_title(&doc, &options.thresholds);
        page.analyze_description(&doc, &options.thresholds);
        page.analyze_headings(&doc, options);
        page.analyze_images(&doc);
        page.analyze_links(&doc, base_url);
        page.analyze_open_graph(&doc);
        if options.analyze_extra_tags {
            page.collect_extra_tags(&doc);
        }

        page.counts = NgramCounts::from_text(&doc.text, &options.token_filter);
        page.word_count = page.counts.token_count;
        page.content_hash = Some(content_hash(&doc.text));
        page.content = doc.text;

        page
    }

    /// Empty feature set plus a warning saying why
    fn unextractable(url: &str, reason: &str) -> Self {
        ::log::debug!("No features extracted from {}: {}", url, reason);
        Self {
            url: url.to_string(),
            warnings: vec![format!("Unable to extract page features: {reason}")],
            ..Self::default()
        }
    }

    fn warn(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    fn analyze_title(&mut self, doc: &HtmlDocument, limits: &ExtractorOptions) {
        match &doc.title {
            None => self.warn("Missing title tag".to_string()),
            Some(title) => {
                let len = title.chars().count();
                if len < limits.title_min {
                    self.warn(format!(
                        "Title tag is too short (less than {} characters): {}",
                        limits.title_min, title
                    ));
                } else if len > limits.title_max {
                    self.warn(format!(
                        "Title tag is too long (more than {} characters): {}",
                        limits.title_max, title
                    ));
                }
            }
        }
        self.title = doc.title.clone();
    }

    fn analyze_description(&mut self, doc: &HtmlDocument, limits: &ExtractorOptions) {
        let description = doc
            .meta_content("description")
            .filter(|d| !d.is_empty())
            .map(|d| d.to_string());

        match &description {
            None => self.warn("Missing description".to_string()),
            Some(desc) => {
                let len = desc.chars().count();
                if len < limits.description_min {
                    self.warn(format!(
                        "Description is too short (less than {} characters): {}",
                        limits.description_min, desc
                    ));
                } else if len > limits.description_max {
                    self.warn(format!(
                        "Description is too long (more than {} characters): {}",
                        limits.description_max, desc
                    ));
                }
            }
        }
        self.description = description;
    }

    fn analyze_headings(&mut self, doc: &HtmlDocument, options: &PageOptions) {
        for (level, texts) in doc.headings.iter().enumerate() {
            self.heading_counts[level] = texts.len();
            if options.analyze_headings && !texts.is_empty() {
                self.headings.insert(format!("h{}", level + 1), texts.clone());
            }
        }

        let h1 = self.heading_counts[0];
        if h1 == 0 {
            self.warn("Each page should have at least one h1 tag".to_string());
        } else if h1 > 1 {
            self.warn(format!("Page has more than one h1 tag ({h1})"));
        }

        let limits = &options.thresholds;
        let h2 = self.heading_counts[1];
        if h2 < limits.h2_min || h2 > limits.h2_max {
            self.warn(format!(
                "Number of h2 tags is outside the recommended range ({}-{}): {}",
                limits.h2_min, limits.h2_max, h2
            ));
        }
    }

    fn analyze_images(&mut self, doc: &HtmlDocument) {
        self.images = doc
            .images
            .iter()
            .map(|img| Image {
                src: img.src.clone(),
                has_alt: img.alt.is_some(),
            })
            .collect();

        let missing = self.images.iter().filter(|i| !i.has_alt).count();
        if missing > 0 {
            self.warn(format!("Image missing alt tag ({missing} images)"));
        }
    }

    fn analyze_links(&mut self, doc: &HtmlDocument, base_url: &str) {
        let Ok(base) = Url::parse(base_url) else {
            return;
        };
        let host = base.host_str().map(|h| h.to_ascii_lowercase());

        for anchor in &doc.anchors {
            let Some(resolved) = resolve_anchor(&base, anchor) else {
                continue;
            };

            let text = anchor.text.to_lowercase();
            if GENERIC_ANCHOR_TEXT.contains(&text.trim()) {
                self.warn(format!("Anchor text contains generic text: {}", anchor.text));
            }
            if anchor.title.is_none() {
                self.warn(format!("Anchor missing title tag: {}", anchor.href));
            }

            let link = Link {
                url: resolved.to_string(),
                text: anchor.text.clone(),
                title: anchor.title.clone(),
            };
            let internal = resolved.host_str().map(|h| h.to_ascii_lowercase()) == host;
            if internal {
                self.internal_links.push(link);
            } else {
                self.external_links.push(link);
            }
        }
    }

    fn analyze_open_graph(&mut self, doc: &HtmlDocument) {
        let present = |key: &str| doc.meta_content(key).is_some_and(|c| !c.is_empty());
        self.open_graph = OpenGraph {
            title: present("og:title"),
            description: present("og:description"),
            image: present("og:image"),
        };

        if !self.open_graph.title {
            self.warn("Missing og:title".to_string());
        }
        if !self.open_graph.description {
            self.warn("Missing og:description".to_string());
        }
        if !self.open_graph.image {
            self.warn("Missing og:image".to_string());
        }
    }

    fn collect_extra_tags(&mut self, doc: &HtmlDocument) {
        if let Some(canonical) = &doc.canonical {
            self.extra_tags.insert("canonical".to_string(), canonical.clone());
        }
        for meta in &doc.meta {
            let kept = meta.key.starts_with("og:")
                || meta.key.starts_with("twitter:")
                || EXTRA_META.contains(&meta.key.as_str());
            if kept {
                self.extra_tags
                    .entry(meta.key.clone())
                    .or_insert_with(|| meta.content.clone());
            }
        }
    }

    /// Internal link targets with fragments removed
    pub fn internal_targets(&self) -> impl Iterator<Item = &str> {
        self.internal_links.iter().map(|l| l.url.as_str())
    }
}

/// Hex SHA-256 over case-folded, whitespace-collapsed text
pub fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(fold_for_hash(text).as_bytes());
    format!("{digest:x}")
}

/// Absolute, fragment-free target of an anchor; `None` for non-navigational hrefs
fn resolve_anchor(base: &Url, anchor: &RawAnchor) -> Option<Url> {
    let href = anchor.href.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty() || href.starts_with('#') || IGNORED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return None;
    }
    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "A complete guide to hand-made ceramics: choosing clay, \
        shaping bowls and mugs, glazing, and firing them safely in a small home kiln.";

    fn html_page(head: &str, body: &str) -> String {
        format!("<html><head>{head}</head><body>{body}</body></html>")
    }

    fn complete_head() -> String {
        format!(
            r#"<title>Hand-made ceramics: a beginner's studio guide</title>
            <meta name="description" content="{DESCRIPTION}">
            <meta property="og:title" content="Ceramics">
            <meta property="og:description" content="Guide">
            <meta property="og:image" content="https://example.com/bowl.png">"#
        )
    }

    fn analyze(html: &str) -> Page {
        Page::analyze("https://example.com/guide", html, ParserType::Html, &PageOptions::default())
    }

    #[test]
    fn test_clean_page_has_no_warnings() {
        let page = analyze(&html_page(
            &complete_head(),
            r#"<h1>Ceramics</h1><h2>Clay</h2><p>Text</p><img src="a.png" alt="bowl">"#,
        ));
        assert!(page.warnings.is_empty(), "unexpected warnings: {:?}", page.warnings);
        assert_eq!(page.heading_counts, [1, 1, 0, 0, 0, 0]);
        assert!(page.headings.is_empty());
    }

    #[test]
    fn test_title_warnings() {
        let missing = analyze(&html_page("", "<h1>x</h1><h2>y</h2>"));
        assert!(missing.warnings.contains(&"Missing title tag".to_string()));

        let short = analyze(&html_page("<title>Short</title>", ""));
        assert!(short.warnings.iter().any(|w| w.starts_with("Title tag is too short")));

        let long_title = "x".repeat(61);
        let long = analyze(&html_page(&format!("<title>{long_title}</title>"), ""));
        assert!(long.warnings.iter().any(|w| w.starts_with("Title tag is too long")));
    }

    #[test]
    fn test_description_warnings() {
        let page = analyze(&html_page(r#"<meta name="description" content="tiny">"#, ""));
        assert!(page.warnings.iter().any(|w| w.starts_with("Description is too short")));

        let page = analyze(&html_page(r#"<meta name="description" content="">"#, ""));
        assert!(page.warnings.contains(&"Missing description".to_string()));
    }

    #[test]
    fn test_heading_warnings() {
        let none = analyze(&html_page(&complete_head(), "<h2>a</h2>"));
        assert!(none.warnings.contains(&"Each page should have at least one h1 tag".to_string()));

        let two = analyze(&html_page(&complete_head(), "<h1>a</h1><h1>b</h1><h2>c</h2>"));
        assert_eq!(two.warnings, vec!["Page has more than one h1 tag (2)"]);

        let h2s = "<h2>x</h2>".repeat(7);
        let many = analyze(&html_page(&complete_head(), &format!("<h1>a</h1>{h2s}")));
        assert_eq!(
            many.warnings,
            vec!["Number of h2 tags is outside the recommended range (1-6): 7"]
        );
    }

    #[test]
    fn test_heading_texts_kept_only_when_requested() {
        let options = PageOptions::new(ExtractorOptions::default(), true, false);
        let page = Page::analyze(
            "https://example.com/",
            &html_page("", "<h1>Top</h1><h3>Deep</h3>"),
            ParserType::Html,
            &options,
        );
        assert_eq!(page.headings["h1"], vec!["Top"]);
        assert_eq!(page.headings["h3"], vec!["Deep"]);
        assert!(!page.headings.contains_key("h2"));
    }

    #[test]
    fn test_image_alt_counter() {
        let page = analyze(&html_page(
            &complete_head(),
            r#"<h1>a</h1><h2>b</h2><img src="1.png"><img src="2.png" alt=""><img src="3.png">"#,
        ));
        assert_eq!(page.warnings, vec!["Image missing alt tag (2 images)"]);
        assert_eq!(page.images.len(), 3);
    }

    #[test]
    fn test_links_are_classified_by_host() {
        let page = analyze(&html_page(
            &complete_head(),
            r##"<h1>a</h1><h2>b</h2>
            <a href="/kilns#top" title="Kilns">Kilns</a>
            <a href="https://example.com/clay" title="Clay">Clay</a>
            <a href="https://shop.other.com/" title="Shop">Shop</a>
            <a href="#top">Top</a>
            <a href="mailto:hi@example.com">Mail</a>"##,
        ));
        let internal: Vec<_> = page.internal_targets().collect();
        assert_eq!(internal, vec!["https://example.com/kilns", "https://example.com/clay"]);
        assert_eq!(page.external_links.len(), 1);
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_generic_and_untitled_anchors() {
        let page = analyze(&html_page(
            &complete_head(),
            r#"<h1>a</h1><h2>b</h2><a href="/next"> Read More </a>"#,
        ));
        assert_eq!(
            page.warnings,
            vec![
                "Anchor text contains generic text: Read More",
                "Anchor missing title tag: /next",
            ]
        );
    }

    #[test]
    fn test_open_graph_warnings() {
        let page = analyze(&html_page(
            r#"<meta property="og:title" content="T">"#,
            "<h1>a</h1><h2>b</h2>",
        ));
        assert!(page.open_graph.title);
        assert!(!page.warnings.contains(&"Missing og:title".to_string()));
        assert!(page.warnings.contains(&"Missing og:description".to_string()));
        assert!(page.warnings.contains(&"Missing og:image".to_string()));
    }

    #[test]
    fn test_extra_tags_inventory() {
        let options = PageOptions::new(ExtractorOptions::default(), false, true);
        let page = Page::analyze(
            "https://example.com/",
            &html_page(
                r#"<link rel="canonical" href="https://example.com/">
                <meta name="robots" content="index,follow">
                <meta name="twitter:card" content="summary">
                <meta name="description" content="ignored here">"#,
                "",
            ),
            ParserType::Html,
            &options,
        );
        assert_eq!(page.extra_tags["canonical"], "https://example.com/");
        assert_eq!(page.extra_tags["robots"], "index,follow");
        assert_eq!(page.extra_tags["twitter:card"], "summary");
        assert!(!page.extra_tags.contains_key("description"));
    }

    #[test]
    fn test_content_hash_ignores_markup_and_whitespace() {
        let a = analyze(&html_page("", "<p>Hello   <b>World</b></p>"));
        let b = analyze(&html_page("<title>other</title>", "<div>hello\n world</div>"));
        let c = analyze(&html_page("", "<p>Hello Worlds</p>"));
        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.content_hash, c.content_hash);
    }

    #[test]
    fn test_links_resolve_against_redirect_target() {
        let page = Page::analyze_at(
            "https://example.com/blog",
            "https://www.example.com/blog/",
            &html_page("", r#"<a href="post-1" title="Post">Post</a><a href="https://www.example.com/about" title="About">About</a>"#),
            ParserType::Html,
            &PageOptions::default(),
        );
        assert_eq!(page.url, "https://example.com/blog");
        let internal: Vec<_> = page.internal_targets().collect();
        assert_eq!(
            internal,
            vec!["https://www.example.com/blog/post-1", "https://www.example.com/about"]
        );
        assert!(page.external_links.is_empty());
    }

    #[test]
    fn test_content_hash_ignores_inline_tags_inside_words() {
        let a = analyze(&html_page("", "<p>Hello<b>World</b></p>"));
        let b = analyze(&html_page("", "<p>HelloWorld</p>"));
        assert_eq!(a.content, "HelloWorld");
        assert_eq!(a.content_hash, b.content_hash);
    }

    #[test]
    fn test_word_counts() {
        let page = analyze(&html_page("", "<p>Stoneware glaze. Stoneware glaze!</p>"));
        assert_eq!(page.word_count, 4);
        assert_eq!(page.counts.words["stoneware"], 2);
        assert_eq!(page.counts.bigrams["stoneware glaze"], 2);
    }

    #[test]
    fn test_unextractable_documents() {
        let empty = analyze("   ");
        assert_eq!(empty.warnings, vec!["Unable to extract page features: empty document"]);
        assert_eq!(empty.content_hash, None);

        let pdf = Page::analyze(
            "https://example.com/a.pdf",
            "%PDF-1.4",
            ParserType::Other,
            &PageOptions::default(),
        );
        assert_eq!(pdf.warnings.len(), 1);
        assert!(pdf.warnings[0].starts_with("Unable to extract page features: unsupported"));
    }
}
