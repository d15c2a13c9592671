use crate::parsers::text::normalize_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta"));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| selector("link[rel]"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static HEADINGS: LazyLock<[Selector; 6]> = LazyLock::new(|| {
    [
        selector("h1"),
        selector("h2"),
        selector("h3"),
        selector("h4"),
        selector("h5"),
        selector("h6"),
    ]
});

/// Elements whose text never reaches the reader
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];

/// Elements that start a new line of text when rendered
const BLOCK: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// An `<a href>` as written in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnchor {
    pub href: String,
    pub text: String,
    pub title: Option<String>,
}

/// An `<img>` as written in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub src: Option<String>,
    pub alt: Option<String>,
}

/// One `<meta>` tag keyed by its `name` or `property` (lowercased)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMeta {
    pub key: String,
    pub content: String,
}

/// Everything the feature extractor needs from one HTML document
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    pub title: Option<String>,
    pub meta: Vec<RawMeta>,
    pub canonical: Option<String>,
    /// H1..H6 texts, index 0 is H1
    pub headings: [Vec<String>; 6],
    pub anchors: Vec<RawAnchor>,
    pub images: Vec<RawImage>,
    /// Whitespace-collapsed visible body text
    pub text: String,
}

impl HtmlDocument {
    /// First `content` of a meta tag with the given name/property
    pub fn meta_content(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.content.as_str())
    }
}

/// Parses HTML content into the raw inventory used by page analysis
pub fn parse(html: &str) -> HtmlDocument {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&TITLE)
        .next()
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty());

    let meta = doc
        .select(&META)
        .filter_map(|e| {
            let el = e.value();
            let key = el.attr("name").or_else(|| el.attr("property"))?;
            Some(RawMeta {
                key: key.trim().to_lowercase(),
                content: el.attr("content").unwrap_or_default().trim().to_string(),
            })
        })
        .collect::<Vec<_>>();

    let canonical = doc
        .select(&CANONICAL)
        .find(|e| {
            e.value()
                .attr("rel")
                .is_some_and(|rel| rel.eq_ignore_ascii_case("canonical"))
        })
        .and_then(|e| e.value().attr("href"))
        .map(|s| s.trim().to_string());

    let headings: [Vec<String>; 6] = std::array::from_fn(|level| {
        doc.select(&HEADINGS[level])
            .map(|e| element_text(&e))
            .collect::<Vec<_>>()
    });

    let anchors = doc
        .select(&ANCHOR)
        .filter_map(|e| {
            let href = e.value().attr("href")?.trim().to_string();
            Some(RawAnchor {
                href,
                text: element_text(&e),
                title: e
                    .value()
                    .attr("title")
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
            })
        })
        .collect::<Vec<_>>();

    let images = doc
        .select(&IMAGE)
        .map(|e| RawImage {
            src: e.value().attr("src").map(|s| s.to_string()),
            alt: e.value().attr("alt").map(|s| s.to_string()),
        })
        .collect::<Vec<_>>();

    let text = match doc.select(&BODY).next() {
        Some(body) => element_text(&body),
        None => element_text(&doc.root_element()),
    };

    ::log::debug!(
        "HTML parser found {} anchors, {} images, {} words of text",
        anchors.len(),
        images.len(),
        text.split(' ').filter(|w| !w.is_empty()).count()
    );

    HtmlDocument {
        title,
        meta,
        canonical,
        headings,
        anchors,
        images,
        text,
    }
}

/// Text below `element` that is not inside an invisible element
fn element_text(element: &ElementRef) -> String {
    let mut text = String::new();
    collect_text(*element, &mut text);
    normalize_whitespace(&text)
}

/// Text nodes are concatenated as written; only block boundaries separate words
fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if INVISIBLE.contains(&name) {
                continue;
            }
            let block = BLOCK.contains(&name);
            if block {
                out.push(' ');
            }
            collect_text(child, out);
            if block {
                out.push(' ');
            }
        }
    }
}
