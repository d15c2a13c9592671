use crate::parsers::ParserType;

#[test]
fn test_content_type_wins_over_url() {
    assert_eq!(
        ParserType::detect(Some("text/html; charset=utf-8"), "https://example.org/file.txt"),
        ParserType::Html
    );
    assert_eq!(
        ParserType::detect(Some("application/rss+xml"), "https://example.org/feed"),
        ParserType::Xml
    );
    assert_eq!(
        ParserType::detect(Some("image/png"), "https://example.org/page"),
        ParserType::Other
    );
}

#[test]
fn test_url_fallback() {
    let types = [
        ("https://example.org/file.txt", ParserType::Text),
        ("https://example.org/page.html", ParserType::Html),
        ("https://example.org/sitemap.xml", ParserType::Xml),
        ("https://example.org/photo.JPG?size=2", ParserType::Other),
        ("https://example.org/page", ParserType::Html),
    ];

    for (url, expected) in types {
        assert_eq!(ParserType::detect(None, url), expected, "URL '{}'", url);
    }
}

#[test]
fn test_only_html_is_analyzable() {
    assert!(ParserType::Html.is_analyzable());
    assert!(!ParserType::Text.is_analyzable());
    assert!(!ParserType::Xml.is_analyzable());
}
