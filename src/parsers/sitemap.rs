//! Sitemap (`urlset`) and sitemap index parsing.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("sitemap XML parse error at byte {position}: {message}")]
pub struct SitemapError {
    pub position: u64,
    pub message: String,
}

/// Locations listed in one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapEntries {
    /// `<url><loc>` entries, in document order
    pub pages: Vec<String>,
    /// `<sitemap><loc>` entries of a sitemap index
    pub sitemaps: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Url,
    Sitemap,
}

/// Parse a sitemap XML string into its page and nested-sitemap locations
pub fn parse(xml: &str) -> Result<SitemapEntries, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = SitemapEntries::default();
    let mut block = Block::None;
    let mut in_loc = false;
    let mut loc = String::new();

    loop {
        let event = reader.read_event().map_err(|e| SitemapError {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"url" => {
                    block = Block::Url;
                    loc.clear();
                }
                b"sitemap" => {
                    block = Block::Sitemap;
                    loc.clear();
                }
                b"loc" => in_loc = block != Block::None,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"loc" => in_loc = false,
                b"url" if block == Block::Url => {
                    if !loc.is_empty() {
                        entries.pages.push(loc.trim().to_string());
                    }
                    block = Block::None;
                }
                b"sitemap" if block == Block::Sitemap => {
                    if !loc.is_empty() {
                        entries.sitemaps.push(loc.trim().to_string());
                    }
                    block = Block::None;
                }
                _ => {}
            },
            Event::Text(e) if in_loc => {
                let text = e.unescape().map_err(|err| SitemapError {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })?;
                loc.push_str(&text);
            }
            Event::CData(e) if in_loc => {
                loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    ::log::debug!(
        "Sitemap lists {} pages and {} nested sitemaps",
        entries.pages.len(),
        entries.sitemaps.len()
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>https://example.com/</loc><priority>1.0</priority></url>
          <url>
            <loc> https://example.com/about </loc>
            <lastmod>2024-01-15</lastmod>
          </url>
          <url><loc>https://example.com/a?x=1&amp;y=2</loc></url>
        </urlset>"#;

        let entries = parse(xml).unwrap();
        assert_eq!(
            entries.pages,
            vec![
                "https://example.com/",
                "https://example.com/about",
                "https://example.com/a?x=1&y=2",
            ]
        );
        assert!(entries.sitemaps.is_empty());
    }

    #[test]
    fn test_parse_index() {
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap><loc>https://example.com/sitemap-posts.xml</loc></sitemap>
          <sitemap><loc><![CDATA[https://example.com/sitemap-pages.xml]]></loc></sitemap>
        </sitemapindex>"#;

        let entries = parse(xml).unwrap();
        assert!(entries.pages.is_empty());
        assert_eq!(
            entries.sitemaps,
            vec![
                "https://example.com/sitemap-posts.xml",
                "https://example.com/sitemap-pages.xml",
            ]
        );
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse("<urlset><url><loc>x</url></urlset>").is_err());
    }
}
