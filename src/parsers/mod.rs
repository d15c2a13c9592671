pub mod html;
pub mod sitemap;
pub mod text;

#[cfg(test)]
mod tests;

/// Kind of document a fetched body holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML page, fully analyzed
    Html,
    /// XML document (feeds, sitemaps served as pages)
    Xml,
    /// Plain text, JSON and similar
    Text,
    /// Binary or unknown formats
    Other,
}

impl ParserType {
    /// Classify from the `Content-Type` header, falling back to the URL
    pub fn detect(content_type: Option<&str>, url: &str) -> Self {
        if let Some(content_type) = content_type {
            let mime = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            return match mime.as_str() {
                "text/html" | "application/xhtml+xml" => ParserType::Html,
                "application/xml" | "text/xml" => ParserType::Xml,
                m if m.ends_with("+xml") => ParserType::Xml,
                m if m.starts_with("text/") || m == "application/json" => ParserType::Text,
                "" => Self::from_url(url),
                _ => ParserType::Other,
            };
        }
        Self::from_url(url)
    }

    /// Determines the parser type based on the URL path
    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if path.ends_with(".xml") {
            ParserType::Xml
        } else if path.ends_with(".txt") || path.ends_with(".json") || path.ends_with(".csv") {
            ParserType::Text
        } else if [".jpg", ".jpeg", ".png", ".gif", ".css", ".js", ".pdf", ".zip"]
            .iter()
            .any(|ext| path.ends_with(ext))
        {
            ParserType::Other
        } else {
            // Default to HTML for most URLs
            ParserType::Html
        }
    }

    /// Whether the document can carry on-page SEO signals
    pub fn is_analyzable(&self) -> bool {
        matches!(self, ParserType::Html)
    }
}
