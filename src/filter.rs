use crate::config::CrawlConfig;
use crate::error::Result;
use regex::Regex;
use url::Url;

/// Static assets never worth fetching as pages
const ASSET_PATTERN: &str =
    r"(?i)\.(jpg|jpeg|png|gif|webp|css|js|ico|svg|woff|woff2|ttf|eot|pdf|zip|mp4|mp3)$";

/// Decides which discovered URLs belong to the crawl
#[derive(Debug)]
pub struct ScopeFilter {
    /// Host every crawled URL must share (None when external hosts are allowed)
    required_host: Option<String>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl ScopeFilter {
    /// Build the filter for a run rooted at `root_url`
    pub fn new(root_url: &Url, config: &CrawlConfig) -> Result<Self> {
        let required_host = if config.allow_external {
            None
        } else {
            root_url.host_str().map(|h| h.to_ascii_lowercase())
        };

        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut exclude_regexes = vec![Regex::new(ASSET_PATTERN)?];
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            required_host,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a URL should be crawled based on all filtering rules
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if !self.is_in_host_scope(url) {
            return false;
        }

        // Exclusions take precedence over inclusions
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|r| r.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|r| r.is_match(url_str))
    }

    fn is_in_host_scope(&self, url: &Url) -> bool {
        match (&self.required_host, url.host_str()) {
            (None, _) => true,
            (Some(required), Some(host)) => host.eq_ignore_ascii_case(required),
            (Some(_), None) => false,
        }
    }
}

/// Frontier key for a URL: parsed form without the fragment
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(config: CrawlConfig) -> ScopeFilter {
        let root = Url::parse(&config.start_url).unwrap();
        ScopeFilter::new(&root, &config).unwrap()
    }

    #[test]
    fn test_same_host_only_by_default() {
        let f = filter(CrawlConfig::new("https://example.com/"));

        assert!(f.should_crawl(&Url::parse("https://example.com/about").unwrap()));
        assert!(f.should_crawl(&Url::parse("https://EXAMPLE.com/about").unwrap()));
        assert!(!f.should_crawl(&Url::parse("https://other.com/about").unwrap()));
        assert!(!f.should_crawl(&Url::parse("ftp://example.com/file").unwrap()));
    }

    #[test]
    fn test_assets_are_excluded() {
        let f = filter(CrawlConfig::new("https://example.com/"));
        assert!(!f.should_crawl(&Url::parse("https://example.com/logo.PNG").unwrap()));
        assert!(!f.should_crawl(&Url::parse("https://example.com/app.js").unwrap()));
        assert!(f.should_crawl(&Url::parse("https://example.com/page.html").unwrap()));
    }

    #[test]
    fn test_external_allowed() {
        let mut config = CrawlConfig::new("https://example.com/");
        config.allow_external = true;
        let f = filter(config);
        assert!(f.should_crawl(&Url::parse("https://other.com/page").unwrap()));
    }

    #[test]
    fn test_regex_patterns() {
        let mut config = CrawlConfig::new("https://example.com/");
        config.include_patterns = vec![r"/docs/".to_string()];
        config.exclude_patterns = vec![r"/docs/draft/".to_string()];
        let f = filter(config);

        assert!(f.should_crawl(&Url::parse("https://example.com/docs/intro").unwrap()));
        assert!(!f.should_crawl(&Url::parse("https://example.com/blog/post").unwrap()));
        assert!(!f.should_crawl(&Url::parse("https://example.com/docs/draft/x").unwrap()));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let mut config = CrawlConfig::new("https://example.com/");
        config.exclude_patterns = vec!["(".to_string()];
        let root = Url::parse(&config.start_url).unwrap();
        assert!(ScopeFilter::new(&root, &config).is_err());
    }

    #[test]
    fn test_normalize_drops_fragment() {
        let url = Url::parse("https://example.com/page?q=1#section").unwrap();
        assert_eq!(normalize_url(&url).as_str(), "https://example.com/page?q=1");
    }
}
