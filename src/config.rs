use crate::decision::DecisionRules;
use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for one crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URL to start crawling from
    #[serde(default)]
    pub start_url: String,

    /// Optional sitemap whose entries are crawled before discovered links
    #[serde(default)]
    pub sitemap_url: Option<String>,

    /// Whether internal links found on pages are added to the frontier
    #[serde(default = "default_follow_links")]
    pub follow_links: bool,

    /// Keep heading texts on each page (counts are always collected)
    #[serde(default)]
    pub analyze_headings: bool,

    /// Keep the inventory of canonical/robots/social meta tags on each page
    #[serde(default)]
    pub analyze_extra_tags: bool,

    /// Number of concurrent fetch workers
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Stop dispatching fetches after this many pages
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Whether to allow crawling other hosts than the start URL's
    #[serde(default)]
    pub allow_external: bool,

    /// Regex patterns for URLs to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Whole-run limit; in-flight fetches are cancelled when it expires
    #[serde(default)]
    pub total_timeout_secs: Option<u64>,
}

/// Thresholds used by the feature extractor when it emits warnings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorOptions {
    pub title_min: usize,
    pub title_max: usize,
    pub description_min: usize,
    pub description_max: usize,
    pub h2_min: usize,
    pub h2_max: usize,
    /// Tokens shorter than this are not counted
    pub min_word_length: usize,
    /// Stop words added on top of the built-in English list
    pub extra_stop_words: Vec<String>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            title_min: 30,
            title_max: 60,
            description_min: 120,
            description_max: 160,
            h2_min: 1,
            h2_max: 6,
            min_word_length: 3,
            extra_stop_words: Vec::new(),
        }
    }
}

/// Everything a run needs, loadable from one JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub extractor: ExtractorOptions,

    #[serde(default)]
    pub decision: DecisionRules,
}

impl AuditConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let io_err = |source| AuditError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_follow_links() -> bool {
    true
}

fn default_max_concurrency() -> usize {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    30
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            sitemap_url: None,
            follow_links: default_follow_links(),
            analyze_headings: false,
            analyze_extra_tags: false,
            max_concurrency: default_max_concurrency(),
            max_pages: None,
            allow_external: false,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = AuditConfig::from_json("{}").unwrap();
        assert!(config.crawl.follow_links);
        assert_eq!(config.crawl.max_concurrency, 5);
        assert_eq!(config.crawl.connect_timeout_secs, 10);
        assert_eq!(config.crawl.read_timeout_secs, 30);
        assert_eq!(config.extractor.title_min, 30);
        assert_eq!(config.extractor.description_max, 160);
        assert_eq!(config.decision.weekly_capacity_hours, 20.0);
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "crawl": { "start_url": "https://example.com/", "follow_links": false, "max_pages": 3 },
            "extractor": { "h2_max": 10 }
        }"#;
        let config = AuditConfig::from_json(json).unwrap();
        assert_eq!(config.crawl.start_url, "https://example.com/");
        assert!(!config.crawl.follow_links);
        assert_eq!(config.crawl.max_pages, Some(3));
        assert_eq!(config.extractor.h2_max, 10);
        assert_eq!(config.extractor.h2_min, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AuditConfig::from_file("/nonexistent/audit.json").unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
