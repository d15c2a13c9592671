use crate::fetch::{FetchError, FetchErrorKind};
use crate::page::Page;
use serde::{Deserialize, Serialize};

/// What went wrong for a URL that produced no page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlErrorKind {
    InvalidUrl,
    Timeout,
    Connect,
    Tls,
    Status,
    Body,
    Other,
    /// The sitemap was fetched but is not valid sitemap XML
    SitemapParse,
}

impl From<FetchErrorKind> for CrawlErrorKind {
    fn from(kind: FetchErrorKind) -> Self {
        match kind {
            FetchErrorKind::InvalidUrl => CrawlErrorKind::InvalidUrl,
            FetchErrorKind::Timeout => CrawlErrorKind::Timeout,
            FetchErrorKind::Connect => CrawlErrorKind::Connect,
            FetchErrorKind::Tls => CrawlErrorKind::Tls,
            FetchErrorKind::Status => CrawlErrorKind::Status,
            FetchErrorKind::Body => CrawlErrorKind::Body,
            FetchErrorKind::Other => CrawlErrorKind::Other,
        }
    }
}

/// A URL that failed during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlError {
    pub url: String,
    pub kind: CrawlErrorKind,
    pub message: String,
    /// HTTP status for `Status` failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl CrawlError {
    pub fn from_fetch(url: &str, error: &FetchError) -> Self {
        Self {
            url: url.to_string(),
            kind: error.kind().into(),
            message: error.to_string(),
            status: error.status(),
        }
    }

    /// Whether the failure points at a broken or unreachable page
    pub fn is_site_health_issue(&self) -> bool {
        match self.kind {
            CrawlErrorKind::Timeout | CrawlErrorKind::Tls => true,
            CrawlErrorKind::Status => self.status.is_some_and(|s| s == 404 || s >= 500),
            _ => false,
        }
    }
}

/// A corpus n-gram that occurs often enough to report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub count: usize,
}

/// Everything one crawl run produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Pages in the order their extraction finished
    pub pages: Vec<Page>,

    /// Groups of URLs whose visible text hashes identically
    pub duplicate_pages: Vec<Vec<String>>,

    /// Corpus n-grams above the reporting threshold
    pub keywords: Vec<Keyword>,

    /// Wall-clock seconds the run took
    pub total_time: f64,

    pub errors: Vec<CrawlError>,

    /// Set when the whole-run timeout cancelled the crawl
    pub timed_out: bool,
}
