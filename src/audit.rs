use crate::config::AuditConfig;
use crate::crawlers;
use crate::decision::{DecisionEngine, DecisionPlan, LlmInsights, PerformanceSignals};
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::optimizer::{OptimizationPlan, RuleCatalog, build_plan};
use crate::results::CrawlResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Everything one audit run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub crawl: CrawlResult,
    pub optimization: OptimizationPlan,
    pub decisions: DecisionPlan,
}

/// Main builder for an audit run: crawl a site, then plan its fixes
pub struct Audit {
    config: AuditConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    catalog: RuleCatalog,
    signals: Option<PerformanceSignals>,
    insights: Option<LlmInsights>,
}

impl Audit {
    /// Create a new Audit builder for the given start URL
    pub fn new(start_url: impl Into<String>) -> Self {
        let mut config = AuditConfig::default();
        config.crawl.start_url = start_url.into();
        Self {
            config,
            fetcher: None,
            catalog: RuleCatalog::default(),
            signals: None,
            insights: None,
        }
    }

    pub fn with_start_url(mut self, start_url: impl Into<String>) -> Self {
        self.config.crawl.start_url = start_url.into();
        self
    }

    /// Crawl the sitemap's entries before discovered links
    pub fn with_sitemap(mut self, sitemap_url: impl Into<String>) -> Self {
        self.config.crawl.sitemap_url = Some(sitemap_url.into());
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.config.crawl.follow_links = follow_links;
        self
    }

    pub fn with_analyze_headings(mut self, analyze_headings: bool) -> Self {
        self.config.crawl.analyze_headings = analyze_headings;
        self
    }

    pub fn with_analyze_extra_tags(mut self, analyze_extra_tags: bool) -> Self {
        self.config.crawl.analyze_extra_tags = analyze_extra_tags;
        self
    }

    /// Set the maximum number of concurrent fetches
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.crawl.max_concurrency = max_concurrency;
        self
    }

    /// Stop dispatching fetches after this many pages
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.crawl.max_pages = Some(max_pages);
        self
    }

    /// Set the total timeout (maximum runtime)
    pub fn with_total_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.crawl.total_timeout_secs = Some(timeout_seconds);
        self
    }

    /// Set the per-request connect and read timeouts
    pub fn with_request_timeouts(mut self, connect_seconds: u64, read_seconds: u64) -> Self {
        self.config.crawl.connect_timeout_secs = connect_seconds;
        self.config.crawl.read_timeout_secs = read_seconds;
        self
    }

    /// Replace the whole configuration. A config without a start URL keeps
    /// the one this builder was created with.
    pub fn with_config(mut self, mut config: AuditConfig) -> Self {
        if config.crawl.start_url.is_empty() {
            config.crawl.start_url = std::mem::take(&mut self.config.crawl.start_url);
        }
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = AuditConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Fetch pages through `fetcher` instead of the HTTP client
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_catalog(mut self, catalog: RuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_signals(mut self, signals: PerformanceSignals) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn with_insights(mut self, insights: LlmInsights) -> Self {
        self.insights = Some(insights);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Crawl only
    pub async fn crawl(&self) -> Result<CrawlResult> {
        let fetcher = match &self.fetcher {
            Some(fetcher) => fetcher.clone(),
            None => Arc::new(HttpFetcher::from_config(&self.config.crawl)?),
        };
        crawlers::web::crawl(&self.config.crawl, &self.config.extractor, fetcher).await
    }

    /// Crawl, then build the optimization plan and the decision plan
    pub async fn run(self) -> Result<AuditReport> {
        let crawl = self.crawl().await?;

        let optimization = build_plan(&self.catalog, &crawl.pages);
        ::log::info!(
            "Optimization plan: {} issues across {} pages, site score {}",
            optimization.summary.total_issues,
            optimization.summary.total_pages,
            optimization.site_score.score
        );

        let engine = DecisionEngine::new(self.config.decision.clone());
        let decisions = engine.analyze(&crawl, self.signals.as_ref(), self.insights.as_ref());

        Ok(AuditReport {
            crawl,
            optimization,
            decisions,
        })
    }
}
