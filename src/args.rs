use audit_page::Audit;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "audit-page")]
#[command(about = "Crawl a site, report its SEO issues and plan the fixes")]
#[command(version)]
pub struct Args {
    /// URL to start crawling from
    pub url: String,

    /// Sitemap whose entries are crawled first
    #[arg(long)]
    pub sitemap: Option<String>,

    /// Only crawl the start URL and sitemap entries
    #[arg(long)]
    pub no_follow_links: bool,

    /// Keep heading texts on each page
    #[arg(long)]
    pub analyze_headings: bool,

    /// Keep canonical, robots and social meta tags on each page
    #[arg(long)]
    pub analyze_extra_tags: bool,

    /// Number of concurrent fetches
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Total timeout in seconds (maximum runtime)
    #[arg(long)]
    pub total_timeout: Option<u64>,

    /// JSON configuration file; flags given here override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON file with per-page performance signals
    #[arg(long)]
    pub signals: Option<PathBuf>,

    /// JSON file with insights to carry into the decision plan
    #[arg(long)]
    pub insights: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

impl Args {
    /// Apply the flags that were given on top of `audit`. The positional URL
    /// always wins over a start URL from the config file.
    pub fn apply(&self, mut audit: Audit) -> Audit {
        audit = audit.with_start_url(self.url.clone());
        if let Some(sitemap) = &self.sitemap {
            audit = audit.with_sitemap(sitemap.clone());
        }
        if self.no_follow_links {
            audit = audit.with_follow_links(false);
        }
        if self.analyze_headings {
            audit = audit.with_analyze_headings(true);
        }
        if self.analyze_extra_tags {
            audit = audit.with_analyze_extra_tags(true);
        }
        if let Some(concurrency) = self.concurrency {
            audit = audit.with_max_concurrency(concurrency);
        }
        if let Some(max_pages) = self.max_pages {
            audit = audit.with_max_pages(max_pages);
        }
        if let Some(timeout) = self.total_timeout {
            audit = audit.with_total_timeout(timeout);
        }
        audit
    }
}
