use crate::config::{CrawlConfig, ExtractorOptions};
use crate::crawlers::corpus::{Corpus, KEYWORD_THRESHOLD};
use crate::crawlers::frontier::{Frontier, Lane, Next};
use crate::error::{AuditError, Result};
use crate::fetch::Fetcher;
use crate::filter::{ScopeFilter, normalize_url};
use crate::page::{Page, PageOptions};
use crate::parsers::ParserType;
use crate::parsers::sitemap::{self, SitemapEntries};
use crate::results::{CrawlError, CrawlErrorKind, CrawlResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

/// Worker output, consumed by the single collector task
#[derive(Debug)]
pub enum CrawlEvent {
    Page(Box<Page>),
    Failed(CrawlError),
}

/// State shared by every worker of one run
struct Shared {
    frontier: Mutex<Frontier>,
    /// Signalled whenever the frontier may have work or may be finished
    changed: Notify,
    fetcher: Arc<dyn Fetcher>,
    filter: ScopeFilter,
    options: PageOptions,
    follow_links: bool,
}

/// Crawls a site and returns the pages, aggregates and failures.
///
/// Only setup problems (unparseable start URL, bad scope regex) are errors;
/// anything that fails once the crawl is running is recorded on the result.
///
/// # Arguments
///
/// * `config` - Crawl settings
/// * `extractor` - Thresholds for page warnings
/// * `fetcher` - Source of page bodies
pub async fn crawl(
    config: &CrawlConfig,
    extractor: &ExtractorOptions,
    fetcher: Arc<dyn Fetcher>,
) -> Result<CrawlResult> {
    let started = Instant::now();
    let deadline = config
        .total_timeout_secs
        .map(|secs| started + Duration::from_secs(secs));

    let root_url = Url::parse(&config.start_url).map_err(|source| AuditError::Url {
        url: config.start_url.clone(),
        source,
    })?;
    let root_url = normalize_url(&root_url);
    let filter = ScopeFilter::new(&root_url, config)?;

    ::log::info!("Starting crawl for: {}", root_url);

    let mut frontier = Frontier::new(config.max_pages);
    let mut seed_errors = Vec::new();
    let mut timed_out = false;

    if let Some(sitemap_url) = &config.sitemap_url {
        let loading = load_sitemap(fetcher.as_ref(), sitemap_url, &mut seed_errors);
        let entries = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, loading).await.ok(),
            None => Some(loading.await),
        };
        match entries {
            Some(entries) => seed_sitemap(&mut frontier, &filter, entries),
            None => timed_out = true,
        }
    }
    frontier.push(root_url.to_string(), Lane::Discovery);

    let shared = Arc::new(Shared {
        frontier: Mutex::new(frontier),
        changed: Notify::new(),
        fetcher,
        filter,
        options: PageOptions::new(
            extractor.clone(),
            config.analyze_headings,
            config.analyze_extra_tags,
        ),
        follow_links: config.follow_links,
    });

    let (event_tx, mut event_rx) = mpsc::channel::<CrawlEvent>(1024);
    let collector = tokio::spawn(async move {
        let mut corpus = Corpus::default();
        while let Some(event) = event_rx.recv().await {
            match event {
                CrawlEvent::Page(page) => corpus.add_page(*page),
                CrawlEvent::Failed(error) => corpus.add_error(error),
            }
        }
        corpus
    });

    if !timed_out {
        timed_out = run_workers(config.max_concurrency.max(1), &shared, event_tx, deadline).await;
    } else {
        drop(event_tx);
    }

    let mut corpus = match collector.await {
        Ok(corpus) => corpus,
        Err(e) => {
            ::log::error!("Result collector failed: {}", e);
            Corpus::default()
        }
    };

    let mut errors = seed_errors;
    errors.append(&mut corpus.errors);

    let dispatched = shared.frontier.lock().await.dispatched();
    let result = CrawlResult {
        duplicate_pages: corpus.index.duplicate_groups(),
        keywords: corpus.counts.keywords(KEYWORD_THRESHOLD),
        pages: corpus.pages,
        total_time: started.elapsed().as_secs_f64(),
        errors,
        timed_out,
    };

    ::log::info!(
        "Crawl complete - {} fetches, {} pages, {} errors in {:.2} seconds{}",
        dispatched,
        result.pages.len(),
        result.errors.len(),
        result.total_time,
        if result.timed_out { " (timed out)" } else { "" }
    );

    Ok(result)
}

/// Spawns the worker pool and waits for it; returns true when the deadline cut it short
async fn run_workers(
    num_workers: usize,
    shared: &Arc<Shared>,
    event_tx: mpsc::Sender<CrawlEvent>,
    deadline: Option<Instant>,
) -> bool {
    let mut workers = JoinSet::new();
    for worker_id in 0..num_workers {
        workers.spawn(worker(worker_id, Arc::clone(shared), event_tx.clone()));
    }
    // Each worker holds its own sender; the collector stops once they are all gone
    drop(event_tx);

    let join_all = async {
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                ::log::warn!("Worker task ended abnormally: {}", e);
            }
        }
    };

    let timed_out = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, join_all).await.is_err(),
        None => {
            join_all.await;
            false
        }
    };

    if timed_out {
        ::log::warn!("Total timeout reached, cancelling in-flight fetches");
        workers.abort_all();
        while workers.join_next().await.is_some() {}
    }

    timed_out
}

/// Pulls URLs from the frontier until the run is finished
async fn worker(worker_id: usize, shared: Arc<Shared>, events: mpsc::Sender<CrawlEvent>) {
    ::log::trace!("Worker {} started", worker_id);

    loop {
        // Registered before looking at the frontier so a wake-up between the
        // check and the wait is not lost
        let changed = shared.changed.notified();
        tokio::pin!(changed);
        changed.as_mut().enable();

        let next = shared.frontier.lock().await.next();
        let url = match next {
            Next::Fetch(url) => url,
            Next::Wait => {
                changed.await;
                continue;
            }
            Next::Done => break,
        };

        let event = process_url(worker_id, &shared, &url).await;
        let links = match &event {
            CrawlEvent::Page(page) if shared.follow_links => in_scope_links(&shared.filter, page),
            _ => Vec::new(),
        };

        {
            let mut frontier = shared.frontier.lock().await;
            for link in links {
                if frontier.push(link.clone(), Lane::Discovery) {
                    ::log::debug!("Queuing link for crawling: {}", link);
                }
            }
            frontier.complete();
        }
        shared.changed.notify_waiters();

        if events.send(event).await.is_err() {
            ::log::error!("Worker {} lost the result channel", worker_id);
            break;
        }
    }

    shared.changed.notify_waiters();
    ::log::debug!("Worker {} shutting down", worker_id);
}

/// Fetches and extracts one URL
async fn process_url(worker_id: usize, shared: &Shared, url: &str) -> CrawlEvent {
    let worker_start = std::time::Instant::now();
    match shared.fetcher.fetch(url).await {
        Ok(response) => {
            let parser_type =
                ParserType::detect(response.content_type.as_deref(), &response.final_url);
            let page = Page::analyze_at(
                url,
                &response.final_url,
                &response.body,
                parser_type,
                &shared.options,
            );
            ::log::info!(
                "Crawled {} ({} warnings, {} internal links)",
                url,
                page.warnings.len(),
                page.internal_links.len()
            );
            ::log::debug!(
                "Worker {} processed {} in {:.2} seconds",
                worker_id,
                url,
                worker_start.elapsed().as_secs_f64()
            );
            CrawlEvent::Page(Box::new(page))
        }
        Err(e) => {
            ::log::warn!("Failed to fetch {}: {}", url, e);
            CrawlEvent::Failed(CrawlError::from_fetch(url, &e))
        }
    }
}

/// Internal links of a page that the scope filter accepts, normalized
fn in_scope_links(filter: &ScopeFilter, page: &Page) -> Vec<String> {
    page.internal_targets()
        .filter_map(|link| Url::parse(link).ok())
        .filter(|link| {
            let accepted = filter.should_crawl(link);
            if !accepted {
                ::log::debug!("URL filter rejected: {}", link);
            }
            accepted
        })
        .map(|link| normalize_url(&link).to_string())
        .collect()
}

fn seed_sitemap(frontier: &mut Frontier, filter: &ScopeFilter, entries: Vec<String>) {
    let mut seeded = 0;
    for entry in entries {
        match Url::parse(&entry) {
            Ok(url) if filter.should_crawl(&url) => {
                if frontier.push(normalize_url(&url).to_string(), Lane::Sitemap) {
                    seeded += 1;
                }
            }
            Ok(url) => ::log::debug!("URL filter rejected sitemap entry: {}", url),
            Err(e) => ::log::debug!("Skipping invalid sitemap entry {}: {}", entry, e),
        }
    }
    ::log::info!("Seeded {} URLs from the sitemap", seeded);
}

/// Page URLs listed by a sitemap, following a sitemap index one level down
async fn load_sitemap(
    fetcher: &dyn Fetcher,
    sitemap_url: &str,
    errors: &mut Vec<CrawlError>,
) -> Vec<String> {
    let Some(entries) = fetch_sitemap(fetcher, sitemap_url, errors).await else {
        return Vec::new();
    };

    let mut pages = entries.pages;
    for nested in entries.sitemaps {
        if let Some(child) = fetch_sitemap(fetcher, &nested, errors).await {
            if !child.sitemaps.is_empty() {
                ::log::debug!(
                    "Ignoring {} sitemaps nested below {}",
                    child.sitemaps.len(),
                    nested
                );
            }
            pages.extend(child.pages);
        }
    }
    pages
}

async fn fetch_sitemap(
    fetcher: &dyn Fetcher,
    url: &str,
    errors: &mut Vec<CrawlError>,
) -> Option<SitemapEntries> {
    let response = match fetcher.fetch(url).await {
        Ok(response) => response,
        Err(e) => {
            ::log::warn!("Failed to fetch sitemap {}: {}", url, e);
            errors.push(CrawlError::from_fetch(url, &e));
            return None;
        }
    };

    match sitemap::parse(&response.body) {
        Ok(entries) => Some(entries),
        Err(e) => {
            ::log::warn!("Failed to parse sitemap {}: {}", url, e);
            errors.push(CrawlError {
                url: url.to_string(),
                kind: CrawlErrorKind::SitemapParse,
                message: e.to_string(),
                status: None,
            });
            None
        }
    }
}
