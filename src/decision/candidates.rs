//! Candidate actions drawn from crawl findings and performance signals.

use crate::action::ActionCategory;
use crate::decision::DecisionRules;
use crate::decision::signals::{PagePerformance, PerformanceSignals};
use crate::results::CrawlResult;

/// An action before scoring: estimates are fixed, the tier is not yet known
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub description: String,
    pub category: ActionCategory,
    pub effort_hours: f64,
    pub impact: f64,
    pub confidence: f64,
    pub steps: &'static [&'static str],
    pub metrics: &'static [&'static str],
}

/// Every candidate the inputs support, in a fixed order
pub fn collect(
    rules: &DecisionRules,
    crawl: &CrawlResult,
    signals: Option<&PerformanceSignals>,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    if let Some(signals) = signals {
        candidates.extend(high_bounce_pages(rules, crawl, signals));
    }
    candidates.extend(thin_content(rules, crawl));
    candidates.extend(crawl_errors(crawl));
    candidates.extend(weak_titles(rules, crawl));
    candidates.extend(duplicate_content(crawl));

    if let Some(signals) = signals {
        for (page, metrics) in &signals.page_performance {
            candidates.extend(low_search_position(rules, page, metrics));
            candidates.extend(low_click_through(rules, page, metrics));
        }
        for (page, metrics) in &signals.page_performance {
            candidates.extend(short_sessions(rules, page, metrics));
        }
    }

    ::log::debug!("Decision engine collected {} candidates", candidates.len());
    candidates
}

fn high_bounce_pages(
    rules: &DecisionRules,
    crawl: &CrawlResult,
    signals: &PerformanceSignals,
) -> Vec<Candidate> {
    crawl
        .pages
        .iter()
        .filter_map(|page| {
            let bounce = signals.page_performance.get(&page.url)?.bounce_rate?;
            (bounce > rules.bounce_rate_threshold).then(|| Candidate {
                title: format!("Reduce bounce rate for {}", page.url),
                description: format!(
                    "High bounce rate ({:.1}%) points at content or usability problems",
                    bounce * 100.0
                ),
                category: ActionCategory::Content,
                effort_hours: 8.0,
                impact: 0.7,
                confidence: 0.8,
                steps: &[
                    "Review content relevance and quality",
                    "Improve page load speed",
                    "Enhance readability and formatting",
                    "Add internal links to related content",
                ],
                metrics: &[
                    "Reduce bounce rate below 60%",
                    "Increase average session duration",
                    "Improve pages per session",
                ],
            })
        })
        .collect()
}

fn thin_content(rules: &DecisionRules, crawl: &CrawlResult) -> Vec<Candidate> {
    crawl
        .pages
        .iter()
        .filter(|page| page.content_hash.is_some())
        .filter_map(|page| {
            let length = page.content.chars().count();
            (length < rules.content_length_threshold).then(|| Candidate {
                title: format!("Expand content for {}", page.url),
                description: format!(
                    "Content looks too short ({length} chars) to cover the topic"
                ),
                category: ActionCategory::Content,
                effort_hours: 6.0,
                impact: 0.6,
                confidence: 0.7,
                steps: &[
                    "Research the topic thoroughly",
                    "Add relevant sections and details",
                    "Include examples and case studies",
                    "Optimize for semantic keywords",
                ],
                metrics: &[
                    "Increase content length to 1000+ words",
                    "Improve keyword rankings",
                    "Increase user engagement",
                ],
            })
        })
        .collect()
}

fn crawl_errors(crawl: &CrawlResult) -> Option<Candidate> {
    let count = crawl
        .errors
        .iter()
        .filter(|e| e.is_site_health_issue())
        .count();
    (count > 0).then(|| Candidate {
        title: "Fix critical technical SEO errors".to_string(),
        description: format!("Found {count} technical errors affecting the site"),
        category: ActionCategory::Technical,
        effort_hours: 12.0,
        impact: 0.9,
        confidence: 0.95,
        steps: &[
            "Identify and fix all 404 errors",
            "Resolve server errors (5xx)",
            "Ensure the TLS certificate is valid",
            "Fix timeout and connection issues",
        ],
        metrics: &[
            "Reduce technical errors to zero",
            "Improve crawl efficiency",
            "Enhance site reliability",
        ],
    })
}

fn weak_titles(rules: &DecisionRules, crawl: &CrawlResult) -> Option<Candidate> {
    let count = crawl
        .pages
        .iter()
        .filter(|page| page.content_hash.is_some())
        .filter(|page| {
            page.title
                .as_ref()
                .is_none_or(|t| t.chars().count() < rules.title_min_length)
        })
        .count();
    (count > 0).then(|| Candidate {
        title: "Optimize missing page titles and meta descriptions".to_string(),
        description: format!("{count} pages have missing or weak titles"),
        category: ActionCategory::Technical,
        effort_hours: count as f64 * 0.5,
        impact: 0.8,
        confidence: 0.9,
        steps: &[
            "Write compelling titles (50-60 characters)",
            "Create descriptive meta descriptions (150-160 characters)",
            "Include primary keywords naturally",
            "Ensure uniqueness across pages",
        ],
        metrics: &[
            "100% pages have optimized titles",
            "100% pages have meta descriptions",
            "Improve search result CTR",
        ],
    })
}

fn duplicate_content(crawl: &CrawlResult) -> Option<Candidate> {
    let groups = crawl.duplicate_pages.len();
    (groups > 0).then(|| Candidate {
        title: "Consolidate duplicate content".to_string(),
        description: format!("{groups} groups of pages share identical visible text"),
        category: ActionCategory::Content,
        effort_hours: groups as f64 * 2.0,
        impact: 0.7,
        confidence: 0.85,
        steps: &[
            "Decide which page in each group should rank",
            "Rewrite or merge the other pages",
            "Add canonical links pointing at the preferred page",
            "Redirect pages that no longer need to exist",
        ],
        metrics: &[
            "No duplicate content groups in the next crawl",
            "Preferred pages indexed instead of copies",
        ],
    })
}

fn low_search_position(
    rules: &DecisionRules,
    page: &str,
    metrics: &PagePerformance,
) -> Option<Candidate> {
    let position = metrics.search_data.as_ref()?.position?;
    (position > rules.position_threshold).then(|| Candidate {
        title: format!("Improve search ranking for {page}"),
        description: format!("Page ranks at position {position:.1}"),
        category: ActionCategory::Keyword,
        effort_hours: 10.0,
        impact: 0.85,
        confidence: 0.75,
        steps: &[
            "Analyze top-ranking competitors",
            "Optimize content for target keywords",
            "Improve internal linking structure",
            "Build quality backlinks",
            "Enhance user experience signals",
        ],
        metrics: &[
            "Achieve top 10 ranking",
            "Increase organic traffic",
            "Improve search visibility",
        ],
    })
}

fn low_click_through(
    rules: &DecisionRules,
    page: &str,
    metrics: &PagePerformance,
) -> Option<Candidate> {
    let search = metrics.search_data.as_ref()?;
    let (ctr, impressions) = (search.ctr?, search.impressions?);
    (ctr < rules.ctr_threshold && impressions > rules.impression_threshold).then(|| Candidate {
        title: format!("Improve search CTR for {page}"),
        description: format!(
            "Low CTR ({:.2}%) despite {impressions} impressions",
            ctr * 100.0
        ),
        category: ActionCategory::Content,
        effort_hours: 4.0,
        impact: 0.6,
        confidence: 0.8,
        steps: &[
            "Optimize title tags for clickability",
            "Write compelling meta descriptions",
            "Implement structured data for rich snippets",
            "Test different title/description combinations",
        ],
        metrics: &[
            "Increase CTR to 3%+",
            "Maintain or improve rankings",
            "Increase organic traffic",
        ],
    })
}

fn short_sessions(
    rules: &DecisionRules,
    page: &str,
    metrics: &PagePerformance,
) -> Option<Candidate> {
    let duration = metrics.avg_session_duration?;
    (duration < rules.session_duration_threshold).then(|| Candidate {
        title: format!("Improve user engagement for {page}"),
        description: format!("Short sessions ({duration:.0}s) suggest readers lose interest"),
        category: ActionCategory::UserExperience,
        effort_hours: 6.0,
        impact: 0.65,
        confidence: 0.7,
        steps: &[
            "Improve content readability",
            "Add multimedia elements",
            "Enhance page layout and navigation",
            "Include clear calls-to-action",
        ],
        metrics: &[
            "Increase average session duration to 90+ seconds",
            "Reduce bounce rate",
            "Improve pages per session",
        ],
    })
}
