use crate::action::{Action, CatalogProvenance, ScoredBy, short_hash};
use crate::optimizer::catalog::{IssueKey, RuleCatalog};
use crate::page::Page;

/// A warning from one page, matched to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: IssueKey,
    pub page_url: String,
    pub warning: String,
}

/// Find the issue kind a warning describes; first matching pattern wins.
///
/// Only the phrase before the first `": "` is matched, so quoted page text
/// (a title that itself says "missing title") cannot change the outcome.
pub fn classify(catalog: &RuleCatalog, warning: &str) -> IssueKey {
    let lowered = warning.to_lowercase();
    let phrase = lowered.split(": ").next().unwrap_or_default();
    catalog
        .patterns()
        .iter()
        .find(|(pattern, _)| phrase.contains(pattern))
        .map(|(_, key)| *key)
        .unwrap_or(IssueKey::UNKNOWN)
}

/// `<category>_<subtype>_<first 8 hex digits of SHA-256(warning)>`
pub fn issue_id(key: &IssueKey, warning: &str) -> String {
    format!("{}_{}_{}", key.category, key.subtype, short_hash(warning))
}

/// Classify every warning of a page
pub fn page_issues(catalog: &RuleCatalog, page: &Page) -> Vec<Issue> {
    page.warnings
        .iter()
        .map(|warning| Issue {
            key: classify(catalog, warning),
            page_url: page.url.clone(),
            warning: warning.clone(),
        })
        .collect()
}

/// Turn an issue into its catalog action
pub fn to_action(catalog: &RuleCatalog, issue: &Issue) -> Action {
    let remediation = catalog.remediation(&issue.key);
    let unknown = issue.key.is_unknown();

    let description = if unknown {
        issue.warning.clone()
    } else {
        remediation.description.to_string()
    };
    let effort_minutes = remediation.time_estimate.minutes().unwrap_or(0);

    Action {
        id: issue_id(&issue.key, &issue.warning),
        title: remediation.title.to_string(),
        description,
        category: remediation.category,
        priority: remediation.priority,
        estimated_effort_hours: f64::from(effort_minutes) / 60.0,
        estimated_impact: f64::from(remediation.priority.level_score()) / 100.0,
        confidence: if unknown { 0.5 } else { 1.0 },
        implementation_steps: remediation
            .implementation
            .iter()
            .map(|s| s.to_string())
            .collect(),
        success_metrics: Vec::new(),
        dependencies: Vec::new(),
        resources_needed: Vec::new(),
        scored_by: ScoredBy::Catalog(CatalogProvenance {
            issue_category: issue.key.category.to_string(),
            issue_subtype: issue.key.subtype.to_string(),
            label: remediation.label.to_string(),
            action: remediation.action.to_string(),
            expected_impact: remediation.expected_impact.to_string(),
            time_estimate: remediation.time_estimate,
            original_warning: issue.warning.clone(),
            page_url: issue.page_url.clone(),
            status: "pending".to_string(),
        }),
    }
}
