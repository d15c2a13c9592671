use crate::action::{Action, Priority, format_minutes};
use crate::optimizer::catalog::RuleCatalog;
use crate::optimizer::classify::{page_issues, to_action};
use crate::page::Page;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const IMMEDIATE_ACTIONS: usize = 5;
const SHORT_TERM_GOALS: usize = 10;
const SOCIAL_MEDIA_LABEL: &str = "Social Media";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_pages: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
    pub estimated_minutes: u32,
    /// `estimated_minutes` for people, e.g. `1 h 25 min`
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub url: String,
    pub title: Option<String>,
    pub issues_count: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub issues: Vec<Action>,
}

/// Impact (high/low) by effort (low/high) quadrants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityMatrix {
    pub quick_wins: Vec<Action>,
    pub major_projects: Vec<Action>,
    pub fill_ins: Vec<Action>,
    pub questionable: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyItem {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub immediate_actions: Vec<Action>,
    pub short_term_goals: Vec<Action>,
    pub long_term_strategy: Vec<StrategyItem>,
    pub priority_matrix: PriorityMatrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Excellent,
    Good,
    NeedsImprovement,
}

/// 0-100 site health score derived from how severe each affected page is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteScore {
    pub score: f64,
    pub grade: Grade,
    pub status: ScoreStatus,
}

impl SiteScore {
    pub fn from_score(score: f64) -> Self {
        let score = score.clamp(0.0, 100.0);
        let grade = match score {
            s if s >= 90.0 => Grade::APlus,
            s if s >= 80.0 => Grade::A,
            s if s >= 70.0 => Grade::B,
            s if s >= 60.0 => Grade::C,
            _ => Grade::D,
        };
        let status = if score >= 90.0 {
            ScoreStatus::Excellent
        } else if score >= 70.0 {
            ScoreStatus::Good
        } else {
            ScoreStatus::NeedsImprovement
        };
        Self {
            score,
            grade,
            status,
        }
    }
}

/// Site-wide remediation plan built from page warnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPlan {
    pub summary: PlanSummary,
    pub pages: Vec<PageSummary>,
    /// Every action, most urgent first, then by title
    pub actions: Vec<Action>,
    /// Action count per catalog label
    pub category_stats: BTreeMap<String, usize>,
    pub recommendations: Recommendations,
    pub site_score: SiteScore,
}

/// Classify every page's warnings and assemble the plan
pub fn build_plan(catalog: &RuleCatalog, pages: &[Page]) -> OptimizationPlan {
    let mut actions = Vec::new();
    let mut summaries = Vec::with_capacity(pages.len());

    for page in pages {
        let issues = page_issues(catalog, page)
            .iter()
            .map(|issue| to_action(catalog, issue))
            .collect::<Vec<_>>();

        summaries.push(PageSummary {
            url: page.url.clone(),
            title: page.title.clone(),
            issues_count: issues.len(),
            critical_issues: count_priority(&issues, Priority::Critical),
            high_issues: count_priority(&issues, Priority::High),
            issues: issues.clone(),
        });
        actions.extend(issues);
    }

    actions.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.title.cmp(&b.title))
    });

    let estimated_minutes: u32 = actions
        .iter()
        .filter_map(|a| a.catalog().and_then(|c| c.time_estimate.minutes()))
        .sum();

    let summary = PlanSummary {
        total_pages: pages.len(),
        total_issues: actions.len(),
        critical_issues: count_priority(&actions, Priority::Critical),
        high_issues: count_priority(&actions, Priority::High),
        medium_issues: count_priority(&actions, Priority::Medium),
        low_issues: count_priority(&actions, Priority::Low),
        estimated_minutes,
        estimated_time: format_minutes(estimated_minutes),
    };

    let mut category_stats = BTreeMap::new();
    for label in actions.iter().filter_map(|a| a.catalog().map(|c| c.label.clone())) {
        *category_stats.entry(label).or_insert(0) += 1;
    }

    let recommendations = recommend(catalog, &actions, &summary, &category_stats);
    let site_score = site_score(&summaries);

    ::log::info!(
        "Optimization plan: {} issues over {} pages ({} critical, {} high), estimated {}",
        summary.total_issues,
        summary.total_pages,
        summary.critical_issues,
        summary.high_issues,
        summary.estimated_time
    );

    OptimizationPlan {
        summary,
        pages: summaries,
        actions,
        category_stats,
        recommendations,
        site_score,
    }
}

fn count_priority(actions: &[Action], priority: Priority) -> usize {
    actions.iter().filter(|a| a.priority == priority).count()
}

/// Quadrant of the impact/effort matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    QuickWin,
    MajorProject,
    FillIn,
    Questionable,
}

/// High impact means critical or high priority; low effort means an assessed
/// estimate within the catalog's low-effort limit
pub fn quadrant(catalog: &RuleCatalog, action: &Action) -> Quadrant {
    let high_impact = action.priority.is_high_impact();
    let low_effort = action
        .catalog()
        .is_some_and(|c| c.time_estimate.is_low_effort(catalog.low_effort_minutes));

    match (high_impact, low_effort) {
        (true, true) => Quadrant::QuickWin,
        (true, false) => Quadrant::MajorProject,
        (false, true) => Quadrant::FillIn,
        (false, false) => Quadrant::Questionable,
    }
}

impl PriorityMatrix {
    pub fn push(&mut self, quadrant: Quadrant, action: Action) {
        match quadrant {
            Quadrant::QuickWin => self.quick_wins.push(action),
            Quadrant::MajorProject => self.major_projects.push(action),
            Quadrant::FillIn => self.fill_ins.push(action),
            Quadrant::Questionable => self.questionable.push(action),
        }
    }
}

fn recommend(
    catalog: &RuleCatalog,
    actions: &[Action],
    summary: &PlanSummary,
    category_stats: &BTreeMap<String, usize>,
) -> Recommendations {
    let mut recommendations = Recommendations {
        immediate_actions: actions
            .iter()
            .filter(|a| a.priority.is_high_impact())
            .take(IMMEDIATE_ACTIONS)
            .cloned()
            .collect(),
        short_term_goals: actions
            .iter()
            .filter(|a| a.priority == Priority::Medium)
            .take(SHORT_TERM_GOALS)
            .cloned()
            .collect(),
        ..Recommendations::default()
    };

    if summary.critical_issues > 0 {
        recommendations.long_term_strategy.push(StrategyItem {
            title: "Set up an SEO quality-control process".to_string(),
            description: "Run an SEO checklist before publishing so basic issues never ship"
                .to_string(),
            priority: Priority::High,
        });
    }
    if category_stats.get(SOCIAL_MEDIA_LABEL).is_some_and(|n| *n > 0) {
        recommendations.long_term_strategy.push(StrategyItem {
            title: "Build a social media sharing strategy".to_string(),
            description: "Optimize how every page looks when shared on social platforms"
                .to_string(),
            priority: Priority::Medium,
        });
    }

    for action in actions {
        recommendations
            .priority_matrix
            .push(quadrant(catalog, action), action.clone());
    }

    recommendations
}

/// Pages with issues are graded by their worst tier; each grade's share of
/// affected pages costs up to 40 (high), 30 (medium) or 20 (low) points
fn site_score(pages: &[PageSummary]) -> SiteScore {
    let (mut high, mut medium, mut low) = (0usize, 0usize, 0usize);
    for page in pages.iter().filter(|p| p.issues_count > 0) {
        if page.critical_issues > 0 || page.high_issues > 0 {
            high += 1;
        } else if page.issues.iter().any(|a| a.priority == Priority::Medium) {
            medium += 1;
        } else {
            low += 1;
        }
    }

    let affected = high + medium + low;
    if affected == 0 {
        return SiteScore::from_score(100.0);
    }

    let share = |n: usize| n as f64 / affected as f64;
    let score = 100.0 - 40.0 * share(high) - 30.0 * share(medium) - 20.0 * share(low);
    SiteScore::from_score((score * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ScoredBy, TimeEstimate};
    use crate::optimizer::catalog::IssueKey;
    use crate::optimizer::classify::Issue;

    fn page(url: &str, warnings: &[&str]) -> Page {
        Page {
            url: url.to_string(),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
            ..Page::default()
        }
    }

    fn action(catalog: &RuleCatalog, category: &'static str, subtype: &'static str) -> Action {
        to_action(
            catalog,
            &Issue {
                key: IssueKey::new(category, subtype),
                page_url: "https://example.com/".into(),
                warning: format!("{category} {subtype}"),
            },
        )
    }

    #[test]
    fn test_plan_is_deterministic() {
        let catalog = RuleCatalog::default();
        let pages = vec![
            page("https://example.com/", &["Missing og:image", "Missing title tag"]),
            page("https://example.com/a", &["Image missing alt tag (2 images)", "Odd thing"]),
        ];
        let first = build_plan(&catalog, &pages);
        let second = build_plan(&catalog, &pages);
        assert_eq!(first, second);
    }

    #[test]
    fn test_actions_sorted_by_rank_then_title() {
        let catalog = RuleCatalog::default();
        let pages = vec![page(
            "https://example.com/",
            &[
                "Missing og:image",
                "Number of h2 tags is outside the recommended range (1-6): 0",
                "Image missing alt tag (1 images)",
                "Missing title tag",
                "Missing og:description",
            ],
        )];
        let plan = build_plan(&catalog, &pages);
        let titles: Vec<_> = plan.actions.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Add a page title",
                "Add image alt attributes",
                "Add an Open Graph description",
                "Add an Open Graph image",
                "Rebalance H2 subheadings",
            ]
        );
    }

    #[test]
    fn test_matrix_bucketing() {
        let catalog = RuleCatalog::default();

        // critical, 15 min
        let quick = action(&catalog, "title", "missing");
        assert_eq!(quadrant(&catalog, &quick), Quadrant::QuickWin);
        // high, 30 min
        let major = action(&catalog, "images", "missing_alt");
        assert_eq!(quadrant(&catalog, &major), Quadrant::MajorProject);
        // low, 20 min
        let fill = action(&catalog, "headings", "h2_out_of_range");
        assert_eq!(quadrant(&catalog, &fill), Quadrant::FillIn);
        // medium, unassessed
        let unknown = action(&catalog, "unknown", "issue");
        assert_eq!(unknown.catalog().unwrap().time_estimate, TimeEstimate::ToBeAssessed);
        assert_eq!(quadrant(&catalog, &unknown), Quadrant::Questionable);
    }

    #[test]
    fn test_low_priority_unassessed_is_questionable() {
        let catalog = RuleCatalog::default();
        let mut low = action(&catalog, "headings", "h2_out_of_range");
        assert_eq!(low.priority, Priority::Low);
        if let ScoredBy::Catalog(provenance) = &mut low.scored_by {
            provenance.time_estimate = "待评估".parse().unwrap();
        }
        assert_eq!(low.catalog().unwrap().time_estimate, TimeEstimate::ToBeAssessed);
        assert_eq!(quadrant(&catalog, &low), Quadrant::Questionable);
    }

    #[test]
    fn test_plan_matrix_holds_every_action() {
        let catalog = RuleCatalog::default();
        let plan = build_plan(
            &catalog,
            &[page("https://example.com/", &["Missing title tag", "Missing og:image", "Odd"])],
        );
        let matrix = &plan.recommendations.priority_matrix;
        assert_eq!(matrix.quick_wins.len(), 1);
        assert_eq!(matrix.major_projects.len(), 0);
        assert_eq!(matrix.fill_ins.len(), 0);
        assert_eq!(matrix.questionable.len(), 2);
    }

    #[test]
    fn test_summary_and_total_time() {
        let catalog = RuleCatalog::default();
        let pages = vec![
            page("https://example.com/", &["Missing title tag", "Missing description"]),
            page("https://example.com/a", &["Image missing alt tag (1 images)", "Odd thing"]),
            page("https://example.com/b", &[]),
        ];
        let plan = build_plan(&catalog, &pages);

        assert_eq!(plan.summary.total_pages, 3);
        assert_eq!(plan.summary.total_issues, 4);
        assert_eq!(plan.summary.critical_issues, 2);
        assert_eq!(plan.summary.high_issues, 1);
        assert_eq!(plan.summary.medium_issues, 1);
        // 15 + 20 + 30, the unassessed issue adds nothing
        assert_eq!(plan.summary.estimated_minutes, 65);
        assert_eq!(plan.summary.estimated_time, "1 h 5 min");
        assert_eq!(plan.category_stats["Basic SEO"], 2);
        assert_eq!(plan.category_stats["Other"], 1);

        assert_eq!(plan.pages[0].issues_count, 2);
        assert_eq!(plan.pages[0].critical_issues, 2);
        assert_eq!(plan.pages[2].issues_count, 0);
    }

    #[test]
    fn test_staged_recommendations() {
        let catalog = RuleCatalog::default();
        let warnings: Vec<String> = (0..7).map(|i| format!("Anchor missing title tag: /p{i}")).collect();
        let mut all: Vec<&str> = warnings.iter().map(|w| w.as_str()).collect();
        all.extend(["Missing title tag", "Missing og:title"]);
        let plan = build_plan(&catalog, &[page("https://example.com/", &all)]);

        let recs = &plan.recommendations;
        assert_eq!(recs.immediate_actions.len(), 1);
        assert_eq!(recs.short_term_goals.len(), 8);
        let strategy: Vec<_> = recs.long_term_strategy.iter().map(|s| s.priority).collect();
        assert_eq!(strategy, vec![Priority::High, Priority::Medium]);
    }

    #[test]
    fn test_site_score() {
        let catalog = RuleCatalog::default();
        let clean = build_plan(&catalog, &[page("https://example.com/", &[])]);
        assert_eq!(clean.site_score.score, 100.0);
        assert_eq!(clean.site_score.grade, Grade::APlus);

        let pages = vec![
            page("https://example.com/", &["Missing title tag"]),
            page("https://example.com/a", &["Missing og:title"]),
        ];
        let plan = build_plan(&catalog, &pages);
        // one high page and one medium page: 100 - 20 - 15
        assert_eq!(plan.site_score.score, 65.0);
        assert_eq!(plan.site_score.grade, Grade::C);
        assert_eq!(plan.site_score.status, ScoreStatus::NeedsImprovement);
    }
}
