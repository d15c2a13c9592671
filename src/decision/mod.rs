//! Decision engine: turns crawl findings and optional performance signals into
//! scored, tiered actions with a phased implementation plan.

pub mod candidates;
pub mod schedule;
pub mod signals;

use crate::action::Action;
use crate::results::CrawlResult;
use serde::{Deserialize, Serialize};

pub use schedule::{DecisionSummary, ImplementationPlan, Phase, PhasePlan, Timeline, TimelineEntry};
pub use signals::{LlmInsights, PagePerformance, PerformanceSignals, SearchData};

/// Thresholds and weights of the decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionRules {
    /// Bounce rates above this trigger an action (0..=1)
    pub bounce_rate_threshold: f64,
    /// Average sessions shorter than this, in seconds, trigger an action
    pub session_duration_threshold: f64,
    /// Visible text shorter than this many characters is thin
    pub content_length_threshold: usize,
    pub title_min_length: usize,
    /// Search positions worse than this trigger an action
    pub position_threshold: f64,
    pub ctr_threshold: f64,
    /// CTR is only judged above this many impressions
    pub impression_threshold: u64,

    pub impact_weight: f64,
    pub effort_weight: f64,
    pub confidence_weight: f64,
    /// Effort at or beyond this contributes nothing to the score
    pub effort_ceiling_hours: f64,

    pub critical_score: f64,
    pub high_score: f64,
    pub medium_score: f64,

    pub short_term_max_hours: f64,
    pub medium_term_max_hours: f64,
    pub weekly_capacity_hours: f64,
    pub weeks_per_month: f64,

    pub quick_win_max_hours: f64,
    pub quick_win_min_impact: f64,
    pub high_impact_threshold: f64,
}

impl Default for DecisionRules {
    fn default() -> Self {
        Self {
            bounce_rate_threshold: 0.7,
            session_duration_threshold: 60.0,
            content_length_threshold: 300,
            title_min_length: 30,
            position_threshold: 10.0,
            ctr_threshold: 0.02,
            impression_threshold: 100,
            impact_weight: 0.5,
            effort_weight: 0.3,
            confidence_weight: 0.2,
            effort_ceiling_hours: 40.0,
            critical_score: 0.8,
            high_score: 0.6,
            medium_score: 0.4,
            short_term_max_hours: 16.0,
            medium_term_max_hours: 24.0,
            weekly_capacity_hours: 20.0,
            weeks_per_month: 4.33,
            quick_win_max_hours: 4.0,
            quick_win_min_impact: 0.6,
            high_impact_threshold: 0.7,
        }
    }
}

/// Output of one decision run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPlan {
    /// Sorted by score, highest first
    pub recommendations: Vec<Action>,
    pub implementation_plan: ImplementationPlan,
    pub summary: DecisionSummary,
    pub timeline: Timeline,
    pub success_metrics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_insights: Option<LlmInsights>,
}

#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    rules: DecisionRules,
}

impl DecisionEngine {
    pub fn new(rules: DecisionRules) -> Self {
        Self { rules }
    }

    /// Analyze a crawl. Missing signals leave only the structural checks.
    pub fn analyze(
        &self,
        crawl: &CrawlResult,
        signals: Option<&PerformanceSignals>,
        insights: Option<&LlmInsights>,
    ) -> DecisionPlan {
        let candidates = candidates::collect(&self.rules, crawl, signals);
        let recommendations = schedule::rank(&self.rules, candidates);

        let implementation_plan = schedule::implementation_plan(&self.rules, &recommendations);
        let timeline = schedule::timeline(&self.rules, &implementation_plan);
        let summary = schedule::summary(&self.rules, &recommendations);
        let success_metrics = schedule::success_metrics(&recommendations);

        ::log::info!(
            "Decision engine produced {} actions over {} weeks",
            recommendations.len(),
            timeline.total_weeks
        );

        DecisionPlan {
            recommendations,
            implementation_plan,
            summary,
            timeline,
            success_metrics,
            llm_insights: insights.cloned(),
        }
    }
}
