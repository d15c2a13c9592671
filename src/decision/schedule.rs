//! Scoring, tiering and scheduling of decision-engine actions.

use crate::action::{Action, ActionCategory, Priority, ScoredBy, short_hash};
use crate::decision::DecisionRules;
use crate::decision::candidates::Candidate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Metrics every plan tracks regardless of what was found
const BASELINE_METRICS: [&str; 7] = [
    "Improve organic search traffic by 25%+",
    "Achieve top 10 rankings for target keywords",
    "Reduce bounce rate to below 60%",
    "Increase average session duration to 90+ seconds",
    "Fix all technical SEO errors",
    "Improve mobile usability score to 95+",
    "Increase conversion rate from organic traffic",
];

/// Implementation phase, scheduled in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Immediate,
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Immediate,
        Phase::ShortTerm,
        Phase::MediumTerm,
        Phase::LongTerm,
    ];

    /// Critical work is immediate; cheap high-tier work is short-term; the rest
    /// lands in medium or long term depending on tier and size.
    pub fn for_action(rules: &DecisionRules, action: &Action) -> Phase {
        let effort = action.estimated_effort_hours;
        match action.priority {
            Priority::Critical => Phase::Immediate,
            Priority::High if effort <= rules.short_term_max_hours => Phase::ShortTerm,
            Priority::High => Phase::MediumTerm,
            _ if effort <= rules.medium_term_max_hours => Phase::MediumTerm,
            _ => Phase::LongTerm,
        }
    }
}

/// Resource allocation of one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePlan {
    pub phase: Phase,
    pub action_ids: Vec<String>,
    pub hours: f64,
    pub actions_count: usize,
    pub priority_breakdown: BTreeMap<Priority, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationPlan {
    /// One entry per phase, always all four
    pub phases: Vec<PhasePlan>,
    pub total_effort_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub phase: Phase,
    pub duration_weeks: u32,
    pub start_week: u32,
    pub end_week: u32,
    pub hours: f64,
    pub actions_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub phases: Vec<TimelineEntry>,
    pub total_weeks: u32,
    /// One decimal
    pub total_months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub total_actions: usize,
    pub priority_distribution: BTreeMap<Priority, usize>,
    pub type_distribution: BTreeMap<ActionCategory, usize>,
    pub total_effort_hours: f64,
    pub high_impact_actions: usize,
    pub quick_wins: usize,
}

/// Weighted score in 0..=1
pub fn score(rules: &DecisionRules, candidate: &Candidate) -> f64 {
    let effort_share = if rules.effort_ceiling_hours > 0.0 {
        (candidate.effort_hours / rules.effort_ceiling_hours).min(1.0)
    } else {
        1.0
    };
    rules.impact_weight * candidate.impact
        + rules.effort_weight * (1.0 - effort_share)
        + rules.confidence_weight * candidate.confidence
}

pub fn tier(rules: &DecisionRules, score: f64) -> Priority {
    if score >= rules.critical_score {
        Priority::Critical
    } else if score >= rules.high_score {
        Priority::High
    } else if score >= rules.medium_score {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Score every candidate and sort the resulting actions by score, highest first.
/// Equal scores keep their collection order.
pub fn rank(rules: &DecisionRules, candidates: Vec<Candidate>) -> Vec<Action> {
    let mut actions: Vec<Action> = candidates
        .into_iter()
        .map(|candidate| {
            let score = score(rules, &candidate);
            Action {
                id: format!("decision_{}", short_hash(&candidate.title)),
                priority: tier(rules, score),
                title: candidate.title,
                description: candidate.description,
                category: candidate.category,
                estimated_effort_hours: candidate.effort_hours,
                estimated_impact: candidate.impact,
                confidence: candidate.confidence,
                implementation_steps: candidate.steps.iter().map(|s| s.to_string()).collect(),
                success_metrics: candidate.metrics.iter().map(|s| s.to_string()).collect(),
                dependencies: Vec::new(),
                resources_needed: Vec::new(),
                scored_by: ScoredBy::Formula { score },
            }
        })
        .collect();

    actions.sort_by(|a, b| {
        let (a, b) = (a.score().unwrap_or(0.0), b.score().unwrap_or(0.0));
        b.total_cmp(&a)
    });
    actions
}

pub fn implementation_plan(rules: &DecisionRules, actions: &[Action]) -> ImplementationPlan {
    let phases = Phase::ALL
        .iter()
        .map(|&phase| {
            let members: Vec<&Action> = actions
                .iter()
                .filter(|action| Phase::for_action(rules, action) == phase)
                .collect();

            let mut priority_breakdown = BTreeMap::new();
            for action in &members {
                *priority_breakdown.entry(action.priority).or_insert(0) += 1;
            }

            PhasePlan {
                phase,
                action_ids: members.iter().map(|a| a.id.clone()).collect(),
                hours: members.iter().map(|a| a.estimated_effort_hours).sum(),
                actions_count: members.len(),
                priority_breakdown,
            }
        })
        .collect();

    ImplementationPlan {
        phases,
        total_effort_hours: actions.iter().map(|a| a.estimated_effort_hours).sum(),
    }
}

/// Whole weeks needed for `hours` of work; nothing to do takes no time
fn weeks_needed(hours: f64, weekly_capacity: f64) -> u32 {
    if hours <= 0.0 {
        return 0;
    }
    (hours / weekly_capacity.max(1.0)).ceil() as u32
}

/// Lay the phases end to end. A phase with no work occupies no weeks and
/// starts and ends where the previous one ended.
pub fn timeline(rules: &DecisionRules, plan: &ImplementationPlan) -> Timeline {
    let mut cumulative = 0;
    let phases: Vec<TimelineEntry> = plan
        .phases
        .iter()
        .map(|phase| {
            let weeks = weeks_needed(phase.hours, rules.weekly_capacity_hours);
            let start_week = if weeks == 0 { cumulative } else { cumulative + 1 };
            cumulative += weeks;
            TimelineEntry {
                phase: phase.phase,
                duration_weeks: weeks,
                start_week,
                end_week: cumulative,
                hours: phase.hours,
                actions_count: phase.actions_count,
            }
        })
        .collect();

    let total_months = if rules.weeks_per_month > 0.0 {
        (f64::from(cumulative) / rules.weeks_per_month * 10.0).round() / 10.0
    } else {
        0.0
    };

    Timeline {
        phases,
        total_weeks: cumulative,
        total_months,
    }
}

pub fn summary(rules: &DecisionRules, actions: &[Action]) -> DecisionSummary {
    let mut priority_distribution = BTreeMap::new();
    let mut type_distribution = BTreeMap::new();
    for action in actions {
        *priority_distribution.entry(action.priority).or_insert(0) += 1;
        *type_distribution.entry(action.category).or_insert(0) += 1;
    }

    DecisionSummary {
        total_actions: actions.len(),
        priority_distribution,
        type_distribution,
        total_effort_hours: actions.iter().map(|a| a.estimated_effort_hours).sum(),
        high_impact_actions: actions
            .iter()
            .filter(|a| a.estimated_impact > rules.high_impact_threshold)
            .count(),
        quick_wins: actions
            .iter()
            .filter(|a| {
                a.estimated_effort_hours <= rules.quick_win_max_hours
                    && a.estimated_impact > rules.quick_win_min_impact
            })
            .count(),
    }
}

/// Baseline metrics followed by every action's own, first occurrence kept
pub fn success_metrics(actions: &[Action]) -> Vec<String> {
    let mut seen = HashSet::new();
    BASELINE_METRICS
        .iter()
        .map(|m| m.to_string())
        .chain(actions.iter().flat_map(|a| a.success_metrics.iter().cloned()))
        .filter(|metric| seen.insert(metric.clone()))
        .collect()
}
