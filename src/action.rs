//! Recommended remediations shared by the rule engine and the decision engine.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Priority tier of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Sort rank, 0 is most urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Fixed priority-level score used by the rule catalog
    pub fn level_score(self) -> u32 {
        match self {
            Priority::Critical => 100,
            Priority::High => 80,
            Priority::Medium => 60,
            Priority::Low => 40,
        }
    }

    pub fn is_high_impact(self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work an action asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Content,
    Technical,
    UserExperience,
    LinkBuilding,
    Keyword,
    Performance,
    StructuredData,
}

/// How long a catalog remediation is expected to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEstimate {
    Minutes(u32),
    ToBeAssessed,
}

impl TimeEstimate {
    pub fn minutes(self) -> Option<u32> {
        match self {
            TimeEstimate::Minutes(minutes) => Some(minutes),
            TimeEstimate::ToBeAssessed => None,
        }
    }

    /// Unassessed estimates are never low effort
    pub fn is_low_effort(self, max_minutes: u32) -> bool {
        self.minutes().is_some_and(|m| m <= max_minutes)
    }
}

impl FromStr for TimeEstimate {
    type Err = std::convert::Infallible;

    /// Accepts `15 min`, `15 minutes`, `15m` and `15分钟`; anything else is unassessed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits_end = s
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(s.len(), |(i, _)| i);
        let (number, unit) = s.split_at(digits_end);

        let minutes = match unit.trim() {
            "min" | "mins" | "minute" | "minutes" | "m" | "分钟" => number.parse().ok(),
            _ => None,
        };
        Ok(minutes.map_or(TimeEstimate::ToBeAssessed, TimeEstimate::Minutes))
    }
}

impl fmt::Display for TimeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeEstimate::Minutes(minutes) => write!(f, "{minutes} min"),
            TimeEstimate::ToBeAssessed => f.write_str("to be assessed"),
        }
    }
}

impl Serialize for TimeEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeEstimate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(text.parse().unwrap_or(TimeEstimate::ToBeAssessed))
    }
}

/// Renders a minute total as `N min`, `H h` or `H h M min`
pub fn format_minutes(total: u32) -> String {
    if total < 60 {
        return format!("{total} min");
    }
    let (hours, minutes) = (total / 60, total % 60);
    if minutes > 0 {
        format!("{hours} h {minutes} min")
    } else {
        format!("{hours} h")
    }
}

/// First 8 hex digits of the SHA-256 of `text`
pub fn short_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{digest:x}")[..8].to_string()
}

/// Where a rule-engine action came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProvenance {
    /// Issue category, e.g. `title`
    pub issue_category: String,
    /// Issue subtype, e.g. `missing`
    pub issue_subtype: String,
    /// Human-facing catalog grouping, e.g. `Basic SEO`
    pub label: String,
    /// One-line remediation
    pub action: String,
    pub expected_impact: String,
    pub time_estimate: TimeEstimate,
    pub original_warning: String,
    pub page_url: String,
    pub status: String,
}

/// Which priority system produced the action's tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoredBy {
    /// Looked up in the static rule catalog
    Catalog(CatalogProvenance),
    /// Computed by the weighted decision formula
    Formula { score: f64 },
}

/// A recommended remediation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ActionCategory,
    pub priority: Priority,
    pub estimated_effort_hours: f64,
    /// 0..=1
    pub estimated_impact: f64,
    /// 0..=1
    pub confidence: f64,
    pub implementation_steps: Vec<String>,
    pub success_metrics: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources_needed: Vec<String>,
    pub scored_by: ScoredBy,
}

impl Action {
    pub fn catalog(&self) -> Option<&CatalogProvenance> {
        match &self.scored_by {
            ScoredBy::Catalog(provenance) => Some(provenance),
            ScoredBy::Formula { .. } => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self.scored_by {
            ScoredBy::Formula { score } => Some(score),
            ScoredBy::Catalog(_) => None,
        }
    }
}
