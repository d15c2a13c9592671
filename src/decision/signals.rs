//! Optional inputs supplied by collaborators (analytics exports, LLM reviews).
//! They arrive already materialized; nothing here talks to a remote service.

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Search-console style figures for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchData {
    pub position: Option<f64>,
    pub ctr: Option<f64>,
    pub impressions: Option<u64>,
}

/// Analytics figures for one page. Absent metrics never trigger an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagePerformance {
    /// 0..=1
    pub bounce_rate: Option<f64>,
    /// Seconds
    pub avg_session_duration: Option<f64>,
    pub search_data: Option<SearchData>,
}

/// Performance figures keyed by page URL or path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSignals {
    pub page_performance: BTreeMap<String, PagePerformance>,
}

impl PerformanceSignals {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_json(path.as_ref())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Free-form insight payload, carried into the decision plan untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LlmInsights(pub serde_json::Value);

impl LlmInsights {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_json(path.as_ref())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| AuditError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_signals_parse() {
        let json = r#"{
            "page_performance": {
                "https://example.com/": { "bounce_rate": 0.8 },
                "/blog": { "search_data": { "position": 14.5, "impressions": 900 } }
            }
        }"#;
        let signals = PerformanceSignals::from_json(json).unwrap();

        let home = &signals.page_performance["https://example.com/"];
        assert_eq!(home.bounce_rate, Some(0.8));
        assert_eq!(home.avg_session_duration, None);
        assert!(home.search_data.is_none());

        let blog = signals.page_performance["/blog"].search_data.as_ref().unwrap();
        assert_eq!(blog.position, Some(14.5));
        assert_eq!(blog.ctr, None);
    }

    #[test]
    fn test_empty_signals() {
        let signals = PerformanceSignals::from_json("{}").unwrap();
        assert!(signals.page_performance.is_empty());
    }

    #[test]
    fn test_insights_pass_through_any_json() {
        let insights: LlmInsights = serde_json::from_str(r#"{"themes":["pricing"],"score":7}"#).unwrap();
        let back = serde_json::to_value(&insights).unwrap();
        assert_eq!(back["themes"][0], "pricing");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PerformanceSignals::from_file("/nonexistent/signals.json").unwrap_err();
        assert!(matches!(err, AuditError::Io { .. }));
    }
}
