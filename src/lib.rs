// Re-export modules
pub mod action;
pub mod audit;
pub mod config;
pub mod crawlers;
pub mod decision;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod optimizer;
pub mod page;
pub mod parsers;
pub mod results;

// Re-export commonly used types for convenience
pub use action::{Action, ActionCategory, Priority};
pub use audit::{Audit, AuditReport};
pub use config::AuditConfig;
pub use decision::{DecisionEngine, DecisionPlan, LlmInsights, PerformanceSignals};
pub use error::{AuditError, Result};
pub use optimizer::{OptimizationPlan, RuleCatalog};
pub use page::Page;
pub use results::CrawlResult;
