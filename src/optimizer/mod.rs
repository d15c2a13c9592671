//! Rule-based recommendations: page warnings are classified against a fixed
//! catalog and turned into a site-wide optimization plan.

pub mod catalog;
pub mod classify;
pub mod plan;

pub use catalog::{IssueKey, RuleCatalog};
pub use classify::{Issue, classify};
pub use plan::{OptimizationPlan, build_plan};
