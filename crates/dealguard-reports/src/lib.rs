pub mod formatters;
pub mod utils;

use dealguard_core::{analytics::AnalyticsOutcome, AuditRecord, ValidationReport};
pub use formatters::{json::JsonFormatter, stdout::StdOutFormatter};

/// Receives pipeline progress and results. Output is advisory: the written
/// audit and report documents stay the source of truth.
pub trait Reporter {
    fn on_start(&self, command: &str);
    fn on_loading(&self, path: &str);
    fn on_cleaning_result(&mut self, audit: &AuditRecord);
    fn on_validation_result(&mut self, report: &ValidationReport);
    fn on_analytics_result(&mut self, outcome: &AnalyticsOutcome);
    fn on_artifact(&mut self, label: &str, path: &str);
    fn on_complete(&self, passed: bool);
}
