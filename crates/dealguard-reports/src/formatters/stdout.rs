use dealguard_core::{
    analytics::AnalyticsOutcome, AuditRecord, RuleStatus, Severity, ValidationReport,
};
use prettytable::{Cell, Row, Table};

use crate::{
    utils::numbers::{format_amount, format_numbers},
    Reporter,
};

pub struct StdOutFormatter {
    intro: String,
    intro_len: usize,
}

impl StdOutFormatter {
    pub fn new(version: String) -> Self {
        let s = format!("DealGuard v{}", version);
        let n = s.len();
        Self {
            intro: s,
            intro_len: n,
        }
    }

    pub fn audit_table(audit: &AuditRecord) -> String {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Rule"),
            Cell::new("Name"),
            Cell::new("Status"),
            Cell::new("Affected"),
            Cell::new("Details"),
        ]));
        for t in &audit.transformations {
            let status = match t.status {
                RuleStatus::Applied => "applied",
                RuleStatus::Failed => "FAILED",
            };
            table.add_row(Row::new(vec![
                Cell::new(&t.rule_id),
                Cell::new(&t.rule_name),
                Cell::new(status),
                Cell::new(&format_numbers(t.rows_affected)),
                Cell::new(&t.details),
            ]));
        }
        table.to_string()
    }

    pub fn report_table(report: &ValidationReport) -> String {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Rule"),
            Cell::new("Name"),
            Cell::new("Result"),
            Cell::new("Checked"),
            Cell::new("Failed"),
            Cell::new("Message"),
        ]));
        for r in &report.rules {
            let result = match (r.passed, r.severity) {
                (true, _) => "PASS",
                (false, Severity::Error) => "FAIL",
                (false, Severity::Warning) => "WARN",
            };
            table.add_row(Row::new(vec![
                Cell::new(&r.rule_id),
                Cell::new(&r.rule_name),
                Cell::new(result),
                Cell::new(&format_numbers(r.rows_checked)),
                Cell::new(&format_numbers(r.rows_failed)),
                Cell::new(&r.message),
            ]));
        }
        table.to_string()
    }

    pub fn print_cleaning_result(&self, audit: &AuditRecord) {
        println!(
            "\nCleaning: {} rows in, {} rows out ({} removed)",
            format_numbers(audit.original_row_count),
            format_numbers(audit.final_row_count),
            format_numbers(audit.rows_removed)
        );
        print!("{}", Self::audit_table(audit));
        if audit.failed_rules() > 0 {
            println!("  {} rule(s) failed, see details above", audit.failed_rules());
        }
    }

    pub fn print_validation_result(&self, report: &ValidationReport) {
        let status = if report.is_passed() { "PASSED" } else { "FAILED" };
        println!(
            "\nValidation ({} rows) - {}",
            format_numbers(report.row_count),
            status
        );
        print!("{}", Self::report_table(report));
        for instruction in &report.fix_instructions {
            println!("  {}", instruction);
        }
        println!(
            "  {} errors, {} warnings",
            report.summary.error_count, report.summary.warning_count
        );
    }

    pub fn print_analytics_result(&self, outcome: &AnalyticsOutcome) {
        let metrics = &outcome.metrics;
        println!(
            "\nAnalytics: {} opportunities",
            format_numbers(metrics.total_opportunities)
        );
        if let Some(total) = metrics.total_estimated_value {
            println!("  Total estimated value: {}", format_amount(total));
        }
        if let Some(avg) = metrics.avg_probability {
            println!("  Average probability:   {:.1}", avg);
        }
        println!(
            "  Duplicates: {}  Top opportunities: {}  Top risks: {}",
            outcome.quality.duplicates,
            outcome.top_opportunities.num_rows(),
            outcome.top_risks.num_rows()
        );
    }
}

impl Reporter for StdOutFormatter {
    fn on_start(&self, command: &str) {
        let i = "=".repeat(self.intro_len);

        println!("{} - {}", self.intro, command);
        println!("{}", i);
    }

    fn on_loading(&self, path: &str) {
        println!("Loading {}...", path);
    }

    fn on_cleaning_result(&mut self, audit: &AuditRecord) {
        self.print_cleaning_result(audit);
    }

    fn on_validation_result(&mut self, report: &ValidationReport) {
        self.print_validation_result(report);
    }

    fn on_analytics_result(&mut self, outcome: &AnalyticsOutcome) {
        self.print_analytics_result(outcome);
    }

    fn on_artifact(&mut self, label: &str, path: &str) {
        println!("  {} -> {}", label, path);
    }

    fn on_complete(&self, passed: bool) {
        println!("\n===================================");
        println!("Result: {}", if passed { "PASS" } else { "FAIL" });
    }
}
