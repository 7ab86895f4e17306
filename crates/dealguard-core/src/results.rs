use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    DataQuality,
    BusinessLogic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

/// Outcome of one validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    #[serde(rename = "ruleID")]
    pub rule_id: String,
    pub rule_name: String,
    pub category: Category,
    pub severity: Severity,
    pub passed: bool,
    pub rows_checked: usize,
    pub rows_passed: usize,
    pub rows_failed: usize,
    pub rows_warning: usize,
    pub message: String,
}

impl RuleResult {
    pub fn new(
        rule_id: &str,
        rule_name: &str,
        category: Category,
        severity: Severity,
        check: CheckOutcome,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            category,
            severity,
            passed: check.passed,
            rows_checked: check.rows_checked,
            rows_passed: check.rows_passed,
            rows_failed: check.rows_failed,
            rows_warning: if check.passed { 0 } else { check.rows_failed },
            message: check.message,
        }
    }

    /// A rule whose check itself errored. Always error severity.
    pub fn errored(rule_id: &str, rule_name: &str, category: Category, error: String) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            category,
            severity: Severity::Error,
            passed: false,
            rows_checked: 0,
            rows_passed: 0,
            rows_failed: 0,
            rows_warning: 0,
            message: format!("Validation error: {}", error),
        }
    }
}

/// What a validation check found, before the rule metadata is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
    pub rows_checked: usize,
    pub rows_passed: usize,
    pub rows_failed: usize,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>, rows_checked: usize) -> Self {
        Self {
            passed: true,
            message: message.into(),
            rows_checked,
            rows_passed: rows_checked,
            rows_failed: 0,
        }
    }

    pub fn fail(message: impl Into<String>, rows_checked: usize, rows_failed: usize) -> Self {
        Self {
            passed: false,
            message: message.into(),
            rows_checked,
            rows_passed: rows_checked.saturating_sub(rows_failed),
            rows_failed,
        }
    }
}

/// Structured outcome of one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub timestamp: String,
    pub input_file: String,
    pub schema_file: String,
    pub row_count: usize,
    pub overall_status: OverallStatus,
    pub summary: Summary,
    pub rules: Vec<RuleResult>,
    pub fix_instructions: Vec<String>,
}

impl ValidationReport {
    pub fn new(row_count: usize) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            input_file: String::new(),
            schema_file: String::new(),
            row_count,
            overall_status: OverallStatus::Pass,
            summary: Summary::default(),
            rules: Vec::new(),
            fix_instructions: Vec::new(),
        }
    }

    pub fn with_files(mut self, input_file: String, schema_file: String) -> Self {
        self.input_file = input_file;
        self.schema_file = schema_file;
        self
    }

    /// Append a rule result and update the summary and overall status.
    pub fn record(&mut self, result: RuleResult) {
        if !result.passed {
            match result.severity {
                Severity::Error => {
                    self.summary.error_count += 1;
                    self.overall_status = OverallStatus::Fail;
                    self.fix_instructions
                        .push(format!("Fix {}: {}", result.rule_name, result.message));
                }
                Severity::Warning => self.summary.warning_count += 1,
            }
        }
        self.rules.push(result);
    }

    pub fn is_passed(&self) -> bool {
        self.overall_status == OverallStatus::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(severity: Severity, passed: bool) -> RuleResult {
        let check = if passed {
            CheckOutcome::pass("ok", 10)
        } else {
            CheckOutcome::fail("bad", 10, 4)
        };
        RuleResult::new("VAL-X", "Check", Category::DataQuality, severity, check)
    }

    #[test]
    fn test_warning_never_fails_report() {
        let mut report = ValidationReport::new(10);
        report.record(rule(Severity::Warning, false));
        assert!(report.is_passed());
        assert_eq!(report.summary.warning_count, 1);
        assert!(report.fix_instructions.is_empty());
    }

    #[test]
    fn test_error_fails_report() {
        let mut report = ValidationReport::new(10);
        report.record(rule(Severity::Error, true));
        assert!(report.is_passed());
        report.record(rule(Severity::Error, false));
        assert_eq!(report.overall_status, OverallStatus::Fail);
        assert_eq!(report.summary.error_count, 1);
        assert_eq!(report.fix_instructions, vec!["Fix Check: bad".to_string()]);
    }

    #[test]
    fn test_rows_warning_and_json_keys() {
        let failed = rule(Severity::Warning, false);
        assert_eq!(failed.rows_passed, 6);
        assert_eq!(failed.rows_warning, 4);

        let mut report = ValidationReport::new(10);
        report.record(failed);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overallStatus"], "PASS");
        assert_eq!(json["summary"]["warningCount"], 1);
        assert_eq!(json["rules"][0]["ruleID"], "VAL-X");
        assert_eq!(json["rules"][0]["category"], "DataQuality");
        assert_eq!(json["rules"][0]["severity"], "warning");
        assert_eq!(json["rules"][0]["rowsWarning"], 4);
    }

    #[test]
    fn test_errored_rule_message() {
        let result = RuleResult::errored("VAL-002", "Data Type Validation", Category::DataQuality, "boom".into());
        assert_eq!(result.message, "Validation error: boom");
        assert_eq!(result.severity, Severity::Error);
        assert!(!result.passed);
    }
}
