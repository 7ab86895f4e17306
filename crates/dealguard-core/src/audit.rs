use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Applied,
    Failed,
}

/// Outcome of one cleaning rule, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationResult {
    #[serde(rename = "ruleID")]
    pub rule_id: String,
    pub rule_name: String,
    pub status: RuleStatus,
    /// Informational count; its meaning depends on the rule.
    pub rows_affected: usize,
    pub details: String,
}

impl TransformationResult {
    pub fn applied(rule_id: &str, rule_name: &str, rows_affected: usize) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            status: RuleStatus::Applied,
            rows_affected,
            details: format!("{} rows affected", rows_affected),
        }
    }

    pub fn failed(rule_id: &str, rule_name: &str, message: String) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            status: RuleStatus::Failed,
            rows_affected: 0,
            details: message,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.status == RuleStatus::Applied
    }
}

/// Structured log of one cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: String,
    pub input_file: String,
    pub output_file: String,
    pub original_row_count: usize,
    pub transformations: Vec<TransformationResult>,
    pub final_row_count: usize,
    pub rows_removed: usize,
}

impl AuditRecord {
    pub fn new(original_row_count: usize) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            input_file: String::new(),
            output_file: String::new(),
            original_row_count,
            transformations: Vec::new(),
            final_row_count: original_row_count,
            rows_removed: 0,
        }
    }

    pub fn record(&mut self, result: TransformationResult) {
        self.transformations.push(result);
    }

    pub fn finish(&mut self, final_row_count: usize) {
        self.final_row_count = final_row_count;
        self.rows_removed = self.original_row_count.saturating_sub(final_row_count);
    }

    pub fn with_files(mut self, input_file: String, output_file: String) -> Self {
        self.input_file = input_file;
        self.output_file = output_file;
        self
    }

    pub fn failed_rules(&self) -> usize {
        self.transformations.iter().filter(|t| !t.is_applied()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_json_shape() {
        let mut audit = AuditRecord::new(5).with_files("in.csv".into(), "out.csv".into());
        audit.record(TransformationResult::applied("AUTOFIX-001", "Trim Headers and Values", 5));
        audit.record(TransformationResult::failed(
            "AUTOFIX-003",
            "Standardize Dates",
            "boom".to_string(),
        ));
        audit.finish(3);

        let json = serde_json::to_value(&audit).unwrap();
        assert_eq!(json["originalRowCount"], 5);
        assert_eq!(json["finalRowCount"], 3);
        assert_eq!(json["rowsRemoved"], 2);
        assert_eq!(json["inputFile"], "in.csv");
        assert_eq!(json["transformations"][0]["ruleID"], "AUTOFIX-001");
        assert_eq!(json["transformations"][0]["status"], "applied");
        assert_eq!(json["transformations"][0]["details"], "5 rows affected");
        assert_eq!(json["transformations"][1]["status"], "failed");
        assert_eq!(json["transformations"][1]["rowsAffected"], 0);
        assert_eq!(audit.failed_rules(), 1);
    }
}
