//! Validation Engine.
//!
//! Checks a table against a [`ValidationSchema`] and an optional
//! [`AllowedValues`] document. A check that errors is recorded as a failed
//! error-severity rule; it never aborts the run.

pub mod rules;

use tracing::{debug, info, warn};

use crate::{
    errors::RuleError,
    results::{Category, CheckOutcome, RuleResult, Severity, ValidationReport},
    schema::{AllowedValues, ValidationSchema},
    table::Table,
};

/// Everything a check may look at.
pub struct ValidationContext<'a> {
    pub table: &'a Table,
    pub schema: &'a ValidationSchema,
    pub allowed_values: Option<&'a AllowedValues>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        table: &'a Table,
        schema: &'a ValidationSchema,
        allowed_values: Option<&'a AllowedValues>,
    ) -> Self {
        Self {
            table,
            schema,
            allowed_values,
        }
    }
}

pub type CheckFn = fn(&ValidationContext) -> Result<CheckOutcome, RuleError>;

#[derive(Clone, Copy)]
pub struct ValidationRule {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub severity: Severity,
    check: CheckFn,
}

impl ValidationRule {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        category: Category,
        severity: Severity,
        check: CheckFn,
    ) -> Self {
        Self {
            id,
            name,
            category,
            severity,
            check,
        }
    }

    fn run(&self, ctx: &ValidationContext) -> RuleResult {
        match (self.check)(ctx) {
            Ok(outcome) => {
                debug!(rule = self.id, passed = outcome.passed, "check finished");
                RuleResult::new(self.id, self.name, self.category, self.severity, outcome)
            }
            Err(e) => {
                warn!(rule = self.id, error = %e, "check errored");
                RuleResult::errored(self.id, self.name, self.category, e.to_string())
            }
        }
    }
}

pub fn default_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule::new(
            "VAL-001",
            "Required Columns Check",
            Category::DataQuality,
            Severity::Error,
            rules::required_columns,
        ),
        ValidationRule::new(
            "VAL-002",
            "Data Type Validation",
            Category::DataQuality,
            Severity::Error,
            rules::data_types,
        ),
        ValidationRule::new(
            "VAL-003",
            "Null Threshold Check",
            Category::DataQuality,
            Severity::Warning,
            rules::null_thresholds,
        ),
        ValidationRule::new(
            "VAL-004",
            "Allowed Values Check",
            Category::BusinessLogic,
            Severity::Warning,
            rules::allowed_values,
        ),
    ]
}

pub struct ValidationEngine<'a> {
    schema: &'a ValidationSchema,
    allowed_values: Option<&'a AllowedValues>,
    rules: Vec<ValidationRule>,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(schema: &'a ValidationSchema, allowed_values: Option<&'a AllowedValues>) -> Self {
        Self {
            schema,
            allowed_values,
            rules: default_rules(),
        }
    }

    pub fn with_rules(self, rules: Vec<ValidationRule>) -> Self {
        Self { rules, ..self }
    }

    /// Run every check against `table` and aggregate the report.
    pub fn validate(&self, table: &Table) -> ValidationReport {
        let ctx = ValidationContext::new(table, self.schema, self.allowed_values);
        let mut report = ValidationReport::new(table.num_rows());
        info!(rows = table.num_rows(), "validation started");

        for rule in &self.rules {
            report.record(rule.run(&ctx));
        }

        info!(
            status = ?report.overall_status,
            errors = report.summary.error_count,
            warnings = report.summary.warning_count,
            "validation finished"
        );
        report
    }
}

pub fn validate(
    table: &Table,
    schema: &ValidationSchema,
    allowed_values: Option<&AllowedValues>,
) -> ValidationReport {
    ValidationEngine::new(schema, allowed_values).validate(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::OverallStatus;

    fn failing_check(_ctx: &ValidationContext) -> Result<CheckOutcome, RuleError> {
        Err(RuleError::ColumnNotFound("Ghost".to_string()))
    }

    fn warn_check(_ctx: &ValidationContext) -> Result<CheckOutcome, RuleError> {
        Ok(CheckOutcome::fail("meh", 3, 3))
    }

    fn required(columns: &[&str]) -> ValidationSchema {
        ValidationSchema {
            required_columns: Some(columns.iter().map(|c| c.to_string()).collect()),
            column_definitions: Some(vec![]),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_stage_fails() {
        let table = Table::from_strings(vec![("OpportunityID", vec![Some("OPP-1")])]).unwrap();
        let schema = required(&["OpportunityID", "Stage"]);
        let report = validate(&table, &schema, None);

        assert_eq!(report.overall_status, OverallStatus::Fail);
        assert_eq!(report.summary.error_count, 1);
        assert_eq!(report.rules.len(), 4);
        assert!(report.rules[0].message.contains("Stage"));
        assert_eq!(report.fix_instructions.len(), 1);
    }

    #[test]
    fn test_warning_only_passes() {
        let table = Table::from_strings(vec![("Stage", vec![Some("Lead")])]).unwrap();
        let schema = required(&["Stage"]);
        let engine = ValidationEngine::new(&schema, None).with_rules(vec![ValidationRule::new(
            "W-1",
            "Warn",
            Category::BusinessLogic,
            Severity::Warning,
            warn_check,
        )]);
        let report = engine.validate(&table);
        assert!(report.is_passed());
        assert_eq!(report.summary.warning_count, 1);
    }

    #[test]
    fn test_errored_check_is_recorded() {
        let table = Table::from_strings(vec![("Stage", vec![Some("Lead")])]).unwrap();
        let schema = required(&["Stage"]);
        let engine = ValidationEngine::new(&schema, None).with_rules(vec![
            ValidationRule::new(
                "E-1",
                "Crashes",
                Category::DataQuality,
                Severity::Warning,
                failing_check,
            ),
            ValidationRule::new(
                "VAL-001",
                "Required Columns Check",
                Category::DataQuality,
                Severity::Error,
                rules::required_columns,
            ),
        ]);
        let report = engine.validate(&table);

        assert_eq!(report.rules.len(), 2);
        assert_eq!(report.rules[0].severity, Severity::Error);
        assert!(report.rules[0].message.starts_with("Validation error:"));
        assert!(report.rules[1].passed);
        assert_eq!(report.summary.error_count, 1);
        assert_eq!(report.overall_status, OverallStatus::Fail);
    }

    #[test]
    fn test_missing_schema_section_fails_rule_only() {
        let table = Table::from_strings(vec![("Stage", vec![Some("Lead")])]).unwrap();
        let schema = ValidationSchema::default();
        let report = validate(&table, &schema, None);
        assert_eq!(report.rules.len(), 4);
        assert_eq!(report.summary.error_count, 2);
        assert!(report.rules[2].passed);
        assert!(report.rules[3].passed);
    }
}
