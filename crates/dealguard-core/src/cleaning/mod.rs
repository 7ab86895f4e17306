//! Cleaning Engine.
//!
//! Runs an ordered list of [`TransformationRule`]s over a [`Table`] and
//! records one [`TransformationResult`] per rule. A rule that fails is
//! recorded as `failed` and the next rule sees the table as it was before
//! the failing rule.
//!
//! ```no_run
//! use dealguard_core::cleaning::{CleaningConfig, CleaningEngine};
//! use dealguard_core::readers::{load_table, ReaderConfig};
//!
//! let table = load_table("opportunities.csv", &ReaderConfig::default())?;
//! let outcome = CleaningEngine::new(CleaningConfig::default()).clean(&table);
//! println!("{} rows removed", outcome.audit.rows_removed);
//! # Ok::<(), dealguard_core::LoadError>(())
//! ```

mod config;
pub mod rules;
pub mod synonyms;

use tracing::{debug, info, warn};

pub use config::CleaningConfig;

use crate::{
    audit::{AuditRecord, TransformationResult},
    errors::RuleError,
    table::Table,
};

/// Table produced by a rule and the rule's affected count.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub table: Table,
    pub affected: usize,
}

impl RuleOutcome {
    pub fn new(table: Table, affected: usize) -> Self {
        Self { table, affected }
    }
}

pub type RuleFn = fn(&Table, &CleaningConfig) -> Result<RuleOutcome, RuleError>;

/// A named, independently auditable transformation.
#[derive(Clone, Copy)]
pub struct TransformationRule {
    pub id: &'static str,
    pub name: &'static str,
    apply: RuleFn,
}

impl TransformationRule {
    pub const fn new(id: &'static str, name: &'static str, apply: RuleFn) -> Self {
        Self { id, name, apply }
    }

    pub fn apply(&self, table: &Table, config: &CleaningConfig) -> Result<RuleOutcome, RuleError> {
        (self.apply)(table, config)
    }
}

impl std::fmt::Debug for TransformationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformationRule")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// The fixed chain, in execution order. Later rules rely on the state left
/// by earlier ones (e.g. de-duplication runs on normalised stages).
pub fn default_rules() -> Vec<TransformationRule> {
    vec![
        TransformationRule::new("AUTOFIX-001", "Trim Headers and Values", rules::trim_whitespace),
        TransformationRule::new("AUTOFIX-002", "Normalize Casing", rules::normalize_casing),
        TransformationRule::new("AUTOFIX-003", "Standardize Dates", rules::standardize_dates),
        TransformationRule::new(
            "AUTOFIX-004",
            "Coerce Numeric Fields",
            rules::coerce_numeric_fields,
        ),
        TransformationRule::new(
            "AUTOFIX-005",
            "Normalize Categorical Values",
            rules::normalize_categorical_values,
        ),
        TransformationRule::new("AUTOFIX-006", "Remove Empty Rows", rules::remove_empty_rows),
        TransformationRule::new("AUTOFIX-007", "De-duplicate Rows", rules::deduplicate),
    ]
}

/// Cleaned table plus the audit record describing how it was produced.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub table: Table,
    pub audit: AuditRecord,
}

pub struct CleaningEngine {
    config: CleaningConfig,
    rules: Vec<TransformationRule>,
}

impl Default for CleaningEngine {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

impl CleaningEngine {
    pub fn new(config: CleaningConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// Replace the rule chain, e.g. to run a subset in tests.
    pub fn with_rules(self, rules: Vec<TransformationRule>) -> Self {
        Self { rules, ..self }
    }

    /// Run every rule in order. Never fails: rule errors end up in the audit.
    pub fn clean(&self, table: &Table) -> CleaningOutcome {
        let mut audit = AuditRecord::new(table.num_rows());
        let mut current = table.clone();
        info!(rows = table.num_rows(), rules = self.rules.len(), "cleaning started");

        for rule in &self.rules {
            match rule.apply(&current, &self.config) {
                Ok(outcome) => {
                    debug!(rule = rule.id, affected = outcome.affected, "rule applied");
                    audit.record(TransformationResult::applied(
                        rule.id,
                        rule.name,
                        outcome.affected,
                    ));
                    current = outcome.table;
                }
                Err(e) => {
                    warn!(rule = rule.id, error = %e, "rule failed, table left unchanged");
                    audit.record(TransformationResult::failed(rule.id, rule.name, e.to_string()));
                }
            }
        }

        audit.finish(current.num_rows());
        info!(
            original = audit.original_row_count,
            remaining = audit.final_row_count,
            "cleaning finished"
        );
        CleaningOutcome {
            table: current,
            audit,
        }
    }
}

/// Run the default rule chain with `config`.
pub fn clean(table: &Table, config: &CleaningConfig) -> CleaningOutcome {
    CleaningEngine::new(config.clone()).clean(table)
}
