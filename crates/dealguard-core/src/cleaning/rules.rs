//! The seven cleaning transformations.
//!
//! Every rule takes the table by reference and returns a new one, so a rule
//! that fails leaves the previous state untouched for the next rule.

use std::sync::Arc;

use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray},
    compute::cast,
    datatypes::DataType,
};

use crate::{
    cleaning::{synonyms::STAGE_SYNONYMS, CleaningConfig, RuleOutcome},
    errors::RuleError,
    table::Table,
    utils::{
        date_parser::standardize_date_column,
        hasher::new_key_set,
        numbers::{coerce_number, parse_number},
        text::title_case,
    },
};

const NULL_ID: &str = "\u{0}";

/// Apply `f` to every non-null value; returns the new array and how many
/// values actually changed.
fn map_strings<F>(array: &StringArray, f: F) -> (StringArray, usize)
where
    F: Fn(&str) -> String,
{
    let mut changed = 0;
    let mapped: StringArray = array
        .iter()
        .map(|value| {
            value.map(|v| {
                let out = f(v);
                if out != v {
                    changed += 1;
                }
                out
            })
        })
        .collect();
    (mapped, changed)
}

fn expect_strings<'a>(table: &'a Table, column: &str) -> Result<&'a StringArray, RuleError> {
    let array = table
        .column(column)
        .ok_or_else(|| RuleError::ColumnNotFound(column.to_string()))?;
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| RuleError::UnexpectedType {
            column: column.to_string(),
            found: array.data_type().to_string(),
        })
}

/// AUTOFIX-001: trim column names and every text cell.
/// Columns are visited by position, so headers that collide once trimmed
/// are each trimmed. Affected count is the row count.
pub fn trim_whitespace(table: &Table, _config: &CleaningConfig) -> Result<RuleOutcome, RuleError> {
    let columns = table
        .named_columns()
        .into_iter()
        .map(|(name, array)| {
            let trimmed = array
                .as_any()
                .downcast_ref::<StringArray>()
                .map(|strings| map_strings(strings, |v| v.trim().to_string()));
            let array = match trimmed {
                Some((trimmed, changed)) if changed > 0 => Arc::new(trimmed) as ArrayRef,
                _ => array,
            };
            (name.trim().to_string(), array)
        })
        .collect();
    let trimmed = Table::try_from_columns(columns, table.num_rows())?;

    let affected = trimmed.num_rows();
    Ok(RuleOutcome::new(trimmed, affected))
}

/// AUTOFIX-002: title-case the configured categorical columns.
/// Affected count is the number of values that changed.
pub fn normalize_casing(table: &Table, config: &CleaningConfig) -> Result<RuleOutcome, RuleError> {
    let mut out = table.clone();
    let mut affected = 0;
    for column in &config.casing_columns {
        if !out.has_column(column) {
            continue;
        }
        let (array, changed) = map_strings(expect_strings(&out, column)?, title_case);
        affected += changed;
        out = out.with_column(column, Arc::new(array))?;
    }
    Ok(RuleOutcome::new(out, affected))
}

/// AUTOFIX-003: rewrite date columns as `YYYY-MM-DD`, unparseable → null.
/// Affected count is the number of non-null results.
pub fn standardize_dates(table: &Table, config: &CleaningConfig) -> Result<RuleOutcome, RuleError> {
    let mut out = table.clone();
    let mut affected = 0;
    for column in &config.date_columns {
        let Some(array) = out.column(column) else {
            continue;
        };
        let text = cast(array.as_ref(), &DataType::Utf8)?;
        let strings = text
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| RuleError::UnexpectedType {
                column: column.clone(),
                found: text.data_type().to_string(),
            })?;
        let standardized = standardize_date_column(strings);
        affected += standardized.len() - standardized.null_count();
        out = out.with_column(column, Arc::new(standardized))?;
    }
    Ok(RuleOutcome::new(out, affected))
}

/// AUTOFIX-004: strip separators and currency symbols from text columns and
/// store them as `Float64`. Columns already numeric are left alone.
/// Affected count is the row count per coerced column; a text column whose
/// values all parse as plain numbers (e.g. re-read cleaned output) counts 0.
pub fn coerce_numeric_fields(
    table: &Table,
    config: &CleaningConfig,
) -> Result<RuleOutcome, RuleError> {
    let mut out = table.clone();
    let mut affected = 0;
    for column in &config.numeric_columns {
        let Some(strings) = out.string_column(column) else {
            continue;
        };
        let numbers: Float64Array = strings.iter().map(|v| v.and_then(coerce_number)).collect();
        if !strings.iter().flatten().all(|v| parse_number(v).is_some()) {
            affected += out.num_rows();
        }
        out = out.with_column(column, Arc::new(numbers))?;
    }
    Ok(RuleOutcome::new(out, affected))
}

/// AUTOFIX-005: map stage synonyms to their canonical value, title-case the
/// rest. Non-text columns pass through. Affected count is values changed.
pub fn normalize_categorical_values(
    table: &Table,
    config: &CleaningConfig,
) -> Result<RuleOutcome, RuleError> {
    let Some(strings) = table.string_column(&config.stage_column) else {
        return Ok(RuleOutcome::new(table.clone(), 0));
    };
    let (array, changed) = map_strings(strings, |v| STAGE_SYNONYMS.normalize(v));
    let out = table.with_column(&config.stage_column, Arc::new(array))?;
    Ok(RuleOutcome::new(out, changed))
}

/// AUTOFIX-006: drop rows where every column is null.
/// Affected count is rows removed.
pub fn remove_empty_rows(table: &Table, _config: &CleaningConfig) -> Result<RuleOutcome, RuleError> {
    let mask: BooleanArray = (0..table.num_rows())
        .map(|row| Some(!table.is_row_empty(row)))
        .collect();
    let out = table.filter(&mask)?;
    let removed = table.num_rows() - out.num_rows();
    Ok(RuleOutcome::new(out, removed))
}

/// AUTOFIX-007: keep the first row per identifier, or per full row content
/// when the identifier column is absent. Affected count is rows removed.
pub fn deduplicate(table: &Table, config: &CleaningConfig) -> Result<RuleOutcome, RuleError> {
    let id_index = table.batch().schema().index_of(&config.id_column).ok();
    let mut seen = new_key_set();
    let mut keep = Vec::with_capacity(table.num_rows());
    for row in 0..table.num_rows() {
        let key = match id_index {
            // Null identifiers are all treated as one value
            Some(index) => table
                .cell_key(index, row)?
                .unwrap_or_else(|| NULL_ID.to_string()),
            None => table.row_key(row)?,
        };
        keep.push(Some(seen.insert(key)));
    }
    let mask: BooleanArray = keep.into_iter().collect();
    let out = table.filter(&mask)?;
    let removed = table.num_rows() - out.num_rows();
    Ok(RuleOutcome::new(out, removed))
}
