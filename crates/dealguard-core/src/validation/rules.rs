//! The four validation checks. Each one looks at the whole table and returns
//! a [`CheckOutcome`]; data-quality findings are outcomes, never errors.

use arrow::{
    array::{Array, ArrayRef, StringArray},
    datatypes::DataType,
};
use tracing::debug;

use crate::{
    errors::RuleError,
    results::CheckOutcome,
    schema::ColumnType,
    utils::{date_parser::parse_date, numbers::parse_number},
    validation::ValidationContext,
};

/// VAL-001: every required column is present.
pub fn required_columns(ctx: &ValidationContext) -> Result<CheckOutcome, RuleError> {
    let required = ctx
        .schema
        .required_columns
        .as_ref()
        .ok_or(RuleError::MissingSchemaSection("requiredColumns"))?;
    let rows = ctx.table.num_rows();
    let missing: Vec<&str> = required
        .iter()
        .filter(|column| !ctx.table.has_column(column))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        Ok(CheckOutcome::pass("All required columns present", rows))
    } else {
        Ok(CheckOutcome::fail(
            format!("Missing required columns: {}", missing.join(", ")),
            rows,
            rows,
        ))
    }
}

/// Non-null cells of `array` that are not representable as a number.
fn count_non_numeric(array: &ArrayRef) -> usize {
    match array.data_type() {
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|strings| {
                strings
                    .iter()
                    .flatten()
                    .filter(|v| parse_number(v).is_none())
                    .count()
            })
            .unwrap_or(0),
        t if t.is_numeric() || t == &DataType::Null => 0,
        _ => array.len() - array.null_count(),
    }
}

fn count_unparsed_dates(array: &ArrayRef) -> usize {
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .map(|strings| {
            strings
                .iter()
                .flatten()
                .filter(|v| parse_date(v).is_none())
                .count()
        })
        .unwrap_or(0)
}

/// VAL-002: declared numeric columns hold numbers. Declared date columns are
/// parsed best-effort; values that do not parse are tolerated.
pub fn data_types(ctx: &ValidationContext) -> Result<CheckOutcome, RuleError> {
    let definitions = ctx
        .schema
        .column_definitions
        .as_ref()
        .ok_or(RuleError::MissingSchemaSection("columnDefinitions"))?;
    let rows = ctx.table.num_rows();

    let mut total_errors = 0;
    let mut details = Vec::new();
    let mut absent = Vec::new();
    for (column, column_type) in definitions {
        let Some(array) = ctx.table.column(column) else {
            absent.push(format!("{}: column not present", column));
            continue;
        };
        let column_type = column_type.ok_or(RuleError::MissingSchemaSection("dataType"))?;
        if column_type.is_numeric() {
            let non_numeric = count_non_numeric(array);
            if non_numeric > 0 {
                total_errors += non_numeric;
                details.push(format!("{}: {} non-numeric values", column, non_numeric));
            }
        } else if column_type == ColumnType::Date {
            let unparsed = count_unparsed_dates(array);
            if unparsed > 0 {
                debug!(column = %column, unparsed, "date values tolerated as null");
            }
        }
    }

    let mut message = if details.is_empty() {
        "All data types valid".to_string()
    } else {
        details.join("; ")
    };
    if !absent.is_empty() {
        message = format!("{} ({})", message, absent.join("; "));
    }

    if total_errors == 0 {
        Ok(CheckOutcome::pass(message, rows))
    } else {
        Ok(CheckOutcome::fail(message, rows, total_errors))
    }
}

/// Share of null cells, in percent. An empty table has 0% nulls.
pub fn null_percentage(array: &ArrayRef) -> f64 {
    if array.is_empty() {
        return 0.0;
    }
    array.null_count() as f64 / array.len() as f64 * 100.0
}

/// VAL-003: no column exceeds its null threshold. Counts columns, not rows.
pub fn null_thresholds(ctx: &ValidationContext) -> Result<CheckOutcome, RuleError> {
    let names = ctx.table.column_names();
    let mut violations = Vec::new();
    for (name, array) in names.iter().zip(ctx.table.columns()) {
        let percentage = null_percentage(array);
        let threshold = ctx.schema.null_threshold(name);
        if percentage > threshold {
            violations.push(format!(
                "{}: {:.1}% nulls (threshold: {}%)",
                name, percentage, threshold
            ));
        }
    }

    let columns = names.len();
    if violations.is_empty() {
        Ok(CheckOutcome::pass("All null thresholds met", columns))
    } else {
        let count = violations.len();
        Ok(CheckOutcome::fail(violations.join("; "), columns, count))
    }
}

/// VAL-004: categorical fields only hold canonical values.
pub fn allowed_values(ctx: &ValidationContext) -> Result<CheckOutcome, RuleError> {
    let Some(allowed) = ctx.allowed_values else {
        return Ok(CheckOutcome::pass("No allowed values file found", 0));
    };
    let rows = ctx.table.num_rows();

    let mut total = 0;
    let mut violations = Vec::new();
    for (field, _) in allowed.fields() {
        let Some(array) = ctx.table.column(field) else {
            continue;
        };
        let strings = arrow::compute::cast(array.as_ref(), &DataType::Utf8)?;
        let strings = strings
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| RuleError::UnexpectedType {
                column: field.clone(),
                found: array.data_type().to_string(),
            })?;
        let invalid = strings
            .iter()
            .flatten()
            .filter(|v| !allowed.is_allowed(field, v))
            .count();
        if invalid > 0 {
            violations.push(format!("{}: {} invalid values", field, invalid));
            total += invalid;
        }
    }

    if violations.is_empty() {
        Ok(CheckOutcome::pass("All categorical values valid", rows))
    } else {
        Ok(CheckOutcome::fail(violations.join("; "), rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schema::{AllowedValues, ValidationSchema},
        table::Table,
    };
    use arrow::array::Float64Array;
    use std::sync::Arc;

    fn schema() -> ValidationSchema {
        ValidationSchema {
            required_columns: Some(vec!["OpportunityID".into(), "Stage".into()]),
            column_definitions: Some(vec![
                ("EstimatedValue".into(), Some(ColumnType::Numeric)),
                ("CreatedDate".into(), Some(ColumnType::Date)),
                ("Region".into(), Some(ColumnType::String)),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_columns_lists_missing() {
        let table = Table::from_strings(vec![("OpportunityID", vec![Some("OPP-1")])]).unwrap();
        let schema = schema();
        let ctx = ValidationContext::new(&table, &schema, None);
        let outcome = required_columns(&ctx).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Missing required columns: Stage");
        assert_eq!((outcome.rows_checked, outcome.rows_passed, outcome.rows_failed), (1, 0, 1));
    }

    #[test]
    fn test_required_columns_without_section_errors() {
        let table = Table::from_strings(vec![("Stage", vec![Some("Lead")])]).unwrap();
        let schema = ValidationSchema::from_json_str("{}", "empty").unwrap();
        let ctx = ValidationContext::new(&table, &schema, None);
        assert!(matches!(
            required_columns(&ctx),
            Err(RuleError::MissingSchemaSection("requiredColumns"))
        ));
    }

    #[test]
    fn test_data_types_counts_non_numeric_text() {
        let table = Table::from_strings(vec![
            ("EstimatedValue", vec![Some("12500.0"), Some("abc"), None, Some("$5")]),
            ("CreatedDate", vec![Some("2024-01-05"), Some("someday"), None, None]),
        ])
        .unwrap();
        let schema = schema();
        let ctx = ValidationContext::new(&table, &schema, None);
        let outcome = data_types(&ctx).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.rows_failed, 2);
        assert_eq!(outcome.rows_passed, 2);
        assert!(outcome.message.starts_with("EstimatedValue: 2 non-numeric values"));
        assert!(outcome.message.contains("Region: column not present"));
    }

    #[test]
    fn test_data_types_missing_declared_type_errors() {
        let table = Table::from_strings(vec![("Owner", vec![Some("ana")])]).unwrap();
        let schema = ValidationSchema {
            column_definitions: Some(vec![
                ("Region".into(), None),
                ("Owner".into(), None),
            ]),
            ..Default::default()
        };
        let ctx = ValidationContext::new(&table, &schema, None);
        assert!(matches!(
            data_types(&ctx),
            Err(RuleError::MissingSchemaSection("dataType"))
        ));

        // an untyped definition for an absent column is only noted
        let only_region = ValidationSchema {
            column_definitions: Some(vec![("Region".into(), None)]),
            ..Default::default()
        };
        let ctx = ValidationContext::new(&table, &only_region, None);
        assert!(data_types(&ctx).unwrap().passed);
    }

    #[test]
    fn test_data_types_accepts_float_column() {
        let table = Table::try_from_columns(
            vec![(
                "EstimatedValue".to_string(),
                Arc::new(Float64Array::from(vec![Some(1.0), None])) as ArrayRef,
            )],
            2,
        )
        .unwrap();
        let schema = schema();
        let ctx = ValidationContext::new(&table, &schema, None);
        assert!(data_types(&ctx).unwrap().passed);
    }

    #[test]
    fn test_null_threshold_is_strict() {
        // 2 of 4 null = 50%: not a violation at the default threshold
        let at = Table::from_strings(vec![("Stage", vec![Some("a"), Some("b"), None, None])])
            .unwrap();
        let schema = schema();
        let ctx = ValidationContext::new(&at, &schema, None);
        assert!(null_thresholds(&ctx).unwrap().passed);

        let above = Table::from_strings(vec![("Stage", vec![Some("a"), None, None, None])])
            .unwrap();
        let ctx = ValidationContext::new(&above, &schema, None);
        let outcome = null_thresholds(&ctx).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Stage: 75.0% nulls (threshold: 50%)");
        assert_eq!((outcome.rows_checked, outcome.rows_failed), (1, 1));
    }

    #[test]
    fn test_null_threshold_empty_table() {
        let table = Table::from_strings(vec![("Stage", vec![])]).unwrap();
        let schema = schema();
        let ctx = ValidationContext::new(&table, &schema, None);
        assert!(null_thresholds(&ctx).unwrap().passed);
    }

    #[test]
    fn test_allowed_values() {
        let table = Table::from_strings(vec![(
            "Stage",
            vec![Some("Lead"), Some("Maybe"), None, Some("Closed-Won")],
        )])
        .unwrap();
        let schema = schema();

        let ctx = ValidationContext::new(&table, &schema, None);
        let outcome = allowed_values(&ctx).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.rows_checked, 0);

        let allowed = AllowedValues::new()
            .with_field("Stage", &["Lead", "Closed-Won"])
            .with_field("Region", &["EMEA"]);
        let ctx = ValidationContext::new(&table, &schema, Some(&allowed));
        let outcome = allowed_values(&ctx).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Stage: 1 invalid values");
        assert_eq!((outcome.rows_checked, outcome.rows_passed, outcome.rows_failed), (4, 3, 1));
    }
}
