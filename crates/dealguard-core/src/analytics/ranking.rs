use std::sync::Arc;

use arrow::{compute::or, error::ArrowError};
use arrow_array::{ArrayRef, Float64Array, StringArray, UInt32Array};
use arrow_ord::{
    cmp::eq,
    sort::{lexsort_to_indices, SortColumn, SortOptions},
};

use crate::{
    analytics::scoring::{AT_RISK, RISK_COLUMN, STALLED},
    table::Table,
};

pub const TOP_N: usize = 10;

fn numeric_sort_column(table: &Table, name: &str, descending: bool) -> Option<SortColumn> {
    let values: Float64Array = table.numeric_values(name)?.into_iter().collect();
    Some(SortColumn {
        values: Arc::new(values) as ArrayRef,
        options: Some(SortOptions {
            descending,
            nulls_first: false,
        }),
    })
}

/// Sort by the given numeric columns, nulls last, and keep the first `limit`
/// rows. Ties keep input order. Absent columns are skipped.
fn top_by(table: &Table, keys: &[(&str, bool)], limit: usize) -> Result<Table, ArrowError> {
    let mut columns: Vec<SortColumn> = keys
        .iter()
        .filter_map(|(name, descending)| numeric_sort_column(table, name, *descending))
        .collect();
    let position: UInt32Array = (0..table.num_rows() as u32).collect();
    columns.push(SortColumn {
        values: Arc::new(position),
        options: None,
    });

    let indices = lexsort_to_indices(&columns, Some(limit))?;
    table.take(&indices)
}

/// Highest `EstimatedValue` first, then highest `Probability`.
pub fn top_opportunities(table: &Table) -> Result<Table, ArrowError> {
    top_by(
        table,
        &[("EstimatedValue", true), ("Probability", true)],
        TOP_N,
    )
}

/// Stalled or at-risk rows, lowest `Probability` first. `table` must carry
/// the score columns.
pub fn top_risks(table: &Table) -> Result<Table, ArrowError> {
    let risk = table.batch().column(table.batch().schema().index_of(RISK_COLUMN)?);
    let mask = or(
        &eq(risk, &StringArray::new_scalar(STALLED))?,
        &eq(risk, &StringArray::new_scalar(AT_RISK))?,
    )?;
    let risky = table.filter(&mask)?;
    top_by(&risky, &[("Probability", false)], TOP_N)
}
