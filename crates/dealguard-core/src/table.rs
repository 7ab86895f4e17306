use std::sync::Arc;

use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray, UInt32Array},
    compute,
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
    util::display::array_value_to_string,
};

use crate::utils::numbers::parse_number;

/// Separator used when building whole-row keys; cannot appear in CSV text
/// that survives the trim rule.
const KEY_SEPARATOR: char = '\u{1f}';
const NULL_MARKER: &str = "\u{0}";

/// An in-memory table: one Arrow `RecordBatch` with nullable, named columns.
///
/// Every operation returns a new `Table`; the pipeline never mutates a table
/// another rule may still hold.
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Build a table from named columns. `num_rows` is only used when
    /// `columns` is empty, where Arrow cannot infer it.
    pub fn try_from_columns(
        columns: Vec<(String, ArrayRef)>,
        num_rows: usize,
    ) -> Result<Self, ArrowError> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
            .collect();
        let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(
            arrays.first().map(|a| a.len()).unwrap_or(num_rows),
        ));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(Self { batch })
    }

    /// Convenience constructor for string-only tables.
    pub fn from_strings(columns: Vec<(&str, Vec<Option<&str>>)>) -> Result<Self, ArrowError> {
        let columns = columns
            .into_iter()
            .map(|(name, values)| {
                let array: ArrayRef = Arc::new(StringArray::from(values));
                (name.to_string(), array)
            })
            .collect();
        Self::try_from_columns(columns, 0)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    pub fn columns(&self) -> &[ArrayRef] {
        self.batch.columns()
    }

    /// Returns the column as a `StringArray` when it is stored as text.
    pub fn string_column(&self, name: &str) -> Option<&StringArray> {
        self.column(name)
            .and_then(|array| array.as_any().downcast_ref::<StringArray>())
    }

    /// Replace the column `name` in place, keeping column order.
    pub fn with_column(&self, name: &str, array: ArrayRef) -> Result<Self, ArrowError> {
        let index = self.batch.schema().index_of(name)?;
        let columns = self
            .named_columns()
            .into_iter()
            .enumerate()
            .map(|(i, (n, a))| if i == index { (n, array.clone()) } else { (n, a) })
            .collect();
        Self::try_from_columns(columns, self.num_rows())
    }

    /// Append a new column at the end of the table.
    pub fn append_column(&self, name: &str, array: ArrayRef) -> Result<Self, ArrowError> {
        let mut columns = self.named_columns();
        columns.push((name.to_string(), array));
        Self::try_from_columns(columns, self.num_rows())
    }

    /// Keep the rows where `mask` is true.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self, ArrowError> {
        let kept = mask.true_count();
        let columns = self
            .named_columns()
            .into_iter()
            .map(|(name, array)| Ok((name, compute::filter(array.as_ref(), mask)?)))
            .collect::<Result<Vec<_>, ArrowError>>()?;
        Self::try_from_columns(columns, kept)
    }

    /// Gather rows by index, in the order given.
    pub fn take(&self, indices: &UInt32Array) -> Result<Self, ArrowError> {
        let columns = self
            .named_columns()
            .into_iter()
            .map(|(name, array)| Ok((name, compute::take(array.as_ref(), indices, None)?)))
            .collect::<Result<Vec<_>, ArrowError>>()?;
        Self::try_from_columns(columns, indices.len())
    }

    /// Display value of a cell, `None` when null.
    pub fn cell_key(&self, column_index: usize, row: usize) -> Result<Option<String>, ArrowError> {
        let array = self.batch.column(column_index);
        if array.is_null(row) {
            return Ok(None);
        }
        array_value_to_string(array.as_ref(), row).map(Some)
    }

    /// Key identifying the full content of a row.
    pub fn row_key(&self, row: usize) -> Result<String, ArrowError> {
        let mut key = String::new();
        for column_index in 0..self.num_columns() {
            if column_index > 0 {
                key.push(KEY_SEPARATOR);
            }
            match self.cell_key(column_index, row)? {
                Some(value) => key.push_str(&value),
                None => key.push_str(NULL_MARKER),
            }
        }
        Ok(key)
    }

    /// True when every cell of `row` is null.
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.num_columns() > 0 && self.batch.columns().iter().all(|a| a.is_null(row))
    }

    /// Numeric view of a column: text is parsed, numeric types are cast.
    /// Values that are not numbers come back as `None`.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let array = self.column(name)?;
        match array.data_type() {
            DataType::Utf8 => {
                let strings = array.as_any().downcast_ref::<StringArray>()?;
                Some(strings.iter().map(|v| v.and_then(parse_number)).collect())
            }
            _ => {
                let casted = compute::cast(array.as_ref(), &DataType::Float64).ok()?;
                let floats = casted.as_any().downcast_ref::<Float64Array>()?;
                Some(floats.iter().collect())
            }
        }
    }

    /// Column names paired with their arrays, in table order.
    pub fn named_columns(&self) -> Vec<(String, ArrayRef)> {
        self.column_names()
            .into_iter()
            .zip(self.batch.columns().iter().cloned())
            .collect()
    }
}
