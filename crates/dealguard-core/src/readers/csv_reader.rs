use std::{fs::File, path::Path, sync::Arc};

use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder as CsvReaderBuilder},
    datatypes::{DataType, Field, Schema},
};

use crate::{errors::LoadError, readers::ReaderConfig, table::Table};

/// Build an all-`Utf8` schema from the CSV header row.
///
/// Header names are kept verbatim; trimming them is a cleaning rule.
fn csv_generate_schema(path: &Path, config: &ReaderConfig) -> Result<Schema, LoadError> {
    let file = File::open(path)?;
    let (inferred, _) = Format::default()
        .with_header(config.has_header)
        .with_delimiter(config.delimiter)
        .infer_schema(file, Some(0))?;
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    Ok(Schema::new(fields))
}

/// Read a whole CSV file into one table. Empty fields are null, and so are
/// the trailing cells of a row shorter than the header.
pub fn read_csv(path: &Path, config: &ReaderConfig) -> Result<Table, LoadError> {
    let schema = Arc::new(csv_generate_schema(path, config)?);
    if schema.fields().is_empty() {
        return Err(LoadError::EmptyInput(path.display().to_string()));
    }

    let file = File::open(path)?;
    let reader = CsvReaderBuilder::new(schema.clone())
        .with_header(config.has_header)
        .with_delimiter(config.delimiter)
        .with_batch_size(config.batch_size)
        .with_truncated_rows(true)
        .build(file)?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;
    Ok(Table::new(batch))
}
