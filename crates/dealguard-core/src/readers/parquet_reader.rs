use std::{fs::File, path::Path, sync::Arc};

use arrow::{
    array::ArrayRef,
    compute::{cast, concat_batches},
    datatypes::DataType,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::{errors::LoadError, readers::ReaderConfig, table::Table};

/// Read a whole Parquet file into one table.
pub fn read_parquet(path: &Path, config: &ReaderConfig) -> Result<Table, LoadError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.with_batch_size(config.batch_size).build()?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;
    let num_rows = batch.num_rows();

    // The rules only understand Utf8 text
    let columns = schema
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(field, array)| {
            let array: ArrayRef = match array.data_type() {
                DataType::LargeUtf8 | DataType::Utf8View => cast(array.as_ref(), &DataType::Utf8)?,
                _ => Arc::clone(array),
            };
            Ok((field.name().clone(), array))
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok(Table::try_from_columns(columns, num_rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    #[test]
    fn test_read_parquet_keeps_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("OpportunityID", DataType::Utf8, true),
            Field::new("EstimatedValue", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("OPP-1"), Some("OPP-2")])),
                Arc::new(Float64Array::from(vec![Some(100.0), None])),
            ],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = read_parquet(&path, &ReaderConfig::default()).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("EstimatedValue").unwrap().data_type(),
            &DataType::Float64
        );
        assert_eq!(table.string_column("OpportunityID").unwrap().value(1), "OPP-2");
    }
}
