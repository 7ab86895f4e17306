use std::{
    fs,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use arrow::csv::WriterBuilder as CsvWriterBuilder;
use serde::Serialize;

use crate::{errors::LoadError, table::Table};

fn ensure_parent(path: &Path) -> Result<(), LoadError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write a table as CSV with a header row. Nulls become empty fields.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let file = File::create(path)?;
    let mut writer = CsvWriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer.write(table.batch())?;
    writer.into_inner().flush()?;
    Ok(())
}

/// Write any serialisable document as pretty-printed JSON.
pub fn write_json<T: Serialize>(document: &T, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(document).map_err(|source| LoadError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json)?;
    Ok(())
}
