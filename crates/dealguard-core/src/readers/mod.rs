//! Table readers.
//!
//! Every input is loaded fully into memory as a single [`Table`]. CSV files
//! are read as text columns with no type inference; Parquet files keep their
//! stored types, with any string flavour normalised to `Utf8`.

mod config;
pub mod csv_reader;
pub mod parquet_reader;

use std::path::Path;

use tracing::debug;

pub use config::ReaderConfig;

use crate::{errors::LoadError, table::Table};

const BATCH_SIZE: usize = 64 * 1024;

/// File format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(FileFormat::Csv),
            "parquet" => Some(FileFormat::Parquet),
            _ => None,
        }
    }
}

/// Load a table from disk, dispatching on the file extension.
pub fn load_table(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let format =
        FileFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(display.clone()))?;
    if !path.is_file() {
        return Err(LoadError::FileNotFound(display));
    }
    let table = match format {
        FileFormat::Csv => csv_reader::read_csv(path, config)?,
        FileFormat::Parquet => parquet_reader::read_parquet(path, config)?,
    };
    debug!(
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            FileFormat::from_path(Path::new("data/sales.csv")),
            Some(FileFormat::Csv)
        );
        assert_eq!(
            FileFormat::from_path(Path::new("SALES.PARQUET")),
            Some(FileFormat::Parquet)
        );
        assert_eq!(FileFormat::from_path(Path::new("sales.xlsx")), None);
        assert_eq!(FileFormat::from_path(Path::new("sales")), None);
    }

    #[test]
    fn test_unsupported_extension_checked_first() {
        let err = load_table("missing.xlsx", &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_table("definitely/not/here.csv", &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }
}
