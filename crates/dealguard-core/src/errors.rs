use thiserror::Error;

/// Errors raised while loading inputs or writing artifacts.
///
/// These abort a run before (or after) any rule executes.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input file not found: '{0}'")]
    FileNotFound(String),

    #[error("Unsupported file extension for '{0}'. Supported: csv, parquet")]
    UnsupportedFormat(String),

    #[error("Input file '{0}' is empty")]
    EmptyInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow computation error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Malformed JSON document '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed configuration '{path}': {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised inside a single cleaning or validation rule.
///
/// The engines catch these at the rule boundary and record them in the
/// audit record or validation report; they never escape a run.
#[derive(Error, Debug)]
pub enum RuleError {
    /// Column not found in the table
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// The schema document lacks a section the rule depends on
    #[error("Schema is missing the '{0}' section")]
    MissingSchemaSection(&'static str),

    /// The Arrow kernel produced an error (e.g., unsupported cast)
    #[error("Arrow computation error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// A column did not have the physical type the rule expected
    #[error("Column '{column}' has unexpected type {found}")]
    UnexpectedType { column: String, found: String },
}
