use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::Value;

use crate::errors::LoadError;

/// Null percentage allowed when the schema declares nothing for a column.
pub const DEFAULT_NULL_THRESHOLD: f64 = 50.0;

/// File name of the allowed-values document, looked up next to the schema.
pub const ALLOWED_VALUES_FILE: &str = "allowed-values.json";

const METADATA_KEYS: &[&str] = &["description", "version", "lastUpdated", "normalizationRules"];

/// Declared type of a column in `columnDefinitions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Float,
    Integer,
    Date,
    String,
    #[serde(other)]
    Other,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric | Self::Float | Self::Integer)
    }
}

/// The validation schema, read from its JSON-Schema-like document.
///
/// `required_columns` and `column_definitions` are `None` when the document
/// lacks the section; the rules depending on them report the gap at run time.
/// A definition without a usable `dataType.enum[0]` maps to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSchema {
    pub required_columns: Option<Vec<String>>,
    pub column_definitions: Option<Vec<(String, Option<ColumnType>)>>,
    pub null_thresholds: BTreeMap<String, f64>,
    pub default_null_threshold: f64,
}

impl Default for ValidationSchema {
    fn default() -> Self {
        Self {
            required_columns: None,
            column_definitions: None,
            null_thresholds: BTreeMap::new(),
            default_null_threshold: DEFAULT_NULL_THRESHOLD,
        }
    }
}

impl ValidationSchema {
    pub fn from_json_str(content: &str, origin: &str) -> Result<Self, LoadError> {
        let document: Value = serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: origin.to_string(),
            source,
        })?;
        Ok(Self::from_document(&document))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    fn from_document(document: &Value) -> Self {
        let required_columns = document
            .pointer("/properties/requiredColumns/default")
            .and_then(Value::as_array)
            .map(|columns| {
                columns
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            });

        let column_definitions = document
            .pointer("/properties/columnDefinitions/properties")
            .and_then(Value::as_object)
            .map(|definitions| {
                definitions
                    .iter()
                    .map(|(name, definition)| {
                        let column_type = definition
                            .pointer("/properties/dataType/enum/0")
                            .cloned()
                            .and_then(|t| serde_json::from_value(t).ok());
                        (name.clone(), column_type)
                    })
                    .collect()
            });

        let mut null_thresholds: BTreeMap<String, f64> = document
            .pointer("/properties/validationRules/properties/nullThresholds/properties")
            .and_then(Value::as_object)
            .map(|thresholds| {
                thresholds
                    .iter()
                    .filter_map(|(name, entry)| {
                        let value = entry.get("default").and_then(Value::as_f64)?;
                        Some((name.clone(), value))
                    })
                    .collect()
            })
            .unwrap_or_default();
        let default_null_threshold = null_thresholds
            .remove("_default")
            .unwrap_or(DEFAULT_NULL_THRESHOLD);

        Self {
            required_columns,
            column_definitions,
            null_thresholds,
            default_null_threshold,
        }
    }

    /// Maximum null percentage allowed for `column`.
    pub fn null_threshold(&self, column: &str) -> f64 {
        self.null_thresholds
            .get(column)
            .copied()
            .unwrap_or(self.default_null_threshold)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllowedField {
    #[serde(default)]
    standard_values: Vec<String>,
}

/// Canonical values per categorical field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowedValues {
    fields: BTreeMap<String, HashSet<String>>,
}

impl AllowedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: &str, values: &[&str]) -> Self {
        if !values.is_empty() {
            self.fields.insert(
                field.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            );
        }
        self
    }

    pub fn from_json_str(content: &str, origin: &str) -> Result<Self, LoadError> {
        let malformed = |source| LoadError::Json {
            path: origin.to_string(),
            source,
        };
        let document: BTreeMap<String, Value> = serde_json::from_str(content).map_err(malformed)?;

        let mut fields = BTreeMap::new();
        for (name, entry) in document {
            if METADATA_KEYS.contains(&name.as_str()) {
                continue;
            }
            let field: AllowedField = serde_json::from_value(entry).map_err(malformed)?;
            if field.standard_values.is_empty() {
                continue;
            }
            fields.insert(name, field.standard_values.into_iter().collect());
        }
        Ok(Self { fields })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Loads `allowed-values.json` from the schema's directory, if it exists.
    pub fn load_beside(schema_path: impl AsRef<Path>) -> Result<Option<Self>, LoadError> {
        let path = Self::path_beside(schema_path.as_ref());
        if !path.is_file() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    pub fn path_beside(schema_path: &Path) -> PathBuf {
        schema_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(ALLOWED_VALUES_FILE)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.fields.iter()
    }

    pub fn is_allowed(&self, field: &str, value: &str) -> bool {
        self.fields
            .get(field)
            .is_none_or(|values| values.contains(value))
    }

}
