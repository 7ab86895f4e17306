use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// Target columns for the cleaning rules. Every field has a default, so a
/// TOML file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Columns title-cased by the casing rule
    pub casing_columns: Vec<String>,
    /// Columns rewritten as `YYYY-MM-DD`
    pub date_columns: Vec<String>,
    /// Text columns coerced to numbers
    pub numeric_columns: Vec<String>,
    /// Column normalised through the stage synonym table
    pub stage_column: String,
    /// Primary identifier used by de-duplication
    pub id_column: String,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            casing_columns: owned(&["Stage", "Status", "Region", "Priority"]),
            date_columns: owned(&["CreatedDate", "LastActivityDate", "ClosedDate"]),
            numeric_columns: owned(&["EstimatedValue", "Probability", "ContactCount"]),
            stage_column: "Stage".to_string(),
            id_column: "OpportunityID".to_string(),
        }
    }
}

impl CleaningConfig {
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, LoadError> {
        toml::from_str(content).map_err(|source| LoadError::Toml {
            path: origin.to_string(),
            source,
        })
    }

    /// Load overrides from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CleaningConfig::default();
        assert_eq!(
            config.casing_columns,
            vec!["Stage", "Status", "Region", "Priority"]
        );
        assert_eq!(config.id_column, "OpportunityID");
    }

    #[test]
    fn test_partial_toml_override() {
        let config = CleaningConfig::from_toml_str(
            r#"
            id_column = "DealID"
            numeric_columns = ["Amount"]
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.id_column, "DealID");
        assert_eq!(config.numeric_columns, vec!["Amount"]);
        assert_eq!(
            config.date_columns,
            vec!["CreatedDate", "LastActivityDate", "ClosedDate"]
        );
    }

    #[test]
    fn test_malformed_toml() {
        let err = CleaningConfig::from_toml_str("id_column = [", "broken.toml").unwrap_err();
        assert!(matches!(err, LoadError::Toml { .. }));
    }
}
