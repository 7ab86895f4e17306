use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::errors::CliError;

/// Timestamp used in default artifact and run-directory names.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Resolve an output path. Directories (existing, or ending in a separator)
/// get `<prefix>_<timestamp>.<extension>` appended; anything else is a file
/// path whose parent is created when missing.
pub fn resolve_file_path(
    path: &Option<String>,
    prefix: &str,
    extension: &str,
    timestamp: &str,
) -> Result<PathBuf> {
    let base_path = path.as_deref().unwrap_or(".");
    let path = Path::new(base_path);
    let filename = format!("{}_{}.{}", prefix, timestamp, extension);

    let output_path = if path.exists() {
        if path.is_dir() {
            path.join(&filename)
        } else {
            path.to_path_buf()
        }
    } else if base_path.ends_with('/') || base_path.ends_with('\\') {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        path.join(filename)
    } else {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            }
        }
        path.to_path_buf()
    };
    Ok(output_path)
}

/// Create `<out_dir>/run_<timestamp>`. An existing run directory is an error
/// so that two runs never share output.
pub fn create_run_dir(out_dir: &Option<String>, timestamp: &str) -> Result<PathBuf> {
    let parent = Path::new(out_dir.as_deref().unwrap_or("."));
    if parent.is_file() {
        return Err(CliError::NotADirectory {
            path: parent.display().to_string(),
        }
        .into());
    }
    let run_dir = parent.join(format!("run_{}", timestamp));
    if run_dir.exists() {
        return Err(CliError::RunDirectoryExists {
            path: run_dir.display().to_string(),
        }
        .into());
    }
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create directory: {}", run_dir.display()))?;
    Ok(run_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TS: &str = "20251214-153045";

    #[test]
    fn test_resolve_file_path_no_argument_uses_current_dir() {
        let result = resolve_file_path(&None, "validation", "json", TS).unwrap();
        assert_eq!(result.file_name().unwrap(), "validation_20251214-153045.json");
        assert!(result.starts_with("."));
    }

    #[test]
    fn test_resolve_file_path_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path_str = temp_dir.path().to_str().unwrap().to_string();

        let result = resolve_file_path(&Some(path_str), "cleaned", "csv", TS).unwrap();

        assert_eq!(result.file_name().unwrap(), "cleaned_20251214-153045.csv");
        assert!(result.starts_with(temp_dir.path()));
    }

    #[test]
    fn test_resolve_file_path_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("existing.json");
        fs::write(&file_path, "test").unwrap();

        let path_str = file_path.to_str().unwrap().to_string();
        let result = resolve_file_path(&Some(path_str), "audit", "json", TS).unwrap();

        assert_eq!(result, file_path);
    }

    #[test]
    fn test_resolve_file_path_nonexistent_dir_with_trailing_slash() {
        let temp_dir = TempDir::new().unwrap();
        let new_dir = temp_dir.path().join("new_dir/");
        let path_str = new_dir.to_str().unwrap().to_string();

        let result = resolve_file_path(&Some(path_str), "audit", "json", TS).unwrap();

        assert!(new_dir.is_dir());
        assert_eq!(result.file_name().unwrap(), "audit_20251214-153045.json");
    }

    #[test]
    fn test_resolve_file_path_nonexistent_file_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir/cleaned.csv");
        let path_str = file_path.to_str().unwrap().to_string();

        let result = resolve_file_path(&Some(path_str), "cleaned", "csv", TS).unwrap();

        assert!(file_path.parent().unwrap().exists());
        assert_eq!(result, file_path);
    }

    #[test]
    fn test_create_run_dir_is_unique() {
        let temp_dir = TempDir::new().unwrap();
        let out = Some(temp_dir.path().to_str().unwrap().to_string());

        let run_dir = create_run_dir(&out, TS).unwrap();
        assert!(run_dir.is_dir());
        assert!(run_dir.ends_with("run_20251214-153045"));

        let err = create_run_dir(&out, TS).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_create_run_dir_rejects_file_parent() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("not-a-dir");
        fs::write(&file_path, "x").unwrap();

        let err = create_run_dir(&Some(file_path.to_str().unwrap().to_string()), TS).unwrap_err();
        assert!(err.to_string().contains("is a file"));
    }
}
