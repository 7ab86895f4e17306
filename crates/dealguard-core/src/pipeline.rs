//! File-level entry points: load, run an engine, write the artifacts.
//!
//! Only load-time failures surface here; rule failures live in the written
//! audit record or report.

use std::{fs, path::Path};

use tracing::info;

use crate::{
    analytics::{analyze, AnalyticsOutcome, SCORING_DEFINITIONS},
    cleaning::{CleaningConfig, CleaningEngine, CleaningOutcome},
    errors::LoadError,
    readers::{load_table, ReaderConfig},
    results::ValidationReport,
    schema::{AllowedValues, ValidationSchema},
    validation::validate,
    writers::{write_csv, write_json},
};

pub const VALIDATION_REPORT_FILE: &str = "report.json";

/// Clean `input`, write the cleaned CSV to `output` and the audit to `audit`.
pub fn run_cleaning(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    audit: impl AsRef<Path>,
    config: &CleaningConfig,
) -> Result<CleaningOutcome, LoadError> {
    let (input, output, audit) = (input.as_ref(), output.as_ref(), audit.as_ref());
    info!(input = %input.display(), "cleaning run started");

    let table = load_table(input, &ReaderConfig::default())?;
    let mut outcome = CleaningEngine::new(config.clone()).clean(&table);
    outcome.audit = outcome
        .audit
        .with_files(input.display().to_string(), output.display().to_string());

    write_csv(&outcome.table, output)?;
    write_json(&outcome.audit, audit)?;
    info!(output = %output.display(), audit = %audit.display(), "cleaning artifacts written");
    Ok(outcome)
}

/// Validate `input` against `schema_path` (and `allowed-values.json` next to
/// it, when present) and write the report to `report`.
pub fn run_validation(
    input: impl AsRef<Path>,
    schema_path: impl AsRef<Path>,
    report: impl AsRef<Path>,
) -> Result<ValidationReport, LoadError> {
    let (input, schema_path, report) = (input.as_ref(), schema_path.as_ref(), report.as_ref());
    info!(input = %input.display(), schema = %schema_path.display(), "validation run started");

    let table = load_table(input, &ReaderConfig::default())?;
    let schema = ValidationSchema::from_file(schema_path)?;
    let allowed = AllowedValues::load_beside(schema_path)?;

    let result = validate(&table, &schema, allowed.as_ref()).with_files(
        input.display().to_string(),
        schema_path.display().to_string(),
    );
    write_json(&result, report)?;
    info!(report = %report.display(), status = ?result.overall_status, "validation report written");
    Ok(result)
}

/// Score and rank `input`, writing every analytics artifact into `out_dir`.
pub fn run_analytics(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> Result<AnalyticsOutcome, LoadError> {
    let (input, out_dir) = (input.as_ref(), out_dir.as_ref());
    fs::create_dir_all(out_dir)?;

    let table = load_table(input, &ReaderConfig::default())?;
    let outcome = analyze(&table)?;

    write_json(&SCORING_DEFINITIONS, out_dir.join("scoring-definitions.json"))?;
    write_json(&outcome.metrics, out_dir.join("success-metrics.json"))?;
    write_csv(&outcome.top_opportunities, out_dir.join("top-opportunities.csv"))?;
    write_csv(&outcome.top_risks, out_dir.join("top-risks.csv"))?;
    write_json(&outcome.quality, out_dir.join("data-quality-summary.json"))?;

    let report = out_dir.join(VALIDATION_REPORT_FILE);
    if report.is_file() {
        fs::copy(&report, out_dir.join("validation-results.json"))?;
    }
    info!(out_dir = %out_dir.display(), "analytics artifacts written");
    Ok(outcome)
}
