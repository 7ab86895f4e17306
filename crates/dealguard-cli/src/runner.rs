use std::path::Path;

use anyhow::{Context, Result};
use dealguard_core::{
    pipeline::{run_analytics, run_cleaning, run_validation, VALIDATION_REPORT_FILE},
    CleaningConfig,
};
use dealguard_reports::{JsonFormatter, Reporter, StdOutFormatter};
use tracing::debug;

use crate::{
    writer::{create_run_dir, resolve_file_path, timestamp},
    Args, Command, OutputFormat,
};

/// Run the selected command. `Ok(false)` means the pipeline completed but
/// validation failed.
pub fn run(args: Args) -> Result<bool> {
    let version = env!("CARGO_PKG_VERSION").to_string();
    let mut reporter: Box<dyn Reporter> = match args.format {
        OutputFormat::Stdout => Box::new(StdOutFormatter::new(version)),
        OutputFormat::Json => Box::new(JsonFormatter::new(version)),
    };
    let ts = timestamp();

    let passed = match args.command {
        Command::Clean {
            input,
            output,
            audit,
            config,
        } => {
            reporter.on_start("clean");
            let output = resolve_file_path(&output, "cleaned", "csv", &ts)?;
            let audit = resolve_file_path(&audit, "audit", "json", &ts)?;
            clean(reporter.as_mut(), &input, &output, &audit, &config)?;
            true
        }
        Command::Validate {
            input,
            schema,
            report,
        } => {
            reporter.on_start("validate");
            let report = resolve_file_path(&report, "validation", "json", &ts)?;
            validate(reporter.as_mut(), &input, &schema, &report)?
        }
        Command::Run {
            input,
            schema,
            out_dir,
            config,
        } => {
            reporter.on_start("run");
            let run_dir = create_run_dir(&out_dir, &ts)?;
            debug!(run_dir = %run_dir.display(), "run directory created");
            let cleaned = run_dir.join("cleaned.csv");
            clean(
                reporter.as_mut(),
                &input,
                &cleaned,
                &run_dir.join("audit.json"),
                &config,
            )?;
            let cleaned = cleaned.display().to_string();
            validate(
                reporter.as_mut(),
                &cleaned,
                &schema,
                &run_dir.join(VALIDATION_REPORT_FILE),
            )?
        }
        Command::Analyze { input, out_dir } => {
            reporter.on_start("analyze");
            let out_dir = out_dir.unwrap_or_else(|| ".".to_string());
            reporter.on_loading(&input);
            let outcome = run_analytics(&input, &out_dir)
                .with_context(|| format!("Failed to analyze '{}'", input))?;
            reporter.on_analytics_result(&outcome);
            reporter.on_artifact("analytics", &out_dir);
            true
        }
    };

    reporter.on_complete(passed);
    Ok(passed)
}

fn clean(
    reporter: &mut dyn Reporter,
    input: &str,
    output: &Path,
    audit: &Path,
    config: &Option<String>,
) -> Result<()> {
    let config = match config {
        Some(path) => CleaningConfig::from_file(path)
            .with_context(|| format!("Failed to load cleaning config: {}", path))?,
        None => CleaningConfig::default(),
    };
    reporter.on_loading(input);
    let outcome = run_cleaning(input, output, audit, &config)
        .with_context(|| format!("Failed to clean '{}'", input))?;
    reporter.on_cleaning_result(&outcome.audit);
    reporter.on_artifact("cleaned", &output.display().to_string());
    reporter.on_artifact("audit", &audit.display().to_string());
    Ok(())
}

fn validate(reporter: &mut dyn Reporter, input: &str, schema: &str, report: &Path) -> Result<bool> {
    reporter.on_loading(input);
    let result = run_validation(input, schema, report)
        .with_context(|| format!("Failed to validate '{}' against '{}'", input, schema))?;
    reporter.on_validation_result(&result);
    reporter.on_artifact("report", &report.display().to_string());
    Ok(result.is_passed())
}
