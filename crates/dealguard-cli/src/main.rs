mod errors;
mod runner;
mod writer;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format for pipeline results
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Print results to standard output (human-readable)
    Stdout,
    /// Output results in JSON format
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "dealguard",
    version,
    author = "DealGuard Contributors",
    about = "DealGuard CLI - Cleaning and validation for sales opportunity exports",
    long_about = "DealGuard normalises messy CRM opportunity exports (CSV or Parquet), \
                  records every transformation in an audit document, and validates the \
                  result against a JSON schema.\n\n\
                  Example usage:\n  \
                  dealguard run opportunities.csv --schema schema.json --out-dir runs/"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "stdout", global = true)]
    format: OutputFormat,

    /// Enable debug mode with detailed error backtraces and stack traces
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit debug-level pipeline logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the cleaning rules and write the cleaned table and audit record
    Clean {
        /// Input table (.csv or .parquet)
        input: String,
        /// Cleaned CSV path, or a directory for a timestamped name
        #[arg(short, long)]
        output: Option<String>,
        /// Audit JSON path, or a directory for a timestamped name
        #[arg(short, long)]
        audit: Option<String>,
        /// TOML file overriding the cleaning vocabularies
        #[arg(short, long, value_name = "FILE")]
        config: Option<String>,
    },
    /// Validate a table against a schema and write the report
    Validate {
        input: String,
        /// Schema JSON; allowed-values.json is looked up next to it
        #[arg(short, long, value_name = "FILE")]
        schema: String,
        /// Report JSON path, or a directory for a timestamped name
        #[arg(short, long)]
        report: Option<String>,
    },
    /// Clean then validate the cleaned output inside a fresh run directory
    Run {
        input: String,
        #[arg(short, long, value_name = "FILE")]
        schema: String,
        /// Parent of the run_<timestamp> directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<String>,
        #[arg(short, long, value_name = "FILE")]
        config: Option<String>,
    },
    /// Score, rank and summarise a cleaned table
    Analyze {
        input: String,
        #[arg(long, value_name = "DIR")]
        out_dir: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let args = Args::parse();

    // Enable backtraces in debug mode
    if args.debug {
        // SAFETY: set before any other thread is spawned.
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    init_tracing(args.verbose);

    match runner::run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            if std::env::var("RUST_BACKTRACE").is_ok() {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {:#}", err);
                eprintln!("\nHint: Run with --debug flag for detailed stack traces");
            }
            std::process::exit(1);
        }
    }
}
