//! CLI entry point for the job-market cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use job_cleaning::{
    CategoricalImputation, CleaningConfig, CleaningPipeline, CleaningResult, RawDataInspector,
    RawDataProfile, ReportGenerator, SalaryImputation, load_csv,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// CLI-compatible salary imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSalaryImputation {
    /// Median of the same experience level, falling back to the global median
    CohortMedian,
    /// Median of the whole column
    GlobalMedian,
}

impl From<CliSalaryImputation> for SalaryImputation {
    fn from(cli: CliSalaryImputation) -> Self {
        match cli {
            CliSalaryImputation::CohortMedian => SalaryImputation::CohortMedian,
            CliSalaryImputation::GlobalMedian => SalaryImputation::GlobalMedian,
        }
    }
}

/// CLI-compatible categorical imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCategoricalImputation {
    /// Use the most frequent value, or the field default
    Mode,
    /// Always use the field default
    Constant,
}

impl From<CliCategoricalImputation> for CategoricalImputation {
    fn from(cli: CliCategoricalImputation) -> Self {
        match cli {
            CliCategoricalImputation::Mode => CategoricalImputation::Mode,
            CliCategoricalImputation::Constant => CategoricalImputation::Constant,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "IT job-market dataset cleaning pipeline",
    long_about = "Cleans raw job postings and technology-trend data into analysis-ready tables.\n\n\
                  OUTPUTS:\n  \
                  it_jobs_cleaned.csv, tech_trends_cleaned.csv, data_quality_report.json\n\n\
                  EXAMPLES:\n  \
                  # Clean the default raw files into data/processed\n  \
                  job-cleaning\n\n  \
                  # Custom inputs and output directory\n  \
                  job-cleaning --jobs raw/jobs.csv --tech raw/tech.csv -o out/\n\n  \
                  # Preview the raw data without writing anything\n  \
                  job-cleaning --dry-run\n\n  \
                  # Print the quality report as JSON\n  \
                  job-cleaning --json | jq .jobs_dataset.top_locations"
)]
struct Args {
    /// Raw job table [default: data/raw/it_jobs_raw.csv]
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Raw technology-trend table [default: data/raw/tech_trends_raw.csv]
    #[arg(long)]
    tech: Option<PathBuf>,

    /// Output directory for cleaned tables and the report [default: data/processed]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Strategy for imputing missing salaries
    #[arg(long, value_enum)]
    salary_imputation: Option<CliSalaryImputation>,

    /// Strategy for imputing missing categorical values
    #[arg(long, value_enum)]
    categorical_imputation: Option<CliCategoricalImputation>,

    /// Skip building and writing the quality report
    #[arg(long)]
    no_report: bool,

    /// Profile the raw tables without cleaning or writing anything
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all progress logs; only the JSON document is written.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    if args.dry_run {
        return run_dry_run(&args, &config);
    }

    let mut builder = CleaningPipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    info!("{}", "=".repeat(80));
    info!("Starting job-market cleaning pipeline...");
    info!("{}", "=".repeat(80));

    match pipeline.run() {
        Ok(result) => handle_pipeline_output(&result, &args),
        Err(e) => {
            if e.is_missing_source() {
                error!("Raw input missing, nothing was written: {}", e);
            } else {
                error!("Pipeline failed: {}", e);
            }
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Merge the optional config file with the command-line overrides.
fn build_config(args: &Args) -> Result<CleaningConfig> {
    let base = match &args.config {
        Some(path) => CleaningConfig::from_json_file(path)
            .with_context(|| format!("Loading config file {}", path.display()))?,
        None => CleaningConfig::default(),
    };

    let mut builder = CleaningConfig::builder().base(base);
    if let Some(jobs) = &args.jobs {
        builder = builder.raw_jobs_path(jobs);
    }
    if let Some(tech) = &args.tech {
        builder = builder.raw_tech_path(tech);
    }
    if let Some(output) = &args.output {
        builder = builder.output_dir(output);
    }
    if let Some(strategy) = args.salary_imputation {
        builder = builder.salary_imputation(strategy.into());
    }
    if let Some(strategy) = args.categorical_imputation {
        builder = builder.categorical_imputation(strategy.into());
    }
    if args.no_report {
        builder = builder.generate_report(false);
    }

    Ok(builder.build()?)
}

/// Run dry-run mode - profile the raw tables without cleaning them.
///
/// Uses `println!` for user-facing output so it is visible regardless of log level.
fn run_dry_run(args: &Args, config: &CleaningConfig) -> Result<()> {
    let inspector = RawDataInspector::new();
    let jobs = inspector.inspect(&load_csv(&config.raw_jobs_path)?)?;
    let tech = inspector.inspect(&load_csv(&config.raw_tech_path)?)?;

    if args.json {
        let value = serde_json::json!({
            "jobs": jobs,
            "tech_trends": tech,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Raw data preview (nothing will be written)");
    println!("{}", "=".repeat(80));
    print_raw_profile(&config.raw_jobs_path, &jobs);
    print_raw_profile(&config.raw_tech_path, &tech);
    println!("{}", "=".repeat(80));
    Ok(())
}

fn print_raw_profile(path: &Path, profile: &RawDataProfile) {
    println!();
    println!("{}", path.display());
    println!("{}", "-".repeat(40));
    println!("  Shape: {} rows x {} columns", profile.rows, profile.columns);
    println!("  Columns: {}", profile.column_names.join(", "));
    let dtypes: Vec<String> = profile
        .data_types
        .iter()
        .map(|(dtype, count)| format!("{}={}", dtype, count))
        .collect();
    println!("  Types: {}", dtypes.join(", "));
    println!("  Missing values: {}", profile.missing_values);

    if let Some(companies) = profile.unique_companies {
        println!("  Unique companies: {}", companies);
    }
    if let Some(locations) = profile.unique_locations {
        println!("  Unique locations: {}", locations);
    }
    if let Some(range) = &profile.salary_range {
        println!(
            "  Salary range: {} - {}",
            format_amount(range.min),
            format_amount(range.max)
        );
    }

    for (label, entries) in [
        ("Top companies", &profile.top_companies),
        ("Top locations", &profile.top_locations),
        ("Top titles", &profile.top_titles),
    ] {
        if entries.is_empty() {
            continue;
        }
        println!("  {}:", label);
        for entry in entries {
            println!("    {:<30} {}", truncate_str(&entry.value, 29), entry.count);
        }
    }
}

fn format_amount(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.0}", v))
}

/// Truncate a string to a maximum length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Handle pipeline output based on CLI flags.
///
/// - Default: print a human-readable summary to stdout
/// - `--json`: print the quality report (or the run summary when the report is disabled)
fn handle_pipeline_output(result: &CleaningResult, args: &Args) -> Result<()> {
    if args.json {
        let json = match &result.report {
            Some(report) => ReportGenerator::to_json(report)?,
            None => serde_json::to_string_pretty(&result.summary)?,
        };
        println!("{}", json);
        return Ok(());
    }

    print_human_readable_summary(result);
    Ok(())
}

/// Print a human-readable summary of the cleaning run.
fn print_human_readable_summary(result: &CleaningResult) {
    let summary = &result.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Jobs:        {} -> {} rows ({:.1}% removed)",
        summary.job_rows_before,
        summary.job_rows_after,
        summary.job_rows_removed_percentage()
    );
    println!(
        "Tech trends: {} -> {} rows",
        summary.tech_rows_before, summary.tech_rows_after
    );
    println!("Duration:    {}ms", summary.duration_ms);
    println!();

    println!("Rows removed:");
    println!("  Salary bounds:      {}", summary.salary_rows_dropped);
    println!("  Exact duplicates:   {}", summary.exact_duplicates_removed);
    println!("  Near duplicates:    {}", summary.near_duplicates_removed);
    println!("  Tech trends:        {}", summary.tech_rows_dropped);
    println!();

    if let Some(report) = &result.report {
        let jobs = &report.jobs_dataset;
        if let Some(salary) = &jobs.salary_stats {
            println!(
                "Salary: min {:.0}, max {:.0}, mean {:.0}",
                salary.min, salary.max, salary.mean
            );
        }
        if !jobs.top_locations.is_empty() {
            let locations: Vec<String> = jobs
                .top_locations
                .iter()
                .map(|e| format!("{} ({})", e.value, e.count))
                .collect();
            println!("Top locations: {}", locations.join(", "));
        }
        println!(
            "Unique technologies: {}",
            report.tech_trends_dataset.unique_technologies
        );
        println!();
    }

    let paths = &result.output_paths;
    let written: Vec<&PathBuf> = [&paths.jobs, &paths.tech_trends, &paths.report]
        .into_iter()
        .flatten()
        .collect();
    if !written.is_empty() {
        println!("Written:");
        for path in written {
            println!("  {}", path.display());
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
