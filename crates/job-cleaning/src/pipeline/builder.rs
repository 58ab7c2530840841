//! Main cleaning pipeline module.
//!
//! This module provides the core `CleaningPipeline` struct and builder for
//! orchestrating the cleaning workflow.

use crate::cleaner::{
    CategoryStandardizer, DateNormalizer, DeduplicationEngine, RawSanitizer, SalaryProcessor,
    SkillNormalizer, TechTrendCleaner,
};
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::enrichment::FeatureEnricher;
use crate::error::{CleaningError, Result, ResultExt};
use crate::imputers::MissingValueImputer;
use crate::loader::{load_csv, write_csv};
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::quality::{ProcessingStats, QualityReporter};
use crate::reporting::ReportGenerator;
use crate::types::{CleaningResult, CleaningSummary, OutputPaths};
use chrono::{NaiveDateTime, Utc};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// The job-market cleaning pipeline.
///
/// Use [`CleaningPipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use job_cleaning::{CleaningConfig, CleaningPipeline};
///
/// let config = CleaningConfig::builder()
///     .output_dir("data/processed")
///     .build()?;
///
/// let result = CleaningPipeline::builder()
///     .config(config)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run()?;
///
/// println!("{} clean jobs", result.jobs.height());
/// ```
pub struct CleaningPipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(CleaningPipeline: Send, Sync);

impl CleaningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Read the raw tables, clean them, and write the outputs.
    ///
    /// # Errors
    ///
    /// Returns [`CleaningError::MissingSourceFile`] if either raw table is
    /// absent; nothing is written in that case. A report that cannot be
    /// written only produces a warning.
    pub fn run(&self) -> Result<CleaningResult> {
        self.finish(self.run_internal())
    }

    /// Clean in-memory tables. Nothing is read from or written to disk.
    pub fn process(&self, jobs: DataFrame, tech_trends: DataFrame) -> Result<CleaningResult> {
        self.finish(self.clean(jobs, tech_trends, self.processing_time()))
    }

    fn finish(&self, result: Result<CleaningResult>) -> Result<CleaningResult> {
        match result {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Cleaning finished: {} jobs, {} technology rows",
                    result.jobs.height(),
                    result.tech_trends.height()
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn processing_time(&self) -> NaiveDateTime {
        self.config
            .processing_time
            .unwrap_or_else(|| Utc::now().naive_utc())
    }

    fn run_internal(&self) -> Result<CleaningResult> {
        let now = self.processing_time();

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Loading,
            0.0,
            "Loading raw tables...",
        ));
        let jobs = load_csv(&self.config.raw_jobs_path).context("Loading raw job table")?;
        let tech = load_csv(&self.config.raw_tech_path).context("Loading raw tech-trend table")?;
        self.report_progress(
            ProgressUpdate::new(CleaningStage::Loading, 1.0, "Raw tables loaded")
                .with_rows(jobs.height()),
        );

        let mut result = self.clean(jobs, tech, now)?;

        if self.config.save_to_disk {
            self.save(&mut result)?;
        }
        Ok(result)
    }

    /// Run every stage without touching the filesystem.
    fn clean(&self, jobs: DataFrame, tech: DataFrame, now: NaiveDateTime) -> Result<CleaningResult> {
        let start_time = Instant::now();
        let config = &self.config;

        info!("Starting cleaning pipeline...");
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.0,
            "Starting cleaning pipeline...",
        ));

        let mut summary = CleaningSummary::new();
        summary.job_rows_before = jobs.height();
        summary.tech_rows_before = tech.height();

        let df = self.stage(CleaningStage::Sanitizing, &mut summary, || {
            RawSanitizer::new().sanitize(jobs)
        })?;

        let df = self.stage(CleaningStage::Imputation, &mut summary, || {
            MissingValueImputer::from_config(config).impute(df)
        })?;
        let (df, imputation_steps) = df;
        summary.processing_steps.extend(imputation_steps);

        let salary = self.stage(CleaningStage::SalaryProcessing, &mut summary, || {
            SalaryProcessor::new(config.salary_floor, config.salary_ceiling).process(df)
        })?;
        summary.salary_rows_dropped = salary.dropped;
        if salary.dropped > 0 {
            summary.add_warning(format!(
                "{} records dropped by the salary bounds filter",
                salary.dropped
            ));
        }
        let df = salary.df;

        let df = self.stage(CleaningStage::Standardization, &mut summary, || {
            CategoryStandardizer::new().standardize(df)
        })?;

        let df = self.stage(CleaningStage::SkillNormalization, &mut summary, || {
            SkillNormalizer::new(config.default_skills.clone()).normalize(df)
        })?;

        let df = self.stage(CleaningStage::DateNormalization, &mut summary, || {
            DateNormalizer::new(now).normalize(df)
        })?;

        let df = self.stage(CleaningStage::Enrichment, &mut summary, || {
            FeatureEnricher::new().enrich(df)
        })?;

        let (jobs, dedup) = self.stage(CleaningStage::Deduplication, &mut summary, || {
            DeduplicationEngine::new().deduplicate(df)
        })?;
        summary.exact_duplicates_removed = dedup.exact_removed;
        summary.near_duplicates_removed = dedup.near_removed;

        let (tech_trends, tech_counts) = self.stage(CleaningStage::TechTrends, &mut summary, || {
            TechTrendCleaner::new(config.tech_salary_ceiling_usd, config.usd_to_idr).clean(tech)
        })?;
        summary.tech_rows_dropped =
            tech_counts.duplicates_removed + tech_counts.out_of_bounds_removed;

        summary.job_rows_after = jobs.height();
        summary.tech_rows_after = tech_trends.height();

        let report = if config.generate_report {
            self.report_progress(ProgressUpdate::new(
                CleaningStage::ReportGeneration,
                0.0,
                "Building quality report...",
            ));
            let processing = ProcessingStats {
                exact_duplicates_removed: dedup.exact_removed,
                near_duplicates_removed: dedup.near_removed,
                jobs_rows_before: summary.job_rows_before,
                jobs_rows_after: summary.job_rows_after,
                tech_rows_before: summary.tech_rows_before,
                tech_rows_after: summary.tech_rows_after,
            };
            let report = QualityReporter::new(config.top_locations, config.top_skills)
                .build(&jobs, &tech_trends, processing, now)?;
            self.report_progress(ProgressUpdate::new(
                CleaningStage::ReportGeneration,
                1.0,
                "Quality report built",
            ));
            Some(report)
        } else {
            None
        };

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Cleaning complete: {} -> {} jobs ({:.1}% removed) in {}ms",
            summary.job_rows_before,
            summary.job_rows_after,
            summary.job_rows_removed_percentage(),
            summary.duration_ms
        );

        Ok(CleaningResult {
            jobs,
            tech_trends,
            report,
            summary,
            output_paths: OutputPaths::default(),
        })
    }

    /// Run one stage, reporting progress around it and mapping its error.
    fn stage<T, F>(&self, stage: CleaningStage, summary: &mut CleaningSummary, run: F) -> Result<T>
    where
        F: FnOnce() -> anyhow::Result<T>,
        T: StageRows,
    {
        let name = stage.display_name();
        self.report_progress(ProgressUpdate::new(stage, 0.0, format!("{}...", name)));
        info!("{}...", name);

        let output = run().map_err(|e| into_cleaning_error(stage, e))?;

        let rows = output.rows();
        summary.record_stage(name, rows);
        self.report_progress(
            ProgressUpdate::new(stage, 1.0, format!("{} complete", name)).with_rows(rows),
        );
        Ok(output)
    }

    /// Write the cleaned tables, then the report. A report failure is only a warning.
    fn save(&self, result: &mut CleaningResult) -> Result<()> {
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Saving,
            0.0,
            "Saving cleaned tables...",
        ));

        let jobs_path = self.config.jobs_output_path();
        write_csv(&mut result.jobs, &jobs_path).context("Saving cleaned job table")?;
        result.output_paths.jobs = Some(jobs_path);

        let tech_path = self.config.tech_output_path();
        write_csv(&mut result.tech_trends, &tech_path).context("Saving cleaned tech-trend table")?;
        result.output_paths.tech_trends = Some(tech_path);

        if let Some(report) = &result.report {
            let generator = ReportGenerator::new(&self.config.output_dir);
            match generator.write_report(report, &self.config.report_output_name) {
                Ok(path) => result.output_paths.report = Some(path),
                Err(e) => {
                    warn!("Quality report not written: {}", e);
                    result.summary.add_warning(e.to_string());
                }
            }
        }

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Saving,
            1.0,
            "Results saved",
        ));
        Ok(())
    }
}

/// Row count of a stage's output, for the summary and progress updates.
trait StageRows {
    fn rows(&self) -> usize;
}

impl StageRows for DataFrame {
    fn rows(&self) -> usize {
        self.height()
    }
}

impl<T> StageRows for (DataFrame, T) {
    fn rows(&self) -> usize {
        self.0.height()
    }
}

impl StageRows for crate::cleaner::SalaryOutcome {
    fn rows(&self) -> usize {
        self.df.height()
    }
}

fn into_cleaning_error(stage: CleaningStage, err: anyhow::Error) -> CleaningError {
    match err.downcast::<CleaningError>() {
        Ok(e) => e.with_context(stage.display_name()),
        Err(err) => match err.downcast::<PolarsError>() {
            Ok(e) => CleaningError::Polars(e).with_context(stage.display_name()),
            Err(err) => CleaningError::stage(stage.display_name(), err),
        },
    }
}

/// Builder for [`CleaningPipeline`].
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = CleaningPipeline::builder()
///     .config(CleaningConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
/// ```
#[derive(Default)]
pub struct CleaningPipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(CleaningPipelineBuilder: Send);

impl CleaningPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<CleaningPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(CleaningPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
