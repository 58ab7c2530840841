//! Progress reporting for the cleaning pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use job_cleaning::CleaningPipeline;
//!
//! let result = CleaningPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Pipeline is starting
    Initializing,
    /// Reading the raw tables
    Loading,
    /// Trimming cells and converting null markers
    Sanitizing,
    /// Filling missing values
    Imputation,
    /// Repairing and filtering salary ranges
    SalaryProcessing,
    /// Standardizing experience, company size and location
    Standardization,
    /// Canonicalizing skills
    SkillNormalization,
    /// Parsing dates
    DateNormalization,
    /// Deriving scores
    Enrichment,
    /// Removing duplicates
    Deduplication,
    /// Cleaning the technology-trend table
    TechTrends,
    /// Building the quality report
    ReportGeneration,
    /// Writing output files
    Saving,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Loading => "Loading Data",
            Self::Sanitizing => "Sanitizing Cells",
            Self::Imputation => "Imputing Values",
            Self::SalaryProcessing => "Processing Salaries",
            Self::Standardization => "Standardizing Categories",
            Self::SkillNormalization => "Normalizing Skills",
            Self::DateNormalization => "Normalizing Dates",
            Self::Enrichment => "Deriving Features",
            Self::Deduplication => "Removing Duplicates",
            Self::TechTrends => "Cleaning Tech Trends",
            Self::ReportGeneration => "Generating Report",
            Self::Saving => "Saving Results",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the weight of this stage in the overall pipeline (0.0 - 1.0).
    ///
    /// Weights of the processing stages sum to 1.0; terminal states weigh nothing.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::Loading => 0.08,
            Self::Sanitizing => 0.05,
            Self::Imputation => 0.15,
            Self::SalaryProcessing => 0.10,
            Self::Standardization => 0.08,
            Self::SkillNormalization => 0.08,
            Self::DateNormalization => 0.06,
            Self::Enrichment => 0.10,
            Self::Deduplication => 0.08,
            Self::TechTrends => 0.08,
            Self::ReportGeneration => 0.06,
            Self::Saving => 0.06,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::Loading => 0.02,
            Self::Sanitizing => 0.10,
            Self::Imputation => 0.15,
            Self::SalaryProcessing => 0.30,
            Self::Standardization => 0.40,
            Self::SkillNormalization => 0.48,
            Self::DateNormalization => 0.56,
            Self::Enrichment => 0.62,
            Self::Deduplication => 0.72,
            Self::TechTrends => 0.80,
            Self::ReportGeneration => 0.88,
            Self::Saving => 0.94,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A progress update emitted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: CleaningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,

    /// Rows in the working table after the stage, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage.
    pub fn new(stage: CleaningStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            rows: None,
        }
    }

    /// Attach the current row count.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
            rows: None,
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
            rows: None,
        }
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implementations must be `Send + Sync` so a pipeline can run on a worker
/// thread while the reporter forwards updates elsewhere.
///
/// # Example
///
/// ```rust,ignore
/// use job_cleaning::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("{}: {}", update.stage.display_name(), update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called once at the start and once at the end of every stage.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PROCESSING_STAGES: [CleaningStage; 13] = [
        CleaningStage::Initializing,
        CleaningStage::Loading,
        CleaningStage::Sanitizing,
        CleaningStage::Imputation,
        CleaningStage::SalaryProcessing,
        CleaningStage::Standardization,
        CleaningStage::SkillNormalization,
        CleaningStage::DateNormalization,
        CleaningStage::Enrichment,
        CleaningStage::Deduplication,
        CleaningStage::TechTrends,
        CleaningStage::ReportGeneration,
        CleaningStage::Saving,
    ];

    #[test]
    fn test_stage_weights_sum() {
        let total_weight: f32 = PROCESSING_STAGES.iter().map(|s| s.weight()).sum();
        assert!((total_weight - 1.0).abs() < 0.001, "Weights should sum to 1.0");
    }

    #[test]
    fn test_base_progress_is_cumulative() {
        for pair in PROCESSING_STAGES.windows(2) {
            let expected = pair[0].base_progress() + pair[0].weight();
            assert!(
                (pair[1].base_progress() - expected).abs() < 0.001,
                "{:?} should start where {:?} ends",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(CleaningStage::Imputation, 0.5, "Imputing...");
        assert_eq!(update.stage, CleaningStage::Imputation);
        assert!((update.progress - 0.225).abs() < 0.001);
        assert_eq!(update.stage_progress, 0.5);
        assert_eq!(update.message, "Imputing...");
        assert_eq!(update.with_rows(12).rows, Some(12));
    }

    #[test]
    fn test_progress_update_complete() {
        let update = ProgressUpdate::complete("Done!");
        assert_eq!(update.stage, CleaningStage::Complete);
        assert_eq!(update.progress, 1.0);
    }

    #[test]
    fn test_closure_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::new(CleaningStage::Loading, 0.5, "Loading"));
        });
        handle.join().expect("Thread should not panic");
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_json_values() {
        let stage_expectations = [
            (CleaningStage::SalaryProcessing, "\"salary_processing\""),
            (CleaningStage::TechTrends, "\"tech_trends\""),
            (CleaningStage::ReportGeneration, "\"report_generation\""),
            (CleaningStage::Failed, "\"failed\""),
        ];

        for (stage, expected_json) in stage_expectations {
            let json = serde_json::to_string(&stage).expect("Should serialize");
            assert_eq!(json, expected_json);
        }

        let update = ProgressUpdate::new(CleaningStage::Loading, 0.0, "x");
        let json = serde_json::to_string(&update).unwrap();
        assert!(!json.contains("rows"), "absent row count is skipped");
    }
}
