//! Job-Market Cleaning Library
//!
//! A deterministic cleaning and feature-derivation pipeline for IT job-market
//! datasets, built on Polars.
//!
//! # Overview
//!
//! Raw job postings are turned into an analysis-ready table through a fixed
//! sequence of stages, each a pure function over the whole record set:
//!
//! - **Sanitizing**: trim cells, turn blanks and null markers into missing values
//! - **Imputation**: cohort-median salaries, mode/default categoricals, default skills
//! - **Salary processing**: repair inverted ranges, bounds filter, average and bucket
//! - **Standardization**: canonical experience levels, company sizes and locations
//! - **Skill normalization**: canonical skill names and skill categories
//! - **Date normalization**: parsed dates and `days_since_posted`
//! - **Enrichment**: salary competitiveness, city tier, attractiveness score
//! - **Deduplication**: exact rows, then `(company, title, location)` repeats
//!
//! The technology-trend table is cleaned separately and a [`QualityReport`]
//! summarizes both cleaned tables.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use job_cleaning::{CleaningConfig, CleaningPipeline};
//!
//! let config = CleaningConfig::builder()
//!     .raw_jobs_path("data/raw/it_jobs_raw.csv")
//!     .raw_tech_path("data/raw/tech_trends_raw.csv")
//!     .output_dir("data/processed")
//!     .build()?;
//!
//! let result = CleaningPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("Kept {} of {} jobs", result.summary.job_rows_after, result.summary.job_rows_before);
//! ```
//!
//! # Individual stages
//!
//! Every stage can be used on its own:
//!
//! ```rust,ignore
//! use job_cleaning::cleaner::SkillNormalizer;
//! use job_cleaning::enrichment::attractiveness_score;
//!
//! let skills = SkillNormalizer::default().normalize_skills(Some("javascript, REACT, javascript"));
//! assert_eq!(skills, "JavaScript, React");
//!
//! let score = attractiveness_score(Some(1.0), Some("Remote"), Some("Large (500+)"), Some("Mid"));
//! assert_eq!(score, 70.0);
//! ```

pub mod cleaner;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    CategoryStandardizer, DateNormalizer, DedupCounts, DeduplicationEngine, RawSanitizer,
    SalaryProcessor, SkillNormalizer, TechTrendCleaner,
};
pub use config::{
    CategoricalDefaults, CategoricalImputation, CleaningConfig, CleaningConfigBuilder,
    ConfigValidationError, SalaryImputation,
};
pub use enrichment::{FeatureEnricher, attractiveness_score};
pub use error::{CleaningError, ResultExt};
pub use imputers::{MissingValueImputer, StatisticalImputer};
pub use loader::{load_csv, write_csv};
pub use pipeline::{
    CleaningPipeline, CleaningPipelineBuilder, CleaningStage, ClosureProgressReporter,
    ProgressReporter, ProgressUpdate,
};
pub use quality::{QualityReport, QualityReporter, RawDataInspector, RawDataProfile};
pub use reporting::ReportGenerator;
pub use types::{CityTier, CleaningResult, CleaningSummary, OutputPaths, SalaryCategory};
