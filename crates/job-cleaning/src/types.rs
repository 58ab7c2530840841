use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::quality::QualityReport;

/// Column names of the job and technology-trend tables.
pub mod columns {
    pub const JOB_ID: &str = "job_id";
    pub const TITLE: &str = "title";
    pub const COMPANY: &str = "company";
    pub const LOCATION: &str = "location";
    pub const INDUSTRY: &str = "industry";
    pub const SALARY_MIN: &str = "salary_min";
    pub const SALARY_MAX: &str = "salary_max";
    pub const SALARY_AVG: &str = "salary_avg";
    pub const SALARY_CATEGORY: &str = "salary_category";
    pub const EXPERIENCE_LEVEL: &str = "experience_level";
    pub const COMPANY_SIZE: &str = "company_size";
    pub const EMPLOYMENT_TYPE: &str = "employment_type";
    pub const REMOTE_OPTION: &str = "remote_option";
    pub const REQUIRED_SKILLS: &str = "required_skills";
    pub const SKILL_CATEGORY: &str = "skill_category";
    pub const POSTED_DATE: &str = "posted_date";
    pub const APPLICATION_DEADLINE: &str = "application_deadline";
    pub const DATA_COLLECTION_DATE: &str = "data_collection_date";
    pub const DAYS_SINCE_POSTED: &str = "days_since_posted";
    pub const SALARY_COMPETITIVENESS: &str = "salary_competitiveness";
    pub const CITY_TIER: &str = "city_tier";
    pub const ATTRACTIVENESS_SCORE: &str = "attractiveness_score";

    pub const TECHNOLOGY: &str = "technology";
    pub const SALARY_USD: &str = "salary_usd";
    pub const SALARY_IDR: &str = "salary_idr";

    /// Categorical columns filled by the imputer.
    pub const IMPUTED_CATEGORICALS: [&str; 4] =
        [INDUSTRY, COMPANY_SIZE, EMPLOYMENT_TYPE, REMOTE_OPTION];

    /// Temporal columns parsed by the date normalizer.
    pub const DATE_COLUMNS: [&str; 3] = [POSTED_DATE, APPLICATION_DEADLINE, DATA_COLLECTION_DATE];

    /// Key used by the near-duplicate pass.
    pub const DEDUP_KEY: [&str; 3] = [COMPANY, TITLE, LOCATION];
}

/// Salary bucket derived from `salary_min`.
///
/// Bins are right-open: `[0, 5M)`, `[5M, 10M)`, `[10M, 15M)`, `[15M, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalaryCategory {
    Entry,
    Mid,
    Senior,
    Expert,
}

impl SalaryCategory {
    pub fn from_salary_min(salary_min: f64) -> Self {
        if salary_min < 5_000_000.0 {
            Self::Entry
        } else if salary_min < 10_000_000.0 {
            Self::Mid
        } else if salary_min < 15_000_000.0 {
            Self::Senior
        } else {
            Self::Expert
        }
    }

    /// Label written to the cleaned table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Entry => "Entry (2-5M)",
            Self::Mid => "Mid (5-10M)",
            Self::Senior => "Senior (10-15M)",
            Self::Expert => "Expert (15M+)",
        }
    }
}

impl fmt::Display for SalaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Market tier of a (standardized) location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CityTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CityTier {
    pub fn from_location(location: Option<&str>) -> Self {
        match location {
            Some("Jakarta") | Some("Remote") => Self::Tier1,
            Some("Bandung") | Some("Surabaya") | Some("Yogya") => Self::Tier2,
            _ => Self::Tier3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1",
            Self::Tier2 => "Tier 2",
            Self::Tier3 => "Tier 3",
        }
    }
}

impl fmt::Display for CityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Cleaning Summary Types
// ============================================================================

/// Summary of one cleaning run, returned alongside the cleaned tables.
///
/// # Example
///
/// ```rust,ignore
/// let result = pipeline.run()?;
/// let summary = &result.summary;
/// println!("Kept {} of {} jobs in {}ms",
///     summary.job_rows_after, summary.job_rows_before, summary.duration_ms);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Job rows read from the raw table.
    pub job_rows_before: usize,
    /// Job rows in the cleaned table.
    pub job_rows_after: usize,
    /// Technology-trend rows read from the raw table.
    pub tech_rows_before: usize,
    /// Technology-trend rows in the cleaned table.
    pub tech_rows_after: usize,

    /// Rows dropped by the salary bounds filter.
    pub salary_rows_dropped: usize,
    /// Rows removed by the exact-duplicate pass.
    pub exact_duplicates_removed: usize,
    /// Rows removed by the `(company, title, location)` pass.
    pub near_duplicates_removed: usize,
    /// Technology-trend rows removed (duplicates and salary bounds).
    pub tech_rows_dropped: usize,

    /// Row count after each stage, in execution order.
    pub stage_rows: Vec<StageRows>,

    /// Human-readable processing steps.
    pub processing_steps: Vec<String>,

    /// Warnings and notes generated during cleaning.
    pub warnings: Vec<String>,
}

/// Row count observed after a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRows {
    pub stage: String,
    pub rows: usize,
}

impl CleaningSummary {
    /// Create a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the row count after a stage and the matching processing step.
    pub fn record_stage(&mut self, stage: impl Into<String>, rows: usize) {
        let stage = stage.into();
        self.processing_steps.push(format!("{} ({} rows)", stage, rows));
        self.stage_rows.push(StageRows { stage, rows });
    }

    /// Add a warning to the summary.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Total job rows removed.
    pub fn job_rows_removed(&self) -> usize {
        self.job_rows_before.saturating_sub(self.job_rows_after)
    }

    /// Percentage of job rows removed.
    pub fn job_rows_removed_percentage(&self) -> f64 {
        if self.job_rows_before == 0 {
            0.0
        } else {
            (self.job_rows_removed() as f64 / self.job_rows_before as f64) * 100.0
        }
    }
}

/// Everything a cleaning run produced.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    /// Cleaned, enriched, de-duplicated job table.
    pub jobs: DataFrame,
    /// Cleaned technology-trend table.
    pub tech_trends: DataFrame,
    /// Quality report, unless report generation was disabled.
    pub report: Option<QualityReport>,
    pub summary: CleaningSummary,
    /// Written files. Empty when nothing was saved.
    pub output_paths: OutputPaths,
}

/// Paths of the files written by a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputPaths {
    pub jobs: Option<PathBuf>,
    pub tech_trends: Option<PathBuf>,
    pub report: Option<PathBuf>,
}
