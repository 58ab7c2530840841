//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use crate::error::CleaningError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Strategy for imputing missing `salary_min` / `salary_max` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SalaryImputation {
    /// Median of the record's `experience_level` cohort, falling back to the
    /// global median when the cohort has no values.
    #[default]
    CohortMedian,
    /// Median of the whole column.
    GlobalMedian,
}

/// Strategy for imputing missing categorical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalImputation {
    /// Use the most frequent value, or the field default when the column is
    /// entirely missing.
    #[default]
    Mode,
    /// Always use the field default.
    Constant,
}

/// Per-field fallback values for categorical imputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalDefaults {
    pub industry: String,
    pub company_size: String,
    pub employment_type: String,
    pub remote_option: String,
}

impl Default for CategoricalDefaults {
    fn default() -> Self {
        Self {
            industry: "Technology".to_string(),
            company_size: "Medium (50-500)".to_string(),
            employment_type: "Full-time".to_string(),
            remote_option: "On-site".to_string(),
        }
    }
}

impl CategoricalDefaults {
    /// Default value for a categorical column, if it is one of the imputed fields.
    pub fn for_column(&self, column: &str) -> Option<&str> {
        match column {
            "industry" => Some(&self.industry),
            "company_size" => Some(&self.company_size),
            "employment_type" => Some(&self.employment_type),
            "remote_option" => Some(&self.remote_option),
            _ => None,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("industry", self.industry.as_str()),
            ("company_size", self.company_size.as_str()),
            ("employment_type", self.employment_type.as_str()),
            ("remote_option", self.remote_option.as_str()),
        ]
        .into_iter()
    }
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use job_cleaning::config::{CleaningConfig, SalaryImputation};
///
/// let config = CleaningConfig::builder()
///     .output_dir("data/processed")
///     .salary_imputation(SalaryImputation::CohortMedian)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Raw job records table.
    /// Default: "data/raw/it_jobs_raw.csv"
    pub raw_jobs_path: PathBuf,

    /// Raw technology-trend table.
    /// Default: "data/raw/tech_trends_raw.csv"
    pub raw_tech_path: PathBuf,

    /// Directory receiving the cleaned tables and the quality report.
    /// Default: "data/processed"
    pub output_dir: PathBuf,

    /// File name of the cleaned job table.
    pub jobs_output_name: String,

    /// File name of the cleaned technology-trend table.
    pub tech_output_name: String,

    /// File name of the quality report.
    pub report_output_name: String,

    /// Records with `salary_min` below this are dropped.
    /// Default: 2,000,000
    pub salary_floor: i64,

    /// Records with `salary_max` above this are dropped.
    /// Default: 50,000,000
    pub salary_ceiling: i64,

    /// Technology-trend rows must have `0 < salary_usd < tech_salary_ceiling_usd`.
    /// Default: 500,000
    pub tech_salary_ceiling_usd: f64,

    /// Conversion rate used for `salary_idr`.
    /// Default: 15,000
    pub usd_to_idr: f64,

    /// Default: CohortMedian
    pub salary_imputation: SalaryImputation,

    /// Default: Mode
    pub categorical_imputation: CategoricalImputation,

    pub categorical_defaults: CategoricalDefaults,

    /// Value used when `required_skills` is missing or empty.
    /// Default: "General Programming"
    pub default_skills: String,

    /// Number of locations listed in the quality report.
    /// Default: 5
    pub top_locations: usize,

    /// Number of skills listed in the quality report.
    /// Default: 10
    pub top_skills: usize,

    /// Fixed "now" for `days_since_posted`. When None the local clock is read
    /// once at the start of the run.
    pub processing_time: Option<NaiveDateTime>,

    /// Whether to build and write the quality report.
    /// Default: true
    pub generate_report: bool,

    /// Whether to write anything to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            raw_jobs_path: PathBuf::from("data/raw/it_jobs_raw.csv"),
            raw_tech_path: PathBuf::from("data/raw/tech_trends_raw.csv"),
            output_dir: PathBuf::from("data/processed"),
            jobs_output_name: "it_jobs_cleaned.csv".to_string(),
            tech_output_name: "tech_trends_cleaned.csv".to_string(),
            report_output_name: "data_quality_report.json".to_string(),
            salary_floor: 2_000_000,
            salary_ceiling: 50_000_000,
            tech_salary_ceiling_usd: 500_000.0,
            usd_to_idr: 15_000.0,
            salary_imputation: SalaryImputation::default(),
            categorical_imputation: CategoricalImputation::default(),
            categorical_defaults: CategoricalDefaults::default(),
            default_skills: "General Programming".to_string(),
            top_locations: 5,
            top_skills: 10,
            processing_time: None,
            generate_report: true,
            save_to_disk: true,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    ///
    /// Malformed JSON is a [`CleaningError::Json`]; a document that parses but
    /// fails [`validate`](Self::validate) is a [`CleaningError::InvalidConfig`].
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: CleaningConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the cleaned job table.
    pub fn jobs_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.jobs_output_name)
    }

    /// Path of the cleaned technology-trend table.
    pub fn tech_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.tech_output_name)
    }

    /// Path of the quality report.
    pub fn report_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_output_name)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.salary_floor < 0 || self.salary_floor >= self.salary_ceiling {
            return Err(ConfigValidationError::InvalidSalaryBounds {
                floor: self.salary_floor,
                ceiling: self.salary_ceiling,
            });
        }

        if !(self.tech_salary_ceiling_usd > 0.0) {
            return Err(ConfigValidationError::NonPositive {
                field: "tech_salary_ceiling_usd".to_string(),
                value: self.tech_salary_ceiling_usd,
            });
        }

        if !(self.usd_to_idr > 0.0) {
            return Err(ConfigValidationError::NonPositive {
                field: "usd_to_idr".to_string(),
                value: self.usd_to_idr,
            });
        }

        if self.top_locations == 0 {
            return Err(ConfigValidationError::ZeroLimit("top_locations".to_string()));
        }

        if self.top_skills == 0 {
            return Err(ConfigValidationError::ZeroLimit("top_skills".to_string()));
        }

        if self.default_skills.trim().is_empty() {
            return Err(ConfigValidationError::EmptyDefault("default_skills".to_string()));
        }

        for (field, value) in self.categorical_defaults.iter() {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyDefault(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid salary bounds: floor {floor} must be non-negative and below ceiling {ceiling}")]
    InvalidSalaryBounds { floor: i64, ceiling: i64 },

    #[error("Invalid value for '{field}': {value} (must be positive)")]
    NonPositive { field: String, value: f64 },

    #[error("Invalid limit for '{0}': must be at least 1")]
    ZeroLimit(String),

    #[error("Default value for '{0}' must not be empty")]
    EmptyDefault(String),
}

impl From<ConfigValidationError> for CleaningError {
    fn from(e: ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(e.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    base: Option<CleaningConfig>,
    raw_jobs_path: Option<PathBuf>,
    raw_tech_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    salary_floor: Option<i64>,
    salary_ceiling: Option<i64>,
    tech_salary_ceiling_usd: Option<f64>,
    usd_to_idr: Option<f64>,
    salary_imputation: Option<SalaryImputation>,
    categorical_imputation: Option<CategoricalImputation>,
    categorical_defaults: Option<CategoricalDefaults>,
    default_skills: Option<String>,
    top_locations: Option<usize>,
    top_skills: Option<usize>,
    processing_time: Option<NaiveDateTime>,
    generate_report: Option<bool>,
    save_to_disk: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Start from an existing configuration (e.g. one loaded from a file)
    /// instead of the defaults.
    pub fn base(mut self, config: CleaningConfig) -> Self {
        self.base = Some(config);
        self
    }

    /// Set the raw job table path.
    pub fn raw_jobs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_jobs_path = Some(path.into());
        self
    }

    /// Set the raw technology-trend table path.
    pub fn raw_tech_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_tech_path = Some(path.into());
        self
    }

    /// Set the output directory for cleaned data and the report.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the salary bounds used by the salary filter.
    ///
    /// # Arguments
    /// * `floor` - minimum accepted `salary_min`
    /// * `ceiling` - maximum accepted `salary_max`
    pub fn salary_bounds(mut self, floor: i64, ceiling: i64) -> Self {
        self.salary_floor = Some(floor);
        self.salary_ceiling = Some(ceiling);
        self
    }

    /// Set the exclusive upper bound on technology-trend `salary_usd`.
    pub fn tech_salary_ceiling_usd(mut self, ceiling: f64) -> Self {
        self.tech_salary_ceiling_usd = Some(ceiling);
        self
    }

    /// Set the USD to IDR conversion rate.
    pub fn usd_to_idr(mut self, rate: f64) -> Self {
        self.usd_to_idr = Some(rate);
        self
    }

    /// Set the salary imputation strategy.
    pub fn salary_imputation(mut self, strategy: SalaryImputation) -> Self {
        self.salary_imputation = Some(strategy);
        self
    }

    /// Set the categorical imputation strategy.
    pub fn categorical_imputation(mut self, strategy: CategoricalImputation) -> Self {
        self.categorical_imputation = Some(strategy);
        self
    }

    /// Replace the categorical fallback values.
    pub fn categorical_defaults(mut self, defaults: CategoricalDefaults) -> Self {
        self.categorical_defaults = Some(defaults);
        self
    }

    /// Set the value used for missing `required_skills`.
    pub fn default_skills(mut self, skills: impl Into<String>) -> Self {
        self.default_skills = Some(skills.into());
        self
    }

    /// Set the report's top-location and top-skill list lengths.
    pub fn report_limits(mut self, top_locations: usize, top_skills: usize) -> Self {
        self.top_locations = Some(top_locations);
        self.top_skills = Some(top_skills);
        self
    }

    /// Pin the processing time used for `days_since_posted`.
    pub fn processing_time(mut self, now: NaiveDateTime) -> Self {
        self.processing_time = Some(now);
        self
    }

    /// Enable or disable quality report generation.
    pub fn generate_report(mut self, generate: bool) -> Self {
        self.generate_report = Some(generate);
        self
    }

    /// Enable or disable saving to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let base = self.base.unwrap_or_default();
        let config = CleaningConfig {
            raw_jobs_path: self.raw_jobs_path.unwrap_or(base.raw_jobs_path),
            raw_tech_path: self.raw_tech_path.unwrap_or(base.raw_tech_path),
            output_dir: self.output_dir.unwrap_or(base.output_dir),
            jobs_output_name: base.jobs_output_name,
            tech_output_name: base.tech_output_name,
            report_output_name: base.report_output_name,
            salary_floor: self.salary_floor.unwrap_or(base.salary_floor),
            salary_ceiling: self.salary_ceiling.unwrap_or(base.salary_ceiling),
            tech_salary_ceiling_usd: self
                .tech_salary_ceiling_usd
                .unwrap_or(base.tech_salary_ceiling_usd),
            usd_to_idr: self.usd_to_idr.unwrap_or(base.usd_to_idr),
            salary_imputation: self.salary_imputation.unwrap_or(base.salary_imputation),
            categorical_imputation: self
                .categorical_imputation
                .unwrap_or(base.categorical_imputation),
            categorical_defaults: self
                .categorical_defaults
                .unwrap_or(base.categorical_defaults),
            default_skills: self.default_skills.unwrap_or(base.default_skills),
            top_locations: self.top_locations.unwrap_or(base.top_locations),
            top_skills: self.top_skills.unwrap_or(base.top_skills),
            processing_time: self.processing_time.or(base.processing_time),
            generate_report: self.generate_report.unwrap_or(base.generate_report),
            save_to_disk: self.save_to_disk.unwrap_or(base.save_to_disk),
        };

        config.validate()?;
        Ok(config)
    }
}
