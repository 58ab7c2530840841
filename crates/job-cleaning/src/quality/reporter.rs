//! Aggregation of the cleaned tables into a [`QualityReport`].

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::columns::{
    EXPERIENCE_LEVEL, LOCATION, REQUIRED_SKILLS, SALARY_AVG, SALARY_MAX, SALARY_MIN, TECHNOLOGY,
};
use crate::utils::{dtype_name, frequency_counts, has_column, numeric_values, string_values};

/// One entry of a frequency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

impl FrequencyEntry {
    fn from_counts(counts: Vec<(String, usize)>, limit: Option<usize>) -> Vec<Self> {
        counts
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(value, count)| Self { value, count })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    /// Smallest `salary_min`.
    pub min: f64,
    /// Largest `salary_max`.
    pub max: f64,
    /// Mean of `salary_avg`.
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDatasetStats {
    pub total_records: usize,
    pub total_columns: usize,
    pub columns: Vec<String>,
    pub missing_values: usize,
    /// Number of columns per dtype.
    pub data_types: BTreeMap<String, usize>,
    pub salary_stats: Option<SalaryStats>,
    pub top_locations: Vec<FrequencyEntry>,
    pub top_skills: Vec<FrequencyEntry>,
    pub experience_distribution: Vec<FrequencyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechDatasetStats {
    pub total_records: usize,
    pub total_columns: usize,
    pub missing_values: usize,
    pub unique_technologies: usize,
}

/// Row movement recorded during the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub exact_duplicates_removed: usize,
    pub near_duplicates_removed: usize,
    pub jobs_rows_before: usize,
    pub jobs_rows_after: usize,
    pub tech_rows_before: usize,
    pub tech_rows_after: usize,
}

/// Snapshot of the cleaned datasets, written once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub generated_at: String,
    pub jobs_dataset: JobDatasetStats,
    pub tech_trends_dataset: TechDatasetStats,
    pub processing: ProcessingStats,
}

/// Pure aggregation over the final cleaned tables.
#[derive(Debug, Clone, Copy)]
pub struct QualityReporter {
    top_locations: usize,
    top_skills: usize,
}

impl Default for QualityReporter {
    fn default() -> Self {
        Self::new(5, 10)
    }
}

impl QualityReporter {
    pub fn new(top_locations: usize, top_skills: usize) -> Self {
        Self {
            top_locations,
            top_skills,
        }
    }

    pub fn build(
        &self,
        jobs: &DataFrame,
        tech: &DataFrame,
        processing: ProcessingStats,
        generated_at: NaiveDateTime,
    ) -> Result<QualityReport> {
        Ok(QualityReport {
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            jobs_dataset: self.job_stats(jobs)?,
            tech_trends_dataset: Self::tech_stats(tech)?,
            processing,
        })
    }

    fn job_stats(&self, df: &DataFrame) -> Result<JobDatasetStats> {
        let locations = present_strings(df, LOCATION)?;
        let experience = present_strings(df, EXPERIENCE_LEVEL)?;
        let skills: Vec<String> = present_strings(df, REQUIRED_SKILLS)?
            .iter()
            .flat_map(|s| s.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(JobDatasetStats {
            total_records: df.height(),
            total_columns: df.width(),
            columns: df
                .get_column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
            missing_values: missing_total(df),
            data_types: dtype_histogram(df),
            salary_stats: salary_stats(df)?,
            top_locations: FrequencyEntry::from_counts(
                frequency_counts(&locations),
                Some(self.top_locations),
            ),
            top_skills: FrequencyEntry::from_counts(
                frequency_counts(&skills),
                Some(self.top_skills),
            ),
            experience_distribution: FrequencyEntry::from_counts(
                frequency_counts(&experience),
                None,
            ),
        })
    }

    fn tech_stats(df: &DataFrame) -> Result<TechDatasetStats> {
        let technologies = present_strings(df, TECHNOLOGY)?;
        let unique: std::collections::HashSet<&str> =
            technologies.iter().map(String::as_str).collect();

        Ok(TechDatasetStats {
            total_records: df.height(),
            total_columns: df.width(),
            missing_values: missing_total(df),
            unique_technologies: unique.len(),
        })
    }
}

/// Non-missing string values of a column; empty when the column is absent.
pub(crate) fn present_strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    if !has_column(df, name) {
        return Ok(Vec::new());
    }
    Ok(string_values(df, name)?.into_iter().flatten().collect())
}

pub(crate) fn missing_total(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

pub(crate) fn dtype_histogram(df: &DataFrame) -> BTreeMap<String, usize> {
    let mut histogram = BTreeMap::new();
    for column in df.get_columns() {
        *histogram.entry(dtype_name(column.dtype())).or_insert(0) += 1;
    }
    histogram
}

fn salary_stats(df: &DataFrame) -> Result<Option<SalaryStats>> {
    if ![SALARY_MIN, SALARY_MAX, SALARY_AVG]
        .iter()
        .all(|c| has_column(df, c))
    {
        return Ok(None);
    }

    let mins: Vec<f64> = numeric_values(df, SALARY_MIN)?.into_iter().flatten().collect();
    let maxs: Vec<f64> = numeric_values(df, SALARY_MAX)?.into_iter().flatten().collect();
    let avgs: Vec<f64> = numeric_values(df, SALARY_AVG)?.into_iter().flatten().collect();
    if mins.is_empty() || maxs.is_empty() || avgs.is_empty() {
        return Ok(None);
    }

    Ok(Some(SalaryStats {
        min: mins.iter().copied().fold(f64::INFINITY, f64::min),
        max: maxs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean: avgs.iter().sum::<f64>() / avgs.len() as f64,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(value: &str, count: usize) -> FrequencyEntry {
        FrequencyEntry {
            value: value.to_string(),
            count,
        }
    }

    fn jobs() -> DataFrame {
        df![
            "location" => ["Jakarta", "Bandung", "Jakarta", "Bandung", "Medan", "Aceh", "Bali", "Solo"],
            "experience_level" => ["Mid", "Mid", "Senior", "Junior", "Mid", "Junior", "Senior", "Mid"],
            "required_skills" => [
                "Python, SQL", "Python", "Go", "Python, Go", "SQL", "Rust", "Java", "Python"
            ],
            "salary_min" => [3_000_000i64, 5_000_000, 8_000_000, 2_500_000, 4_000_000, 3_000_000, 9_000_000, 6_000_000],
            "salary_max" => [6_000_000i64, 7_000_000, 12_000_000, 4_000_000, 6_000_000, 5_000_000, 20_000_000, 8_000_000],
            "salary_avg" => [4.5e6, 6.0e6, 10.0e6, 3.25e6, 5.0e6, 4.0e6, 14.5e6, 7.0e6],
            "industry" => [Some("Tech"), None, Some("Tech"), Some("Tech"), Some("Tech"), Some("Tech"), Some("Tech"), None],
        ]
        .unwrap()
    }

    fn tech() -> DataFrame {
        df![
            "technology" => [Some("Rust"), Some("Go"), Some("Rust"), None],
            "salary_usd" => [1.0, 2.0, 3.0, 4.0],
        ]
        .unwrap()
    }

    fn at() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-05-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_frequency_lists() {
        let report = QualityReporter::default()
            .build(&jobs(), &tech(), ProcessingStats::default(), at())
            .unwrap();
        let stats = &report.jobs_dataset;

        assert_eq!(
            stats.top_locations,
            vec![
                entry("Bandung", 2),
                entry("Jakarta", 2),
                entry("Aceh", 1),
                entry("Bali", 1),
                entry("Medan", 1),
            ]
        );
        assert_eq!(stats.top_skills[0], entry("Python", 4));
        assert_eq!(stats.top_skills[1], entry("Go", 2));
        assert_eq!(stats.top_skills[2], entry("SQL", 2));
        assert_eq!(
            stats.experience_distribution,
            vec![entry("Mid", 4), entry("Junior", 2), entry("Senior", 2)]
        );
    }

    #[test]
    fn test_counts_and_salary_range() {
        let report = QualityReporter::default()
            .build(&jobs(), &tech(), ProcessingStats::default(), at())
            .unwrap();
        let stats = &report.jobs_dataset;

        assert_eq!(stats.total_records, 8);
        assert_eq!(stats.total_columns, 7);
        assert_eq!(stats.missing_values, 2);
        assert_eq!(stats.data_types.get("str"), Some(&4));
        assert_eq!(stats.data_types.get("i64"), Some(&2));
        assert_eq!(stats.data_types.get("f64"), Some(&1));

        let salary = stats.salary_stats.as_ref().unwrap();
        assert_eq!(salary.min, 2_500_000.0);
        assert_eq!(salary.max, 20_000_000.0);
        assert!((salary.mean - 6_781_250.0).abs() < 1e-6);

        assert_eq!(report.tech_trends_dataset.total_records, 4);
        assert_eq!(report.tech_trends_dataset.missing_values, 1);
        assert_eq!(report.tech_trends_dataset.unique_technologies, 2);
        assert_eq!(report.generated_at, "2024-05-01 08:00:00");
    }

    #[test]
    fn test_serializes_to_plain_json() {
        let report = QualityReporter::default()
            .build(&jobs(), &tech(), ProcessingStats::default(), at())
            .unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["jobs_dataset"]["top_locations"][0]["value"], "Bandung");
        assert_eq!(value["jobs_dataset"]["top_locations"][0]["count"], 2);
        assert!(value["jobs_dataset"]["columns"].is_array());
    }

    #[test]
    fn test_empty_tables() {
        let empty = DataFrame::empty();
        let report = QualityReporter::default()
            .build(&empty, &empty, ProcessingStats::default(), at())
            .unwrap();
        assert_eq!(report.jobs_dataset.total_records, 0);
        assert!(report.jobs_dataset.salary_stats.is_none());
        assert!(report.jobs_dataset.top_skills.is_empty());
    }
}
