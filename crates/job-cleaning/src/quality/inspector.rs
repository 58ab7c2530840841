//! Read-only profile of a raw table, used for dry runs.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::reporter::{FrequencyEntry, dtype_histogram, missing_total, present_strings};
use crate::error::Result;
use crate::types::columns::{COMPANY, LOCATION, SALARY_MAX, SALARY_MIN, TITLE};
use crate::utils::{frequency_counts, has_column, numeric_values};

const TOP_N: usize = 5;

/// Raw salary range as found in the file, before any repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Summary of an unprocessed table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataProfile {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub data_types: BTreeMap<String, usize>,
    pub missing_values: usize,
    pub unique_companies: Option<usize>,
    pub unique_locations: Option<usize>,
    pub salary_range: Option<RawSalaryRange>,
    pub top_companies: Vec<FrequencyEntry>,
    pub top_locations: Vec<FrequencyEntry>,
    pub top_titles: Vec<FrequencyEntry>,
}

/// Profiles raw tables without modifying them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDataInspector;

impl RawDataInspector {
    pub fn new() -> Self {
        Self
    }

    pub fn inspect(&self, df: &DataFrame) -> Result<RawDataProfile> {
        let companies = present_strings(df, COMPANY)?;
        let locations = present_strings(df, LOCATION)?;
        let titles = present_strings(df, TITLE)?;

        Ok(RawDataProfile {
            rows: df.height(),
            columns: df.width(),
            column_names: df
                .get_column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
            data_types: dtype_histogram(df),
            missing_values: missing_total(df),
            unique_companies: has_column(df, COMPANY).then(|| unique_count(&companies)),
            unique_locations: has_column(df, LOCATION).then(|| unique_count(&locations)),
            salary_range: raw_salary_range(df)?,
            top_companies: top(&companies),
            top_locations: top(&locations),
            top_titles: top(&titles),
        })
    }
}

fn unique_count(values: &[String]) -> usize {
    values.iter().map(String::as_str).collect::<HashSet<_>>().len()
}

fn top(values: &[String]) -> Vec<FrequencyEntry> {
    frequency_counts(values)
        .into_iter()
        .take(TOP_N)
        .map(|(value, count)| FrequencyEntry { value, count })
        .collect()
}

fn raw_salary_range(df: &DataFrame) -> Result<Option<RawSalaryRange>> {
    if !has_column(df, SALARY_MIN) || !has_column(df, SALARY_MAX) {
        return Ok(None);
    }
    let min = numeric_values(df, SALARY_MIN)?
        .into_iter()
        .flatten()
        .reduce(f64::min);
    let max = numeric_values(df, SALARY_MAX)?
        .into_iter()
        .flatten()
        .reduce(f64::max);
    Ok(Some(RawSalaryRange { min, max }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_raw_jobs() {
        let df = df![
            "company" => [Some("Acme"), Some("Acme"), Some("Globex"), None],
            "title" => ["Dev", "QA", "Dev", "Dev"],
            "location" => ["jakarta", "Jakarta", "Bandung", "Bandung"],
            "salary_min" => [Some(12_000_000i64), Some(3_000_000), None, Some(1_000_000)],
            "salary_max" => [Some(8_000_000i64), Some(5_000_000), None, Some(2_000_000)],
        ]
        .unwrap();

        let profile = RawDataInspector::new().inspect(&df).unwrap();
        assert_eq!(profile.rows, 4);
        assert_eq!(profile.columns, 5);
        assert_eq!(profile.missing_values, 3);
        assert_eq!(profile.unique_companies, Some(2));
        // raw values are not standardized
        assert_eq!(profile.unique_locations, Some(3));
        assert_eq!(
            profile.salary_range,
            Some(RawSalaryRange {
                min: Some(1_000_000.0),
                max: Some(8_000_000.0)
            })
        );
        assert_eq!(profile.top_titles[0].value, "Dev");
        assert_eq!(profile.top_titles[0].count, 3);
        assert_eq!(profile.top_companies[0].value, "Acme");
    }

    #[test]
    fn test_inspect_table_without_job_columns() {
        let df = df!["technology" => ["Rust"], "salary_usd" => [1.0]].unwrap();
        let profile = RawDataInspector::new().inspect(&df).unwrap();
        assert_eq!(profile.unique_companies, None);
        assert_eq!(profile.salary_range, None);
        assert!(profile.top_titles.is_empty());
    }
}
