//! Statistical imputation methods.
//!
//! Provides cohort median, global median, mode, and constant imputation.

use crate::utils::{has_column, median, numeric_values, set_column, string_mode, string_values};
use anyhow::Result;
use polars::prelude::*;
use std::collections::HashMap;

/// Statistical imputation methods for filling missing values.
///
/// Each method returns the number of cells it filled.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric column with the median of its cohort.
    ///
    /// Rows whose cohort value is missing form their own cohort. A cohort with
    /// no observed values falls back to the global median; when the whole
    /// column is missing nothing is filled.
    pub fn apply_cohort_median(
        df: &mut DataFrame,
        col_name: &str,
        cohort_col: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let values = numeric_values(df, col_name)?;
        let cohorts = if has_column(df, cohort_col) {
            string_values(df, cohort_col)?
        } else {
            vec![None; df.height()]
        };

        let mut observed: HashMap<Option<&str>, Vec<f64>> = HashMap::new();
        for (value, cohort) in values.iter().zip(cohorts.iter()) {
            if let Some(v) = value {
                observed.entry(cohort.as_deref()).or_default().push(*v);
            }
        }
        let medians: HashMap<Option<&str>, f64> = observed
            .iter()
            .filter_map(|(cohort, vals)| median(vals).map(|m| (*cohort, m)))
            .collect();
        let global = Self::parsed_series(col_name, &values).median();

        let mut filled = 0usize;
        let imputed: Vec<Option<f64>> = values
            .iter()
            .zip(cohorts.iter())
            .map(|(value, cohort)| {
                value.or_else(|| {
                    let fill = medians.get(&cohort.as_deref()).copied().or(global)?;
                    filled += 1;
                    Some(fill.round())
                })
            })
            .collect();

        set_column(df, Series::new(col_name.into(), imputed))?;
        if filled > 0 {
            processing_steps.push(format!(
                "Filled {} missing '{}' values with '{}' cohort medians",
                filled, col_name, cohort_col
            ));
        }
        Ok(filled)
    }

    /// Fill a numeric column with its global median.
    pub fn apply_global_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = Self::parsed_series(col_name, &numeric_values(df, col_name)?);
        let Some(global) = series.median() else {
            return Ok(0);
        };
        let fill = global.round();

        let filled = series.null_count();
        let imputed: Vec<Option<f64>> = series.f64()?.into_iter().map(|v| v.or(Some(fill))).collect();
        set_column(df, Series::new(col_name.into(), imputed))?;

        if filled > 0 {
            processing_steps.push(format!(
                "Filled {} missing '{}' values with median: {}",
                filled, col_name, fill
            ));
        }
        Ok(filled)
    }

    /// Fill a string column with its mode, or `fallback` when no value is observed.
    ///
    /// An absent column is created.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        fallback: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let values = Self::string_column(df, col_name)?;
        let mode = string_mode(values.iter().map(|v| v.as_deref()));
        let fill_value = mode.as_deref().unwrap_or(fallback);

        let filled = Self::fill_strings(df, col_name, values, fill_value)?;
        if filled > 0 {
            processing_steps.push(format!(
                "Filled {} missing '{}' values with {}: '{}'",
                filled,
                col_name,
                if mode.is_some() { "mode" } else { "default" },
                fill_value
            ));
        }
        Ok(filled)
    }

    /// Fill a string column with a constant. An absent column is created.
    pub fn apply_constant_imputation(
        df: &mut DataFrame,
        col_name: &str,
        value: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let values = Self::string_column(df, col_name)?;
        let filled = Self::fill_strings(df, col_name, values, value)?;
        if filled > 0 {
            processing_steps.push(format!(
                "Filled {} missing '{}' values with constant value: '{}'",
                filled, col_name, value
            ));
        }
        Ok(filled)
    }

    /// Parsed numeric values as a Float64 series, so polars aggregations apply.
    fn parsed_series(col_name: &str, values: &[Option<f64>]) -> Series {
        Series::new(col_name.into(), values)
    }

    fn string_column(df: &DataFrame, col_name: &str) -> PolarsResult<Vec<Option<String>>> {
        if has_column(df, col_name) {
            string_values(df, col_name)
        } else {
            Ok(vec![None; df.height()])
        }
    }

    /// Replace missing and blank cells with `fill_value`.
    fn fill_strings(
        df: &mut DataFrame,
        col_name: &str,
        values: Vec<Option<String>>,
        fill_value: &str,
    ) -> PolarsResult<usize> {
        let mut filled = 0usize;
        let result: Vec<String> = values
            .into_iter()
            .map(|v| match v {
                Some(s) if !s.trim().is_empty() => s,
                _ => {
                    filled += 1;
                    fill_value.to_string()
                }
            })
            .collect();
        set_column(df, Series::new(col_name.into(), result))?;
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        numeric_values(df, name).unwrap()
    }

    #[test]
    fn test_cohort_median_not_global() {
        let mut df = df![
            "experience_level" => [Some("Junior"), Some("Junior"), Some("Junior"), Some("Senior"), Some("Senior")],
            "salary_min" => [Some(3_000_000.0), Some(5_000_000.0), None, Some(20_000_000.0), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::apply_cohort_median(
            &mut df,
            "salary_min",
            "experience_level",
            &mut steps,
        )
        .unwrap();

        assert_eq!(filled, 2);
        assert_eq!(
            floats(&df, "salary_min"),
            vec![
                Some(3_000_000.0),
                Some(5_000_000.0),
                Some(4_000_000.0),
                Some(20_000_000.0),
                Some(20_000_000.0)
            ]
        );
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_cohort_without_values_uses_global_median() {
        let mut df = df![
            "experience_level" => [Some("Mid"), Some("Mid"), Some("Lead"), None],
            "salary_max" => [Some(6_000_000.0), Some(8_000_000.0), None, None],
        ]
        .unwrap();

        StatisticalImputer::apply_cohort_median(
            &mut df,
            "salary_max",
            "experience_level",
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(
            floats(&df, "salary_max"),
            vec![
                Some(6_000_000.0),
                Some(8_000_000.0),
                Some(7_000_000.0),
                Some(7_000_000.0)
            ]
        );
    }

    #[test]
    fn test_all_missing_column_stays_missing() {
        let mut df = df![
            "experience_level" => ["Mid", "Senior"],
            "salary_min" => [None::<f64>, None],
        ]
        .unwrap();
        let filled = StatisticalImputer::apply_cohort_median(
            &mut df,
            "salary_min",
            "experience_level",
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(filled, 0);
        assert_eq!(floats(&df, "salary_min"), vec![None, None]);
    }

    #[test]
    fn test_global_median() {
        let mut df = df!["salary_min" => [Some(1.0), Some(2.0), Some(10.0), None]].unwrap();
        let filled =
            StatisticalImputer::apply_global_median(&mut df, "salary_min", &mut Vec::new())
                .unwrap();
        assert_eq!(filled, 1);
        assert_eq!(floats(&df, "salary_min")[3], Some(2.0));
    }

    #[test]
    fn test_mode_imputation_and_fallback() {
        let mut df = df![
            "remote_option" => [Some("Remote"), Some("Hybrid"), Some("Remote"), None],
            "industry" => [None::<&str>, None, None, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_mode_imputation(&mut df, "remote_option", "On-site", &mut steps)
            .unwrap();
        StatisticalImputer::apply_mode_imputation(&mut df, "industry", "Technology", &mut steps)
            .unwrap();
        StatisticalImputer::apply_mode_imputation(
            &mut df,
            "employment_type",
            "Full-time",
            &mut steps,
        )
        .unwrap();

        assert_eq!(
            string_values(&df, "remote_option").unwrap()[3],
            Some("Remote".to_string())
        );
        assert!(
            string_values(&df, "industry")
                .unwrap()
                .iter()
                .all(|v| v.as_deref() == Some("Technology"))
        );
        assert_eq!(df.column("employment_type").unwrap().null_count(), 0);
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_constant_imputation() {
        let mut df = df!["company_size" => [Some("Large (500+)"), None]].unwrap();
        let filled = StatisticalImputer::apply_constant_imputation(
            &mut df,
            "company_size",
            "Medium (50-500)",
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(filled, 1);
        assert_eq!(
            string_values(&df, "company_size").unwrap(),
            vec![
                Some("Large (500+)".to_string()),
                Some("Medium (50-500)".to_string())
            ]
        );
    }
}
