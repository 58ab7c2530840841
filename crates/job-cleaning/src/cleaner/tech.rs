//! Technology-trend table cleaning.

use anyhow::Result;
use polars::prelude::*;
use tracing::{debug, warn};

use super::dedup::drop_exact_duplicates;
use crate::error::CleaningError;
use crate::types::columns::{SALARY_IDR, SALARY_USD, TECHNOLOGY};
use crate::utils::{filter_rows, has_column, numeric_values, set_column, string_values, title_case};

/// Rows removed while cleaning the technology-trend table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TechCleaningCounts {
    pub duplicates_removed: usize,
    pub out_of_bounds_removed: usize,
}

/// Cleans the technology-trend table.
///
/// Order: drop exact duplicates, trim and title-case `technology`, drop rows
/// whose `salary_usd` is missing or outside `(0, ceiling)`, derive `salary_idr`.
#[derive(Debug, Clone, Copy)]
pub struct TechTrendCleaner {
    ceiling_usd: f64,
    usd_to_idr: f64,
}

impl Default for TechTrendCleaner {
    fn default() -> Self {
        Self::new(500_000.0, 15_000.0)
    }
}

impl TechTrendCleaner {
    pub fn new(ceiling_usd: f64, usd_to_idr: f64) -> Self {
        Self {
            ceiling_usd,
            usd_to_idr,
        }
    }

    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, TechCleaningCounts)> {
        if !has_column(&df, SALARY_USD) {
            return Err(CleaningError::ColumnNotFound(SALARY_USD.to_string()).into());
        }

        let before = df.height();
        let mut df = drop_exact_duplicates(&df)?;
        let duplicates_removed = before - df.height();

        if has_column(&df, TECHNOLOGY) {
            let technologies: Vec<Option<String>> = string_values(&df, TECHNOLOGY)?
                .into_iter()
                .map(|v| v.map(|s| title_case(s.trim())))
                .collect();
            set_column(&mut df, Series::new(TECHNOLOGY.into(), technologies))?;
        } else {
            debug!("Column '{}' absent, skipping title-casing", TECHNOLOGY);
        }

        let salaries = numeric_values(&df, SALARY_USD)?;
        let keep: Vec<bool> = salaries
            .iter()
            .map(|v| v.is_some_and(|usd| usd > 0.0 && usd < self.ceiling_usd))
            .collect();
        let idr: Vec<Option<f64>> = salaries
            .iter()
            .map(|v| v.map(|usd| usd * self.usd_to_idr))
            .collect();
        set_column(&mut df, Series::new(SALARY_USD.into(), salaries))?;
        set_column(&mut df, Series::new(SALARY_IDR.into(), idr))?;

        let before = df.height();
        let df = filter_rows(&df, &keep)?;
        let out_of_bounds_removed = before - df.height();
        if out_of_bounds_removed > 0 {
            warn!(
                "Dropped {} technology rows with salary_usd outside (0, {})",
                out_of_bounds_removed, self.ceiling_usd
            );
        }

        Ok((
            df,
            TechCleaningCounts {
                duplicates_removed,
                out_of_bounds_removed,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_and_conversion() {
        let df = df![
            "technology" => ["  machine learning ", "rust", "go"],
            "salary_usd" => [Some(600_000.0), Some(80_000.0), Some(-5.0)],
        ]
        .unwrap();

        let (df, counts) = TechTrendCleaner::default().clean(df).unwrap();
        assert_eq!(counts.out_of_bounds_removed, 2);
        assert_eq!(
            string_values(&df, "technology").unwrap(),
            vec![Some("Rust".to_string())]
        );
        let idr = df.column("salary_idr").unwrap().as_materialized_series();
        assert_eq!(idr.f64().unwrap().get(0), Some(1_200_000_000.0));
    }

    #[test]
    fn test_duplicates_dropped_before_title_case() {
        let df = df![
            "technology" => ["python", "python", "Python"],
            "salary_usd" => [100_000i64, 100_000, 100_000],
        ]
        .unwrap();

        let (df, counts) = TechTrendCleaner::default().clean(df).unwrap();
        // "Python" only equals "python" after title-casing, so it survives the exact pass
        assert_eq!(counts.duplicates_removed, 1);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_missing_salary_dropped() {
        let df = df![
            "technology" => ["Java", "Kotlin"],
            "salary_usd" => [Some("90000"), Some("n/a")],
        ]
        .unwrap();
        let (df, counts) = TechTrendCleaner::default().clean(df).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(counts.out_of_bounds_removed, 1);
    }
}
