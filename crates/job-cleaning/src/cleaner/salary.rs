//! Salary range repair, bounds filtering, and salary derivations.

use anyhow::Result;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::CleaningError;
use crate::types::SalaryCategory;
use crate::types::columns::{SALARY_AVG, SALARY_CATEGORY, SALARY_MAX, SALARY_MIN};
use crate::utils::{filter_rows, has_column, numeric_values, set_column};

/// Outcome of the salary stage.
#[derive(Debug)]
pub struct SalaryOutcome {
    pub df: DataFrame,
    /// Ranges that were inverted and got swapped.
    pub swapped: usize,
    /// Records removed by the bounds filter.
    pub dropped: usize,
}

/// Validates and repairs salary ranges, then derives `salary_avg` and `salary_category`.
#[derive(Debug, Clone, Copy)]
pub struct SalaryProcessor {
    floor: i64,
    ceiling: i64,
}

impl Default for SalaryProcessor {
    fn default() -> Self {
        Self::new(2_000_000, 50_000_000)
    }
}

impl SalaryProcessor {
    pub fn new(floor: i64, ceiling: i64) -> Self {
        Self { floor, ceiling }
    }

    /// Run the stage.
    ///
    /// 1. Swap `salary_min` and `salary_max` where the range is inverted
    /// 2. Drop records with `salary_min < floor`, `salary_max > ceiling`, or a missing bound
    /// 3. Derive `salary_avg` and bin `salary_min` into `salary_category`
    pub fn process(&self, df: DataFrame) -> Result<SalaryOutcome> {
        for column in [SALARY_MIN, SALARY_MAX] {
            if !has_column(&df, column) {
                return Err(CleaningError::ColumnNotFound(column.to_string()).into());
            }
        }

        // Salaries are whole currency units; every derived value uses the rounded bounds
        let round = |values: Vec<Option<f64>>| -> Vec<Option<f64>> {
            values.into_iter().map(|v| v.map(f64::round)).collect()
        };
        let mut mins = round(numeric_values(&df, SALARY_MIN)?);
        let mut maxs = round(numeric_values(&df, SALARY_MAX)?);

        let mut swapped = 0usize;
        for (min, max) in mins.iter_mut().zip(maxs.iter_mut()) {
            if let (Some(lo), Some(hi)) = (*min, *max)
                && lo > hi
            {
                *min = Some(hi);
                *max = Some(lo);
                swapped += 1;
            }
        }
        if swapped > 0 {
            debug!("Swapped {} inverted salary ranges", swapped);
        }

        let floor = self.floor as f64;
        let ceiling = self.ceiling as f64;
        let keep: Vec<bool> = mins
            .iter()
            .zip(maxs.iter())
            .map(|(min, max)| match (min, max) {
                (Some(lo), Some(hi)) => *lo >= floor && *hi <= ceiling,
                _ => false,
            })
            .collect();

        let avgs: Vec<Option<f64>> = mins
            .iter()
            .zip(maxs.iter())
            .map(|(min, max)| Some((min.as_ref()? + max.as_ref()?) / 2.0))
            .collect();
        let categories: Vec<Option<&str>> = mins
            .iter()
            .map(|min| min.map(|v| SalaryCategory::from_salary_min(v).label()))
            .collect();

        let to_int = |values: &[Option<f64>]| -> Vec<Option<i64>> {
            values.iter().map(|v| v.map(|x| x as i64)).collect()
        };

        let mut df = df;
        set_column(&mut df, Series::new(SALARY_MIN.into(), to_int(&mins)))?;
        set_column(&mut df, Series::new(SALARY_MAX.into(), to_int(&maxs)))?;
        set_column(&mut df, Series::new(SALARY_AVG.into(), avgs))?;
        set_column(&mut df, Series::new(SALARY_CATEGORY.into(), categories))?;

        let before = df.height();
        let df = filter_rows(&df, &keep)?;
        let dropped = before - df.height();
        if dropped > 0 {
            warn!(
                "Dropped {} records outside salary bounds [{}, {}]",
                dropped, self.floor, self.ceiling
            );
        }

        Ok(SalaryOutcome {
            df,
            swapped,
            dropped,
        })
    }
}
