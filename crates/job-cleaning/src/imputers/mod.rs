//! Imputation module for handling missing values.
//!
//! [`MissingValueImputer`] makes the job table total for its required
//! fields: salary bounds, the imputed categoricals, and `required_skills`.
//! The individual strategies live in [`StatisticalImputer`].

mod statistical;

pub use statistical::StatisticalImputer;

use anyhow::Result;
use polars::prelude::*;
use tracing::{debug, info};

use crate::config::{CategoricalDefaults, CategoricalImputation, CleaningConfig, SalaryImputation};
use crate::types::columns::{
    EXPERIENCE_LEVEL, IMPUTED_CATEGORICALS, REQUIRED_SKILLS, SALARY_MAX, SALARY_MIN,
};
use crate::utils::has_column;

/// Fills missing salaries, categoricals and skills.
#[derive(Debug, Clone)]
pub struct MissingValueImputer {
    salary: SalaryImputation,
    categorical: CategoricalImputation,
    defaults: CategoricalDefaults,
    default_skills: String,
}

impl Default for MissingValueImputer {
    fn default() -> Self {
        Self::from_config(&CleaningConfig::default())
    }
}

impl MissingValueImputer {
    pub fn new(
        salary: SalaryImputation,
        categorical: CategoricalImputation,
        defaults: CategoricalDefaults,
        default_skills: impl Into<String>,
    ) -> Self {
        Self {
            salary,
            categorical,
            defaults,
            default_skills: default_skills.into(),
        }
    }

    pub fn from_config(config: &CleaningConfig) -> Self {
        Self::new(
            config.salary_imputation,
            config.categorical_imputation,
            config.categorical_defaults.clone(),
            config.default_skills.clone(),
        )
    }

    /// Impute every required field. Returns the frame and the steps taken.
    pub fn impute(&self, df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let mut df = df;
        let mut steps = Vec::new();

        for column in [SALARY_MIN, SALARY_MAX] {
            if !has_column(&df, column) {
                debug!("Salary column '{}' absent, nothing to impute", column);
                continue;
            }
            match self.salary {
                SalaryImputation::CohortMedian => {
                    StatisticalImputer::apply_cohort_median(
                        &mut df,
                        column,
                        EXPERIENCE_LEVEL,
                        &mut steps,
                    )?;
                }
                SalaryImputation::GlobalMedian => {
                    StatisticalImputer::apply_global_median(&mut df, column, &mut steps)?;
                }
            }
        }

        for column in IMPUTED_CATEGORICALS {
            let fallback = self.defaults.for_column(column).unwrap_or_default();
            match self.categorical {
                CategoricalImputation::Mode => {
                    StatisticalImputer::apply_mode_imputation(&mut df, column, fallback, &mut steps)?;
                }
                CategoricalImputation::Constant => {
                    StatisticalImputer::apply_constant_imputation(
                        &mut df, column, fallback, &mut steps,
                    )?;
                }
            }
        }

        StatisticalImputer::apply_constant_imputation(
            &mut df,
            REQUIRED_SKILLS,
            &self.default_skills,
            &mut steps,
        )?;

        info!("Imputation finished with {} fill steps", steps.len());
        Ok((df, steps))
    }
}
