//! Derived analytics: salary competitiveness, city tier, attractiveness score.

use anyhow::Result;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

use crate::types::CityTier;
use crate::types::columns::{
    ATTRACTIVENESS_SCORE, CITY_TIER, COMPANY_SIZE, EXPERIENCE_LEVEL, LOCATION, REMOTE_OPTION,
    SALARY_AVG, SALARY_COMPETITIVENESS,
};
use crate::utils::{has_column, mean, numeric_values, set_column, string_values};

/// Composite attractiveness score of a posting, clamped to `[0, 100]`.
///
/// - salary: `(competitiveness - 1) * 30`
/// - remote: `+20` for Remote or Hybrid
/// - company size: `+10` Large (500+), `+5` Medium (50-500)
/// - experience: `+40` Mid, `+35` Senior, `+30` otherwise
///
/// A missing competitiveness contributes nothing.
pub fn attractiveness_score(
    competitiveness: Option<f64>,
    remote_option: Option<&str>,
    company_size: Option<&str>,
    experience_level: Option<&str>,
) -> f64 {
    let salary = competitiveness.map_or(0.0, |c| (c - 1.0) * 30.0);
    let remote = match remote_option {
        Some("Remote") | Some("Hybrid") => 20.0,
        _ => 0.0,
    };
    let size = match company_size {
        Some("Large (500+)") => 10.0,
        Some("Medium (50-500)") => 5.0,
        _ => 0.0,
    };
    let experience = match experience_level {
        Some("Mid") => 40.0,
        Some("Senior") => 35.0,
        _ => 30.0,
    };
    (salary + remote + size + experience).clamp(0.0, 100.0)
}

/// Ratio of each salary to the mean salary of its experience-level cohort.
///
/// Missing experience levels form their own cohort. The ratio is missing when
/// the salary is missing or the cohort mean is not positive.
pub fn salary_competitiveness(
    salaries: &[Option<f64>],
    cohorts: &[Option<String>],
) -> Vec<Option<f64>> {
    let mut grouped: HashMap<Option<&str>, Vec<f64>> = HashMap::new();
    for (salary, cohort) in salaries.iter().zip(cohorts.iter()) {
        if let Some(s) = salary {
            grouped.entry(cohort.as_deref()).or_default().push(*s);
        }
    }
    let means: HashMap<Option<&str>, f64> = grouped
        .iter()
        .filter_map(|(cohort, vals)| mean(vals).map(|m| (*cohort, m)))
        .collect();

    salaries
        .iter()
        .zip(cohorts.iter())
        .map(|(salary, cohort)| {
            let salary = (*salary)?;
            let cohort_mean = *means.get(&cohort.as_deref())?;
            (cohort_mean > 0.0).then(|| salary / cohort_mean)
        })
        .collect()
}

/// Adds `salary_competitiveness`, `city_tier` and `attractiveness_score`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEnricher;

impl FeatureEnricher {
    pub fn new() -> Self {
        Self
    }

    pub fn enrich(&self, df: DataFrame) -> Result<DataFrame> {
        let height = df.height();
        let strings = |name: &str| -> Result<Vec<Option<String>>> {
            if has_column(&df, name) {
                Ok(string_values(&df, name)?)
            } else {
                Ok(vec![None; height])
            }
        };

        let experience = strings(EXPERIENCE_LEVEL)?;
        let remote = strings(REMOTE_OPTION)?;
        let size = strings(COMPANY_SIZE)?;
        let location = strings(LOCATION)?;
        let salaries = if has_column(&df, SALARY_AVG) {
            numeric_values(&df, SALARY_AVG)?
        } else {
            debug!("Column '{}' absent, competitiveness will be missing", SALARY_AVG);
            vec![None; height]
        };

        let competitiveness = salary_competitiveness(&salaries, &experience);
        let tiers: Vec<&str> = location
            .iter()
            .map(|l| CityTier::from_location(l.as_deref()).label())
            .collect();
        let scores: Vec<f64> = (0..height)
            .map(|i| {
                attractiveness_score(
                    competitiveness[i],
                    remote[i].as_deref(),
                    size[i].as_deref(),
                    experience[i].as_deref(),
                )
            })
            .collect();

        let mut df = df;
        set_column(
            &mut df,
            Series::new(SALARY_COMPETITIVENESS.into(), competitiveness),
        )?;
        set_column(&mut df, Series::new(CITY_TIER.into(), tiers))?;
        set_column(&mut df, Series::new(ATTRACTIVENESS_SCORE.into(), scores))?;
        Ok(df)
    }
}
