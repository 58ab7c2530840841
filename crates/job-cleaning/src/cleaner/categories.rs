//! Canonical values for experience level, company size, and location.

use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

use crate::types::columns::{COMPANY_SIZE, EXPERIENCE_LEVEL, LOCATION};
use crate::utils::{has_column, set_column, string_values, title_case};

static EXPERIENCE_LEVELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("junior", "Junior"),
        ("mid", "Mid"),
        ("senior", "Senior"),
        ("lead", "Senior"),
    ])
});

static COMPANY_SIZES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("startup", "Startup (<50)"),
        ("small", "Startup (<50)"),
        ("medium", "Medium (50-500)"),
        ("large", "Large (500+)"),
        ("enterprise", "Large (500+)"),
    ])
});

/// Substring renames applied after title-casing a location.
const LOCATION_RENAMES: [(&str, &str); 2] = [("Dki Jakarta", "Jakarta"), ("Yogyakarta", "Yogya")];

/// Normalizes categorical strings to canonical values.
///
/// Unmapped values always pass through unchanged, so the mapping is total
/// and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryStandardizer;

impl CategoryStandardizer {
    pub fn new() -> Self {
        Self
    }

    pub fn standardize(&self, df: DataFrame) -> Result<DataFrame> {
        let mut df = df;
        self.map_column(&mut df, EXPERIENCE_LEVEL, |v| {
            Self::standardize_experience(v).to_string()
        })?;
        self.map_column(&mut df, COMPANY_SIZE, |v| {
            Self::standardize_company_size(v).to_string()
        })?;
        self.map_column(&mut df, LOCATION, Self::standardize_location)?;
        Ok(df)
    }

    /// `junior`/`mid`/`senior`/`lead` (any case, trimmed) to Junior/Mid/Senior.
    pub fn standardize_experience(value: &str) -> &str {
        let key = value.trim().to_lowercase();
        EXPERIENCE_LEVELS.get(key.as_str()).copied().unwrap_or(value)
    }

    pub fn standardize_company_size(value: &str) -> &str {
        let key = value.trim().to_lowercase();
        COMPANY_SIZES.get(key.as_str()).copied().unwrap_or(value)
    }

    /// Title-case, then apply the known renames.
    pub fn standardize_location(value: &str) -> String {
        let mut location = title_case(value);
        for (from, to) in LOCATION_RENAMES {
            if location.contains(from) {
                location = location.replace(from, to);
            }
        }
        location
    }

    fn map_column<F>(&self, df: &mut DataFrame, column: &str, map: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        if !has_column(df, column) {
            debug!("Column '{}' absent, skipping standardization", column);
            return Ok(());
        }

        let mapped: Vec<Option<String>> = string_values(df, column)?
            .into_iter()
            .map(|v| v.map(|s| map(&s)))
            .collect();
        set_column(df, Series::new(column.into(), mapped))?;
        Ok(())
    }
}
