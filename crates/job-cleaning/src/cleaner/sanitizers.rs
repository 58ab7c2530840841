//! Raw cell sanitization applied before any other stage.

use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

use crate::utils::is_null_marker;

/// Trims string cells and turns blanks and textual null markers into missing values.
///
/// Non-string columns are left untouched and no row is ever dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSanitizer;

impl RawSanitizer {
    pub fn new() -> Self {
        Self
    }

    pub fn sanitize(&self, df: DataFrame) -> Result<DataFrame> {
        let mut df = df;
        let column_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let mut nulled = 0usize;
        for col_name in &column_names {
            let series = df.column(col_name)?.as_materialized_series();
            if series.dtype() != &DataType::String {
                continue;
            }

            let str_series = series.str()?;
            let mut cleaned_values: Vec<Option<String>> = Vec::with_capacity(str_series.len());
            for opt_val in str_series.into_iter() {
                match opt_val {
                    Some(val) if is_null_marker(val) => {
                        nulled += 1;
                        cleaned_values.push(None);
                    }
                    Some(val) => cleaned_values.push(Some(val.trim().to_string())),
                    None => cleaned_values.push(None),
                }
            }

            let cleaned_series = Series::new(col_name.as_str().into(), cleaned_values);
            df.replace(col_name, cleaned_series)?;
        }

        debug!("Sanitized string cells, {} null markers converted", nulled);
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_trims_and_nulls_markers() {
        let df = df![
            "location" => [Some("  Jakarta "), Some("N/A"), Some(""), None, Some("null")],
            "salary_min" => [Some(1i64), None, Some(3), Some(4), Some(5)],
        ]
        .unwrap();

        let cleaned = RawSanitizer::new().sanitize(df).unwrap();
        let locations: Vec<Option<&str>> = cleaned
            .column("location")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(locations, vec![Some("Jakarta"), None, None, None, None]);
        assert_eq!(cleaned.height(), 5);
        assert_eq!(cleaned.column("salary_min").unwrap().null_count(), 1);
    }
}
