//! Temporal column coercion and `days_since_posted`.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

use crate::types::columns::{DATE_COLUMNS, DAYS_SINCE_POSTED, POSTED_DATE};
use crate::utils::{has_column, is_temporal_dtype, set_column};

const MILLIS_PER_DAY: i64 = 86_400_000;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a date or datetime string. Unparseable values yield None.
///
/// RFC 3339 values with an offset are converted to UTC; the default
/// processing time is UTC as well.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Coerces the date columns to millisecond datetimes and derives `days_since_posted`.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    now: NaiveDateTime,
}

impl DateNormalizer {
    /// Build a normalizer measuring ages against `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn normalize(&self, df: DataFrame) -> Result<DataFrame> {
        let mut df = df;
        let mut posted: Option<Vec<Option<i64>>> = None;

        for column in DATE_COLUMNS {
            if !has_column(&df, column) {
                debug!("Date column '{}' absent, skipping", column);
                continue;
            }

            let millis = Self::column_millis(&df, column)?;
            let invalid = millis
                .iter()
                .filter(|v| v.is_none())
                .count()
                .saturating_sub(df.column(column)?.null_count());
            if invalid > 0 {
                debug!("Coerced {} unparseable values in '{}' to missing", invalid, column);
            }

            let series = Series::new(column.into(), millis.clone())
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
            set_column(&mut df, series)?;

            if column == POSTED_DATE {
                posted = Some(millis);
            }
        }

        if let Some(posted) = posted {
            let now_ms = self.now.and_utc().timestamp_millis();
            let days: Vec<Option<i64>> = posted
                .iter()
                .map(|v| v.map(|ms| (now_ms - ms).div_euclid(MILLIS_PER_DAY)))
                .collect();
            set_column(&mut df, Series::new(DAYS_SINCE_POSTED.into(), days))?;
        }

        Ok(df)
    }

    fn column_millis(df: &DataFrame, column: &str) -> Result<Vec<Option<i64>>> {
        let series = df.column(column)?.as_materialized_series();

        if is_temporal_dtype(series.dtype()) {
            let casted = series
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .cast(&DataType::Int64)?;
            return Ok(casted.i64()?.into_iter().collect());
        }

        let strings = series.cast(&DataType::String)?;
        Ok(strings
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_datetime))
            .map(|v| v.map(|dt| dt.and_utc().timestamp_millis()))
            .collect())
    }
}
