//! Shared utilities for the cleaning stages.
//!
//! Column access helpers, null-marker detection, and the small statistics
//! (median, mode, frequency counts) every stage needs.

use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is a date or datetime type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Name of a dtype as it appears in the quality report's type histogram.
pub fn dtype_name(dtype: &DataType) -> String {
    match dtype {
        DataType::String => "str".to_string(),
        DataType::Int64 => "i64".to_string(),
        DataType::Int32 => "i32".to_string(),
        DataType::Float64 => "f64".to_string(),
        DataType::Boolean => "bool".to_string(),
        DataType::Datetime(_, _) => "datetime".to_string(),
        DataType::Date => "date".to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Null Markers and Parsing
// =============================================================================

/// Textual cells treated as missing values (compared case-insensitively after trimming).
pub const NULL_MARKERS: [&str; 6] = ["", "n/a", "null", "none", "nan", "#n/a"];

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 5] = [',', '$', '_', ' ', '\''];

/// Check if a string cell should be read as a missing value.
///
/// # Example
///
/// ```rust,ignore
/// use job_cleaning::utils::is_null_marker;
///
/// assert!(is_null_marker("  N/A "));
/// assert!(is_null_marker(""));
/// assert!(!is_null_marker("Jakarta"));
/// ```
pub fn is_null_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    NULL_MARKERS.iter().any(|&marker| lower == marker)
}

/// Clean a string for numeric parsing by removing formatting characters.
pub fn clean_numeric_string(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !NUMERIC_FORMAT_CHARS.contains(c))
        .collect()
}

/// Try to parse a string as a numeric value (f64).
///
/// Handles thousands separators and stray whitespace. Null markers and
/// non-finite results parse to None.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    if is_null_marker(s) {
        return None;
    }
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Column Access
// =============================================================================

/// Check whether a column exists in the frame.
#[inline]
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Read a column as optional strings. Non-string columns are cast.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?.as_materialized_series();
    series_strings(series)
}

/// Read a series as optional strings. Non-string series are cast.
pub fn series_strings(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Read a column as optional floats.
///
/// String columns are parsed cell by cell with [`parse_numeric_string`];
/// anything unparseable becomes None. Numeric columns are cast.
pub fn numeric_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df.column(name)?.as_materialized_series();
    if series.dtype() == &DataType::String {
        return Ok(series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_numeric_string))
            .collect());
    }

    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

/// Insert or replace a column, keeping its position when it already exists.
pub fn set_column(df: &mut DataFrame, series: Series) -> PolarsResult<()> {
    df.with_column(series)?;
    Ok(())
}

/// Keep only the rows whose mask entry is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<DataFrame> {
    let mask = BooleanChunked::from_slice("mask".into(), keep);
    df.filter(&mask)
}

// =============================================================================
// Statistics
// =============================================================================

/// Median of a set of values. Returns None for an empty set.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Arithmetic mean. Returns None for an empty set.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Most frequent value; ties go to the lexicographically smallest value.
pub fn string_mode<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for val in values.into_iter().flatten() {
        *counts.entry(val).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (val, count) in counts {
        // BTreeMap iterates in ascending order, so only a strictly larger count wins
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((val, count));
        }
    }
    best.map(|(val, _)| val.to_string())
}

/// Count occurrences, ordered by count descending then value ascending.
pub fn frequency_counts<I, S>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for val in values {
        *counts.entry(val.as_ref().to_string()).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

// =============================================================================
// Text
// =============================================================================

/// Title-case a string: the first letter of each alphabetic run is
/// upper-cased and the rest lower-cased.
///
/// ```rust,ignore
/// assert_eq!(title_case("dKI jAKARTA"), "Dki Jakarta");
/// assert_eq!(title_case("node.js"), "Node.Js");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_marker() {
        assert!(is_null_marker(""));
        assert!(is_null_marker("   "));
        assert!(is_null_marker("N/A"));
        assert!(is_null_marker("null"));
        assert!(is_null_marker("None"));
        assert!(is_null_marker("NaN"));
        assert!(is_null_marker("#N/A"));
        assert!(!is_null_marker("Jakarta"));
        assert!(!is_null_marker("0"));
    }

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string("12000000"), Some(12_000_000.0));
        assert_eq!(parse_numeric_string("12,000,000"), Some(12_000_000.0));
        assert_eq!(parse_numeric_string(" 8000000.0 "), Some(8_000_000.0));
        assert_eq!(parse_numeric_string("n/a"), None);
        assert_eq!(parse_numeric_string("abc"), None);
        assert_eq!(parse_numeric_string(""), None);
    }

    #[test]
    fn test_numeric_values_from_strings() {
        let df = df![
            "salary" => [Some("5000000"), Some("bad"), None, Some("7,500,000")],
        ]
        .unwrap();
        let values = numeric_values(&df, "salary").unwrap();
        assert_eq!(values, vec![Some(5_000_000.0), None, None, Some(7_500_000.0)]);
    }

    #[test]
    fn test_numeric_values_from_ints() {
        let df = df!["salary" => [Some(1i64), None, Some(3)]].unwrap();
        let values = numeric_values(&df, "salary").unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[test]
    fn test_string_mode_tie_breaks_to_smallest() {
        let values = [Some("b"), Some("a"), None, Some("b"), Some("a")];
        assert_eq!(string_mode(values), Some("a".to_string()));

        let values = [Some("Remote"), Some("On-site"), Some("Remote")];
        assert_eq!(string_mode(values), Some("Remote".to_string()));

        let empty: [Option<&str>; 2] = [None, None];
        assert_eq!(string_mode(empty), None);
    }

    #[test]
    fn test_frequency_counts_ordering() {
        let counts = frequency_counts(["Bandung", "Jakarta", "Bandung", "Jakarta", "Aceh"]);
        assert_eq!(
            counts,
            vec![
                ("Bandung".to_string(), 2),
                ("Jakarta".to_string(), 2),
                ("Aceh".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("dki jakarta"), "Dki Jakarta");
        assert_eq!(title_case("SURABAYA"), "Surabaya");
        assert_eq!(title_case("  machine learning "), "  Machine Learning ");
        assert_eq!(title_case("c++"), "C++");
        assert_eq!(title_case("o'neil"), "O'Neil");
    }

    #[test]
    fn test_filter_rows() {
        let df = df!["a" => [1i64, 2, 3]].unwrap();
        let filtered = filter_rows(&df, &[true, false, true]).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn test_dtype_name() {
        assert_eq!(dtype_name(&DataType::String), "str");
        assert_eq!(dtype_name(&DataType::Float64), "f64");
        assert_eq!(
            dtype_name(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            "datetime"
        );
    }
}
