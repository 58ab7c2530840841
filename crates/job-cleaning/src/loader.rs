//! CSV input and output for the raw and cleaned tables.

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CleaningError, Result, ResultExt};

/// Load a CSV table with a header row.
///
/// Returns [`CleaningError::MissingSourceFile`] when the file does not exist.
/// Fields may be quoted with `"`; a file that still fails to parse is an error.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(CleaningError::MissingSourceFile {
            path: path.to_path_buf(),
        });
    }

    debug!("Reading {}", path.display());
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .context(format!("Reading {}", path.display()))?;

    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write a table as CSV with a header row, replacing any existing file.
///
/// Parent directories are created as needed.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("Writing {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = load_csv("definitely/not/here.csv").unwrap_err();
        assert!(err.is_missing_source());
    }

    #[test]
    fn test_quoted_fields_keep_embedded_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(
            &path,
            "job_id,required_skills,title\nJ1,\"python, sql\",\"Analyst, Data\"\nJ2,go,Dev\n",
        )
        .unwrap();

        let loaded = load_csv(&path).unwrap();
        assert_eq!(loaded.shape(), (2, 3));
        let skills = loaded
            .column("required_skills")
            .unwrap()
            .as_materialized_series();
        assert_eq!(skills.str().unwrap().get(0), Some("python, sql"));
        let titles = loaded.column("title").unwrap().as_materialized_series();
        assert_eq!(titles.str().unwrap().get(0), Some("Analyst, Data"));
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b\n1,2,3,4\n").unwrap();

        let err = load_csv(&path).unwrap_err();
        assert!(!err.is_missing_source());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let mut df = df![
            "company" => ["Acme, Inc", "Globex"],
            "salary_min" => [3_000_000i64, 4_000_000],
        ]
        .unwrap();
        write_csv(&mut df, &path).unwrap();

        let loaded = load_csv(&path).unwrap();
        assert_eq!(loaded.shape(), (2, 2));
        let company = loaded.column("company").unwrap().as_materialized_series();
        assert_eq!(company.str().unwrap().get(0), Some("Acme, Inc"));
    }
}
