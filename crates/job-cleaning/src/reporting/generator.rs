use crate::error::{CleaningError, Result};
use crate::quality::QualityReport;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Persists quality reports as pretty-printed JSON.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render a report as pretty JSON.
    pub fn to_json(report: &QualityReport) -> Result<String> {
        serde_json::to_string_pretty(report)
            .map_err(|e| CleaningError::ReportSerializationFailed(e.to_string()))
    }

    /// Write the report to `<output_dir>/<file_name>`, replacing any existing file.
    ///
    /// Every failure maps to [`CleaningError::ReportSerializationFailed`] so
    /// callers can treat it as non-fatal.
    pub fn write_report(&self, report: &QualityReport, file_name: &str) -> Result<PathBuf> {
        let json = Self::to_json(report)?;
        let report_path = self.output_dir.join(file_name);

        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.output_dir)?;
            let mut file = File::create(&report_path)?;
            file.write_all(json.as_bytes())
        };
        write().map_err(|e| {
            CleaningError::ReportSerializationFailed(format!("{}: {}", report_path.display(), e))
        })?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
