//! Custom error types for the cleaning pipeline.
//!
//! Stage-internal failures are recovered inside each stage (coerce, drop or
//! default). Only the conditions below ever cross a stage boundary, and of
//! those only [`CleaningError::MissingSourceFile`] aborts a normal run.
//!
//! Errors serialize as `{ code, message }` so callers can hand them to a
//! dashboard or another process as plain JSON.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// A raw input table does not exist on disk.
    #[error("Source file not found: {}", path.display())]
    MissingSourceFile { path: PathBuf },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A stage failed in a way it could not recover from locally.
    #[error("Stage '{stage}' failed: {reason}")]
    StageFailed { stage: String, reason: String },

    /// The quality report could not be serialized or written.
    #[error("Failed to write quality report: {0}")]
    ReportSerializationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Wrap a stage-internal failure.
    pub fn stage(stage: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        CleaningError::StageFailed {
            stage: stage.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSourceFile { .. } => "MISSING_SOURCE_FILE",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::StageFailed { .. } => "STAGE_FAILED",
            Self::ReportSerializationFailed(_) => "REPORT_SERIALIZATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the run must stop.
    ///
    /// A report that cannot be written never aborts the run; everything else
    /// that reaches the caller does.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::ReportSerializationFailed(_) => false,
            Self::WithContext { source, .. } => source.is_fatal(),
            _ => true,
        }
    }

    /// Check if this error means a raw input table was absent.
    pub fn is_missing_source(&self) -> bool {
        match self {
            Self::MissingSourceFile { .. } => true,
            Self::WithContext { source, .. } => source.is_missing_source(),
            _ => false,
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
