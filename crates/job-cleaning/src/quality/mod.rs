//! Dataset quality reporting.
//!
//! [`QualityReporter`] aggregates the cleaned tables into a [`QualityReport`];
//! [`RawDataInspector`] profiles raw tables for dry runs.

mod inspector;
mod reporter;

pub use inspector::{RawDataInspector, RawDataProfile, RawSalaryRange};
pub use reporter::{
    FrequencyEntry, JobDatasetStats, ProcessingStats, QualityReport, QualityReporter,
    SalaryStats, TechDatasetStats,
};
