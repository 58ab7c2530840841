//! Report persistence.
//!
//! # Example
//!
//! ```rust,ignore
//! use job_cleaning::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("data/processed");
//! match generator.write_report(&report, "data_quality_report.json") {
//!     Ok(path) => println!("Report written to {}", path.display()),
//!     Err(e) => eprintln!("Report skipped: {}", e),
//! }
//! ```

mod generator;

pub use generator::ReportGenerator;
