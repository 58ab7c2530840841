//! Cleaning stages for the job and technology-trend tables.
//!
//! This module provides:
//! - Raw cell sanitization (trimming, null markers)
//! - Salary range repair, bounds filtering and salary bucketing
//! - Experience level, company size and location standardization
//! - Skill list canonicalization and skill-category tagging
//! - Date coercion and `days_since_posted`
//! - Exact and near-duplicate removal
//! - Technology-trend table cleaning
//!
//! Every stage consumes a `DataFrame` and returns a new one; none of them
//! touch the filesystem.

mod categories;
mod dates;
mod dedup;
mod salary;
mod sanitizers;
mod skills;
mod tech;

pub use categories::CategoryStandardizer;
pub use dates::{DateNormalizer, parse_datetime};
pub use dedup::{DedupCounts, DeduplicationEngine, drop_exact_duplicates, drop_key_duplicates};
pub use salary::{SalaryOutcome, SalaryProcessor};
pub use sanitizers::RawSanitizer;
pub use skills::SkillNormalizer;
pub use tech::{TechCleaningCounts, TechTrendCleaner};
