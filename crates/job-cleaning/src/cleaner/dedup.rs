//! Exact and near-duplicate record removal.

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::columns::DEDUP_KEY;
use crate::utils::has_column;

/// Rows removed by each deduplication pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupCounts {
    pub exact_removed: usize,
    pub near_removed: usize,
}

impl DedupCounts {
    pub fn total(&self) -> usize {
        self.exact_removed + self.near_removed
    }
}

/// Removes fully identical rows, then rows sharing `(company, title, location)`.
///
/// The first occurrence in original order is kept and missing values compare
/// equal to each other. Running the engine twice removes nothing the second time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeduplicationEngine;

impl DeduplicationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn deduplicate(&self, df: DataFrame) -> Result<(DataFrame, DedupCounts)> {
        let before = df.height();
        let df = drop_exact_duplicates(&df)?;
        let exact_removed = before - df.height();

        let before = df.height();
        let df = drop_key_duplicates(&df, &DEDUP_KEY)?;
        let near_removed = before - df.height();

        debug!(
            "Deduplication removed {} exact and {} near duplicates",
            exact_removed, near_removed
        );

        Ok((
            df,
            DedupCounts {
                exact_removed,
                near_removed,
            },
        ))
    }
}

/// Drop rows identical in every column, keeping the first occurrence.
pub fn drop_exact_duplicates(df: &DataFrame) -> Result<DataFrame> {
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}

/// Drop rows sharing the same values in `key`, keeping the first occurrence.
///
/// Key columns absent from the frame are ignored; with none present the
/// frame is returned unchanged.
pub fn drop_key_duplicates(df: &DataFrame, key: &[&str]) -> Result<DataFrame> {
    let subset: Vec<String> = key
        .iter()
        .filter(|name| has_column(df, name))
        .map(|name| name.to_string())
        .collect();
    if subset.is_empty() {
        debug!("No key columns present, skipping key deduplication");
        return Ok(df.clone());
    }
    Ok(df.unique_stable(Some(subset.as_slice()), UniqueKeepStrategy::First, None)?)
}
