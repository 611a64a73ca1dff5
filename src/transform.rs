//! Raw CSV rows to [`MovieRecord`]s.
//!
//! Source columns are located by exact header name, so extra columns and
//! column order in the file do not matter. Cell coercion follows two
//! policies: an unreadable release year becomes `None`, while an unreadable
//! runtime becomes `0` through [`parse_runtime_minutes()`]. A rank or rating
//! that cannot be coerced at all stops the transform.
//!
//! Cells holding one of the [`MISSING_TOKENS`] (`N/A`, `null`, ...) count as
//! absent in every column, exactly like an empty cell or a short row.

use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    error::TransformError,
    io_utils::{CsvSource, ReadOptions},
    record::MovieRecord,
    runtime::parse_runtime_minutes,
};

pub const RANK_COLUMN: &str = "Rank";
pub const TITLE_COLUMN: &str = "Title";
pub const RELEASE_COLUMN: &str = "Release";
pub const RUNTIME_COLUMN: &str = "Runtime";
pub const RATED_COLUMN: &str = "Rated";
pub const RATINGS_COLUMN: &str = "Ratings";

/// Cell texts read as a missing value, matched exactly.
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// Positions of the required source columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceColumns {
    rank: usize,
    title: usize,
    release: usize,
    runtime: usize,
    rated: usize,
    ratings: usize,
}

impl SourceColumns {
    pub fn resolve(headers: &[String]) -> Result<Self, TransformError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| TransformError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            rank: find(RANK_COLUMN)?,
            title: find(TITLE_COLUMN)?,
            release: find(RELEASE_COLUMN)?,
            runtime: find(RUNTIME_COLUMN)?,
            rated: find(RATED_COLUMN)?,
            ratings: find(RATINGS_COLUMN)?,
        })
    }
}

/// Maps one decoded row onto the output schema. `row` is the 1-based line
/// number used in error messages.
pub fn transform_row(
    columns: &SourceColumns,
    raw: &[String],
    row: usize,
) -> Result<MovieRecord, TransformError> {
    let cell = |idx: usize| {
        raw.get(idx)
            .map(|s| s.as_str())
            .filter(|s| !is_missing(s))
    };

    let rank_text = cell(columns.rank).unwrap_or("");
    let rank = parse_whole_number(rank_text).ok_or_else(|| TransformError::InvalidRank {
        row,
        value: rank_text.to_string(),
    })?;

    let rating = match cell(columns.ratings) {
        Some(text) => Some(text.trim().parse::<f64>().map_err(|_| {
            TransformError::InvalidRating {
                row,
                value: text.to_string(),
            }
        })?),
        None => None,
    };

    Ok(MovieRecord {
        rank,
        title: cell(columns.title).map(str::to_string),
        release_year: cell(columns.release).and_then(parse_whole_number),
        runtime_minutes: Some(parse_runtime_minutes(cell(columns.runtime))),
        rated: cell(columns.rated).map(str::to_string),
        rating,
    })
}

/// Reads `path` and transforms every data row, preserving file order.
pub fn transform_csv(path: &Path, options: &ReadOptions) -> Result<Vec<MovieRecord>> {
    let mut source = CsvSource::open(path, options)?;
    let headers = source.headers()?;
    let columns = SourceColumns::resolve(&headers)
        .with_context(|| format!("Validating headers for {path:?}"))?;

    let mut records = Vec::new();
    while let Some((row, raw)) = source.next_row()? {
        records.push(transform_row(&columns, &raw, row)?);
    }
    Ok(records)
}

/// Parses an integer, also accepting integral floats such as `1999.0`.
fn parse_whole_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    let parsed = trimmed.parse::<f64>().ok()?;
    let in_range = parsed >= i64::MIN as f64 && parsed < i64::MAX as f64;
    (parsed.is_finite() && parsed.fract() == 0.0 && in_range).then_some(parsed as i64)
}
