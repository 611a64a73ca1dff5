use thiserror::Error;

/// Failures that stop a CSV file from being transformed at all.
///
/// Recoverable cell problems (an unreadable release year or runtime) never
/// surface here; they are substituted during the transform.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("Input is missing required column '{0}'")]
    MissingColumn(String),
    #[error("Row {row}: rank '{value}' is not an integer")]
    InvalidRank { row: usize, value: String },
    #[error("Row {row}: rating '{value}' is not a number")]
    InvalidRating { row: usize, value: String },
}
