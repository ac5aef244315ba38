//! Error types for loading data and parsing options

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormgridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data has no 'id' column")]
    MissingIdColumn,

    #[error("Row {row} has no usable 'id' value")]
    MissingId { row: usize },

    #[error("Unsupported data file format '{0}'. Use .csv or .json")]
    UnsupportedFormat(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Invalid {option} '{value}'. Expected one of: {expected}")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, FormgridError>;
