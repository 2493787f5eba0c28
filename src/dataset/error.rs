//! Dataset error types.

use thiserror::Error;

/// Errors raised while turning CSV text into passenger records.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A required column is not present in the header row.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A required field could not be interpreted.
    #[error("invalid value {value:?} for column {column} on row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Two records share the same passenger id.
    #[error("duplicate passenger id: {0}")]
    DuplicateId(u32),

    /// The file has a header but no records.
    #[error("dataset contains no passenger records")]
    Empty,

    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
