use std::fmt;
use thiserror::Error;

/// Why the layout detector gave up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutFailure {
    /// No cell matched the identifier pattern
    NoMatch { rows_scanned: usize },
    /// The first identifier sits in the top row, so there is no header above it
    NoHeaderAbove { column: usize },
}

impl fmt::Display for LayoutFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutFailure::NoMatch { rows_scanned } => {
                write!(f, "no cell matched in the first {} rows", rows_scanned)
            }
            LayoutFailure::NoHeaderAbove { column } => write!(
                f,
                "first identifier found in row 1, column {}, with no header row above it",
                column + 1
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum MaxScoresError {
    #[error("Layout not found: expected a USN matching '{pattern}' below a header row; {reason}")]
    LayoutNotFound { pattern: String, reason: LayoutFailure },

    #[error(
        "No records found: none of the {rows_examined} rows under column '{column}' matched '{pattern}'"
    )]
    NoRecordsFound {
        pattern: String,
        column: String,
        rows_examined: usize,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, MaxScoresError>;
