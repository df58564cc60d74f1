use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for folder derivation and CSV reordering.
#[derive(Error, Debug)]
pub enum TidyError {
    /// Input CSV file does not exist or is not a regular file.
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Requested headers are missing, or the configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The input file has zero bytes.
    #[error("CSV file is empty")]
    EmptyInput,

    /// The input file has a header but no data rows.
    #[error("The input CSV file contains no data rows")]
    EmptyData,

    /// No header row, or the CSV structure could not be parsed.
    #[error("Malformed CSV: {0}")]
    MalformedInput(String),

    /// The declared encoding cannot decode (or encode) the text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Coarse classification of a [`TidyError`], for callers that only need to
/// branch on what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Configuration,
    EmptyInput,
    EmptyData,
    MalformedInput,
    Encoding,
    Io,
}

impl TidyError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TidyError::NotFound(_) => ErrorKind::NotFound,
            TidyError::Configuration(_) => ErrorKind::Configuration,
            TidyError::EmptyInput => ErrorKind::EmptyInput,
            TidyError::EmptyData => ErrorKind::EmptyData,
            TidyError::MalformedInput(_) => ErrorKind::MalformedInput,
            TidyError::Encoding(_) => ErrorKind::Encoding,
            TidyError::Io(_) | TidyError::Csv(_) => ErrorKind::Io,
        }
    }
}

/// Result type alias for csvtidy operations.
pub type Result<T> = std::result::Result<T, TidyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            TidyError::NotFound(PathBuf::from("x.csv")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(TidyError::EmptyData.kind(), ErrorKind::EmptyData);
        let io_err = TidyError::from(io::Error::other("boom"));
        assert_eq!(io_err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = TidyError::NotFound(PathBuf::from("data/missing.csv"));
        assert!(err.to_string().contains("missing.csv"));
    }
}
