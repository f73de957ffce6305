//! Error taxonomy for the data layer.

use thiserror::Error;

/// Result alias used throughout the data layer.
pub type DataResult<T> = Result<T, DataError>;

/// Everything that can go wrong between receiving file bytes and handing
/// back output bytes. Failures are local to the file being processed, so the
/// UI can report them and keep every other loaded file alive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// File extension outside the `{csv, xlsx}` allow-list.
    #[error("unsupported file format {0:?} (expected csv or xlsx)")]
    UnsupportedFormat(String),

    /// Content could not be parsed in the format its extension declared.
    #[error("malformed {format} content: {message}")]
    Parse { format: &'static str, message: String },

    /// A column selection referenced a name the table does not have.
    #[error("unknown column {0:?}")]
    UnknownColumn(String),

    /// Attempt to build a table out of columns with different lengths.
    #[error("column {column:?} has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Serialization failed while producing output bytes.
    #[error("failed to encode {format} output: {message}")]
    Encode { format: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offender() {
        let err = DataError::UnsupportedFormat("txt".to_string());
        assert_eq!(
            err.to_string(),
            "unsupported file format \"txt\" (expected csv or xlsx)"
        );

        let err = DataError::UnknownColumn("price".to_string());
        assert_eq!(err.to_string(), "unknown column \"price\"");

        let err = DataError::LengthMismatch {
            column: "b".to_string(),
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "column \"b\" has 2 rows, expected 3");
    }
}
