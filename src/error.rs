//! Error types for CSVT serialization and deserialization.
//!
//! Every failure aborts the current call; no partial document or partially
//! filled value is ever returned. [`Error`] distinguishes the conditions a
//! caller may want to branch on — a field missing under strict decoding, a
//! scalar that cannot be converted to the target type, a pointer into a
//! table or row that does not exist — from plain syntax problems in the
//! input.
//!
//! ```rust
//! use serde_csvt::{from_str, Error};
//!
//! let result: Result<Vec<String>, Error> = from_str("/** broken");
//! assert!(result.is_err());
//! ```

use std::fmt;
use thiserror::Error;

/// All errors that can occur while encoding or decoding CSVT documents.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing.
    #[error("IO error: {0}")]
    Io(String),

    /// Strict decoding found a target field with no matching column.
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// A cell's scalar kind cannot be converted to the target type.
    #[error("{location} must be {expected}, but {found} found")]
    TypeMismatch {
        expected: String,
        found: String,
        location: String,
    },

    /// A pointer references a table or row that does not exist.
    #[error("{location}: reference ${key}_{index} not found")]
    DanglingPointer {
        key: String,
        index: usize,
        location: String,
    },

    /// A cell is neither a pointer nor any recognized scalar literal.
    #[error("cell type not recognized: {cell}")]
    UnrecognizedScalar { cell: String },

    /// A row is structurally broken: missing closing character, misplaced
    /// separator, or an unterminated quoted string.
    #[error("malformed row: {reason}")]
    MalformedRow { reason: String },

    /// The table set contains no table flagged as root.
    #[error("root table is not defined")]
    NoRoot,

    /// A map or sequence was used as the top-level value.
    #[error("common structures cannot be root")]
    InvalidRoot,

    /// The value uses a Rust construct the format cannot represent.
    #[error("unsupported kind: {0}")]
    UnsupportedKind(String),

    /// Encoding recursed past the depth cap; the value graph is either
    /// cyclic or nested beyond what the format is meant to carry.
    #[error("maximum encoding depth exceeded; cyclic value graphs are not supported")]
    CyclicGraph,

    /// Generic message, used by the serde `custom` hooks.
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn missing_field(field: impl Into<String>) -> Self {
        Error::MissingField {
            field: field.into(),
        }
    }

    pub(crate) fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            location: location.into(),
        }
    }

    pub(crate) fn dangling_pointer(
        key: impl Into<String>,
        index: usize,
        location: impl Into<String>,
    ) -> Self {
        Error::DanglingPointer {
            key: key.into(),
            index,
            location: location.into(),
        }
    }

    pub(crate) fn unrecognized_scalar(cell: impl Into<String>) -> Self {
        Error::UnrecognizedScalar { cell: cell.into() }
    }

    pub(crate) fn malformed_row(reason: impl Into<String>) -> Self {
        Error::MalformedRow {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_kind(what: impl Into<String>) -> Self {
        Error::UnsupportedKind(what.into())
    }

    pub(crate) fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a generic error from a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
