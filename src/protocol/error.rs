//! IDEC error types

use std::num::ParseIntError;

use thiserror::Error;

/// IDEC codec errors
#[derive(Error, Debug)]
pub enum Error {
    /// Blob could not be unescaped or decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Blob decoded to fewer lines than the layout requires
    #[error("bad message: need {needed} lines, got {got}")]
    MalformedMessage {
        /// Required line count
        needed: usize,
        /// Actual line count
        got: usize,
    },

    /// Timestamp line is not an integer
    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        /// Raw timestamp line
        value: String,
        /// Integer parse failure
        source: ParseIntError,
    },

    /// Tag line is missing the `ii/` marker or carries a wrong `ii` value
    #[error("bad tagstring: {tags:?}")]
    InvalidTag {
        /// Offending tag line (or `ii` value when collecting)
        tags: String,
    },

    /// Point message field failed validation
    #[error("invalid point message: {0}")]
    Validation(#[from] ValidationError),

    /// Served message does not hash to the ID it was served under
    #[error("message id mismatch: expected {expected}, got {found}")]
    IdMismatch {
        /// ID the node listed
        expected: String,
        /// ID computed from the content
        found: String,
    },

    /// Malformed list line (echo list, echo index, message bundle)
    #[error("format error on line {line}: {reason}")]
    Format {
        /// Zero-based line number
        line: usize,
        /// What was wrong
        reason: String,
    },
}

/// Failure to turn a transported blob back into text
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Invalid base64
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Point message field violations, in the order they are checked
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `echo` is empty
    #[error("wrong echo name")]
    EmptyEcho,

    /// `to` is empty
    #[error("`to` field is empty")]
    EmptyTo,

    /// `subg` is empty
    #[error("`subg` field is empty")]
    EmptySubg,

    /// Separator line carries text
    #[error("empty line is not empty")]
    NonEmptySeparator,

    /// `repto` is neither empty nor a full message ID
    #[error("wrong @repto field length: expected {expected}, got {got}")]
    ReptoLength {
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// `body` is empty
    #[error("`body` field is empty")]
    EmptyBody,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
