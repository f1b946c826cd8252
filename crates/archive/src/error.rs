//! Archive Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file name does not carry a recognised archive suffix.
    #[display("not a recognised archive: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// The leading bytes of the file contradict its archive suffix.
    #[display("archive contents do not match its extension: {}", _0.display())]
    FormatMismatch(#[error(not(source))] PathBuf),
    /// The compression layer could not be opened.
    #[display("compression error")]
    Compression,
    /// The compressed stream or the tar structure inside it is corrupt or
    /// truncated. Don't retry with the same input.
    #[display("archive is corrupted or truncated")]
    Corrupted,
    /// An entry tried to escape the destination directory.
    #[display("archive entry escapes destination: {}", _0.display())]
    PathTraversal(#[error(not(source))] PathBuf),
    /// Reading the source or writing the destination failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
