//! Error types for the [`decompose`](super) module.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A decomposition error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for decomposition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single archive was skipped. None of these abort the batch.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The archive's base name contains characters outside printable ASCII.
    /// Rename the file and try again.
    #[display("archive name contains unsupported characters: {}", _0.display())]
    UnicodeName(#[error(not(source))] PathBuf),
    /// The extractor rejected the archive (corrupt, truncated, unsafe).
    #[display("extraction failed")]
    Extraction,
    /// The archive could not be read while computing its digest.
    #[display("could not hash archive")]
    Hash,
    /// The cache root or a staging directory could not be prepared or
    /// committed.
    #[display("extraction cache unavailable")]
    Cache,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Hash | ErrorKind::Cache)
    }
}
