//! Pipeline Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. The [`decompose`](crate::decompose) module has its own,
//! finer-grained error kinds which surface here as [`ErrorKind::Decompose`].

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An archive could not be hashed, cached, or extracted.
    #[display("archive decomposition failed")]
    Decompose,
    /// An extracted cache directory could not be enumerated.
    #[display("could not enumerate extracted files")]
    Select,
    /// The downstream importer rejected a batch.
    #[display("import failed")]
    Import,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Select)
    }
}
