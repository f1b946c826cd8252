//! Cache Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Content could not be read to completion while hashing.
    #[display("could not read content for hashing: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The cache root does not exist and could not be created.
    #[display("cache root unavailable: {}", _0.display())]
    Root(#[error(not(source))] PathBuf),
    /// A staging directory could not be created inside the cache root.
    #[display("could not create staging directory")]
    Staging,
    /// A finished extraction could not be moved into place.
    #[display("could not commit cache entry: {}", _0.display())]
    Commit(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Every cache failure is a filesystem failure, which may well be
    /// transient (permissions fixed, disk space freed).
    pub fn is_retryable(&self) -> bool {
        true
    }
}
