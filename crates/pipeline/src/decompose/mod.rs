//! Archive decomposition.
//!
//! Turns a batch of archive paths into cache directories holding their
//! extracted contents. Work is deduplicated by content: each distinct digest
//! is extracted at most once, no matter how many copies (or names) of it the
//! batch contains, and content that is already cached is never extracted
//! again.

mod batch;
pub mod error;
mod request;

pub use self::batch::{Decomposition, Failure, decompose};
pub use self::request::{ArchiveRequest, is_portable_name};
