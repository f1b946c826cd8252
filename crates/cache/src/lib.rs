//! Content-addressed cache of extracted archives.
//!
//! Archives are identified by the [`ContentDigest`] of their bytes, never by
//! name. Each digest owns one directory under the cache root holding that
//! archive's fully extracted contents. The cache is safe to share between
//! threads: [`ExtractionCache::claim`] guarantees that identical content is
//! only extracted once at a time within a process.
//!
//! # Layout
//! ```text
//! <root>/
//!   <64 hex chars>/      committed extraction, never modified afterwards
//!   .staging-XXXXXX/     in-progress extraction, removed on failure
//! ```

mod digest;
pub mod error;
mod inflight;
mod store;

pub use crate::digest::{ContentDigest, hash_file, hash_reader};
pub use crate::store::{Claim, ExtractionCache, Lookup, Reservation, Staging};
