//! Archive detection and extraction.
//!
//! Archives are recognised by a two-part file name suffix (see
//! [`ArchiveFormat`]) and unpacked through the [`Extractor`] trait, so the
//! import pipeline never depends on a particular decoder. [`TarExtractor`]
//! streams tarballs through [`unravel_compress`] and guards every entry path
//! against escaping the destination directory.

pub mod error;
mod extract;
mod format;
mod sanitize;

pub use crate::extract::{Extractor, TarExtractor};
pub use crate::format::{ArchiveFormat, is_archive};
use std::sync::Arc;

pub type ExtractorHandle = Arc<dyn Extractor>;
