//! Recursive archive decomposition for a batch import pipeline.
//!
//! Incoming file lists are split into archives and everything else. Archives
//! are hashed, looked up in the [`ExtractionCache`], extracted on a miss, and
//! their contents filtered by media category; nested archives go around
//! again until none remain. The resulting flat list is handed to an
//! [`Importer`](stage::Importer) through a chain of [`Stage`](stage::Stage)s.
//!
//! The entry points are [`decompose::decompose`] (archives to cache
//! directories), [`intercept::intercept`] (a whole file list, recursively) and
//! [`stage::ImportHost`] (the stage chain in front of an importer).

pub mod decompose;
pub mod error;
pub mod intercept;
pub mod stage;

use std::path::PathBuf;
use std::sync::Arc;
use unravel_archive::{ExtractorHandle, TarExtractor};
use unravel_cache::ExtractionCache;
use unravel_media::{ClassifierHandle, ExtensionTable};

/// Shared collaborators for every pipeline operation.
///
/// Cheap to clone; everything inside is reference counted.
#[derive(Clone)]
pub struct Context {
    pub cache: Arc<ExtractionCache>,
    pub extractor: ExtractorHandle,
    pub classifier: ClassifierHandle,
}

impl Context {
    /// A context using the tar extractor and the default extension table.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache: Arc::new(ExtractionCache::new(cache_root)),
            extractor: Arc::new(TarExtractor),
            classifier: Arc::new(ExtensionTable::default()),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: ExtractorHandle) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierHandle) -> Self {
        self.classifier = classifier;
        self
    }
}

/// A single input that could not be processed.
///
/// Failures never abort a batch; they are collected alongside the results so
/// callers can report them.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: error::Error,
}
