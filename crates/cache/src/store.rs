use crate::ContentDigest;
use crate::error::{ErrorKind, Result};
use crate::inflight::{InFlight, InFlightGuard};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::instrument;

const STAGING_PREFIX: &str = ".staging-";
const STAGING_CONTENTS: &str = "contents";

/// Outcome of a non-blocking existence check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The content has already been extracted into this directory.
    Hit(PathBuf),
    /// Nothing is cached yet; this is where the extraction will live.
    Miss(PathBuf),
}

impl Lookup {
    pub fn path(&self) -> &Path {
        match self {
            Lookup::Hit(path) | Lookup::Miss(path) => path,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

/// Result of [`ExtractionCache::claim`].
#[derive(Debug)]
pub enum Claim<'a> {
    /// Someone (possibly a concurrent caller) already extracted this content.
    Ready(PathBuf),
    /// The caller now owns the extraction of this digest.
    Owned(Reservation<'a>),
}

/// Filesystem cache mapping content digests to extraction directories.
///
/// Layout is one root directory holding one subdirectory per digest, named
/// by the digest's hex form. There is no manifest: a directory's existence
/// is the only record that the content was extracted. Entries are never
/// modified or evicted once committed.
///
/// Extractions are written to a hidden staging directory inside the root and
/// renamed into place only once complete, so an interrupted or failed
/// extraction can never be mistaken for a hit.
#[derive(Debug)]
pub struct ExtractionCache {
    root: PathBuf,
    inflight: InFlight,
}

impl ExtractionCache {
    /// Creates a cache rooted at `root`. Nothing touches the filesystem until
    /// the first extraction is staged.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), inflight: InFlight::default() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory an extraction of `digest` lives in, whether or not it
    /// exists yet.
    #[must_use]
    pub fn entry_path(&self, digest: &ContentDigest) -> PathBuf {
        self.root.join(digest.to_string())
    }

    /// Checks whether `digest` has already been extracted.
    ///
    /// Never blocks and never creates anything; a [`Lookup::Miss`] only names
    /// the directory a later [`claim`](Self::claim) would fill.
    pub fn lookup_or_reserve(&self, digest: &ContentDigest) -> Lookup {
        let path = self.entry_path(digest);
        if path.is_dir() { Lookup::Hit(path) } else { Lookup::Miss(path) }
    }

    /// Takes ownership of extracting `digest`, or reports that it is done.
    ///
    /// Blocks while another caller in this process holds the same digest, then
    /// re-checks the cache, so two concurrent requests for identical content
    /// extract it once. Callers must drop (or commit) one reservation before
    /// claiming another.
    pub fn claim(&self, digest: ContentDigest) -> Claim<'_> {
        let guard = self.inflight.acquire(digest);
        match self.lookup_or_reserve(&digest) {
            Lookup::Hit(path) => Claim::Ready(path),
            Lookup::Miss(destination) => Claim::Owned(Reservation { cache: self, destination, _guard: guard }),
        }
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).or_raise(|| ErrorKind::Root(self.root.clone()))
    }
}

/// Exclusive right to populate one cache entry.
///
/// Dropping the reservation without committing releases the digest for the
/// next waiter and leaves no trace in the cache.
#[derive(Debug)]
pub struct Reservation<'a> {
    cache: &'a ExtractionCache,
    destination: PathBuf,
    _guard: InFlightGuard<'a>,
}

impl Reservation<'_> {
    /// Creates a fresh staging directory to extract into.
    pub fn stage(&self) -> Result<Staging> {
        self.cache.ensure_root()?;
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.cache.root)
            .or_raise(|| ErrorKind::Staging)?;
        Ok(Staging { dir })
    }

    /// Moves a finished staging directory into place and returns the entry.
    #[instrument(skip_all, fields(destination = %self.destination.display()))]
    pub fn commit(self, staging: Staging) -> Result<PathBuf> {
        let contents = staging.path();
        if !contents.is_dir() {
            // Extractors are expected to create their destination, but an
            // empty archive is still a valid (empty) entry.
            fs::create_dir_all(&contents).or_raise(|| ErrorKind::Staging)?;
        }
        match fs::rename(&contents, &self.destination) {
            Ok(()) => {
                tracing::debug!("cache entry committed");
                Ok(self.destination)
            },
            // Another process may have committed the same content first.
            Err(err) if self.destination.is_dir() => {
                tracing::debug!(error = %err, "entry committed concurrently; discarding staged copy");
                Ok(self.destination)
            },
            Err(err) => Err(err).or_raise(|| ErrorKind::Commit(self.destination.clone())),
        }
    }
}

/// Scratch directory for one in-progress extraction.
///
/// Removed (with whatever it contains) when dropped.
#[derive(Debug)]
pub struct Staging {
    dir: TempDir,
}

impl Staging {
    /// Where the extractor should write. Not created yet.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(STAGING_CONTENTS)
    }
}
