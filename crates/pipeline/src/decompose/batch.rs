use crate::Context;
use crate::decompose::error::{Error, ErrorKind, Result};
use crate::decompose::request::ArchiveRequest;
use exn::ResultExt;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::instrument;
use unravel_cache::{Claim, ContentDigest, Lookup, hash_file};

/// An archive that was skipped, and why.
#[derive(Debug)]
pub struct Failure {
    pub request: ArchiveRequest,
    pub error: Error,
}

/// Result of decomposing one batch of archives.
#[derive(Debug, Default)]
pub struct Decomposition {
    /// Cache directories holding the extracted contents, in request order,
    /// without duplicates.
    pub directories: Vec<PathBuf>,
    /// Archives that could not be processed. The rest of the batch was.
    pub failures: Vec<Failure>,
    /// How many archives were actually extracted (cache misses that
    /// succeeded).
    pub extracted: usize,
}

impl Decomposition {
    fn fail(&mut self, request: &ArchiveRequest, error: Error) {
        tracing::warn!(path = %request.path.display(), error = %*error, "skipping archive");
        self.failures.push(Failure { request: request.clone(), error });
    }
}

/// Maps each archive to the cache directory holding its extracted contents.
///
/// Every archive is hashed, and the batch is partitioned into hits and misses
/// before anything is extracted. Misses are then extracted one digest at a
/// time; a second request for content that an earlier request (or another
/// thread) just extracted picks up the finished directory instead.
///
/// Archives on the miss path whose base name is not portable are rejected
/// with [`ErrorKind::UnicodeName`]. Content that is already cached is served
/// regardless of the name it arrives under.
///
/// Nested archives inside the returned directories are *not* expanded here;
/// see [`intercept`](crate::intercept::intercept).
#[instrument(skip_all, fields(requests = requests.len(), hits, extracted, failed))]
pub fn decompose(ctx: &Context, requests: &[ArchiveRequest]) -> Decomposition {
    let mut outcome = Decomposition::default();

    let mut hashed: Vec<(&ArchiveRequest, ContentDigest)> = Vec::with_capacity(requests.len());
    for request in requests {
        match hash_file(&request.path).or_raise(|| ErrorKind::Hash) {
            Ok(digest) => hashed.push((request, digest)),
            Err(error) => outcome.fail(request, error),
        }
    }

    let mut slots: Vec<Option<PathBuf>> = Vec::with_capacity(hashed.len());
    let mut misses = Vec::new();
    let mut hits = 0usize;
    for (index, (request, digest)) in hashed.iter().enumerate() {
        match ctx.cache.lookup_or_reserve(digest) {
            Lookup::Hit(directory) => {
                tracing::info!(path = %request.path.display(), %digest, "archive already extracted");
                hits += 1;
                slots.push(Some(directory));
            },
            Lookup::Miss(_) => {
                slots.push(None);
                misses.push(index);
            },
        }
    }

    for index in misses {
        let (request, digest) = hashed[index];
        match extract(ctx, request, digest) {
            Ok((directory, fresh)) => {
                outcome.extracted += usize::from(fresh);
                slots[index] = Some(directory);
            },
            Err(error) => outcome.fail(request, error),
        }
    }

    let mut seen = HashSet::new();
    outcome.directories = slots.into_iter().flatten().filter(|directory| seen.insert(directory.clone())).collect();

    let span = tracing::Span::current();
    span.record("hits", hits);
    span.record("extracted", outcome.extracted);
    span.record("failed", outcome.failures.len());
    outcome
}

/// Extracts one cache miss. Returns the entry and whether this call created it.
fn extract(ctx: &Context, request: &ArchiveRequest, digest: ContentDigest) -> Result<(PathBuf, bool)> {
    if !request.has_portable_name() {
        exn::bail!(ErrorKind::UnicodeName(request.path.clone()));
    }
    let reservation = match ctx.cache.claim(digest) {
        Claim::Ready(directory) => {
            tracing::debug!(path = %request.path.display(), %digest, "extracted by an earlier request");
            return Ok((directory, false));
        },
        Claim::Owned(reservation) => reservation,
    };
    tracing::info!(path = %request.path.display(), %digest, "extracting archive");
    let staging = reservation.stage().or_raise(|| ErrorKind::Cache)?;
    ctx.extractor.extract(&request.path, &staging.path()).or_raise(|| ErrorKind::Extraction)?;
    let directory = reservation.commit(staging).or_raise(|| ErrorKind::Cache)?;
    Ok((directory, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use unravel_archive::Extractor;
    use unravel_archive::error::{ErrorKind as ArchiveErrorKind, Result as ArchiveResult};

    /// Copies the archive's bytes into `payload.bin`, or fails if the archive
    /// starts with `corrupt`.
    #[derive(Default)]
    struct FakeExtractor {
        calls: AtomicUsize,
    }

    impl Extractor for FakeExtractor {
        fn extract(&self, source: &Path, destination: &Path) -> ArchiveResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let bytes = fs::read(source).unwrap();
            fs::create_dir_all(destination).unwrap();
            fs::write(destination.join("payload.bin"), &bytes).unwrap();
            if bytes.starts_with(b"corrupt") {
                exn::bail!(ArchiveErrorKind::Corrupted);
            }
            Ok(())
        }
    }

    struct Fixture {
        _temp: tempfile::TempDir,
        inputs: PathBuf,
        extractor: Arc<FakeExtractor>,
        ctx: Context,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = tempfile::tempdir().unwrap();
            let inputs = temp.path().join("inputs");
            fs::create_dir_all(&inputs).unwrap();
            let extractor = Arc::new(FakeExtractor::default());
            let ctx = Context::new(temp.path().join("cache")).with_extractor(extractor.clone());
            Self { _temp: temp, inputs, extractor, ctx }
        }

        fn archive(&self, name: &str, contents: &str) -> ArchiveRequest {
            let path = self.inputs.join(name);
            fs::write(&path, contents).unwrap();
            ArchiveRequest::new(path)
        }

        fn calls(&self) -> usize {
            self.extractor.calls.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_identical_content_extracts_once() {
        let fixture = Fixture::new();
        let requests = [
            fixture.archive("a.tar.gz", "same"),
            fixture.archive("b.tar.gz", "same"),
            fixture.archive("c.tar.gz", "different"),
        ];
        let outcome = decompose(&fixture.ctx, &requests);

        assert!(outcome.failures.is_empty());
        assert_eq!(fixture.calls(), 2);
        assert_eq!(outcome.extracted, 2);
        assert_eq!(outcome.directories, vec![
            fixture.ctx.cache.entry_path(&ContentDigest::of(b"same")),
            fixture.ctx.cache.entry_path(&ContentDigest::of(b"different")),
        ]);
    }

    #[test]
    fn test_second_run_is_all_hits() {
        let fixture = Fixture::new();
        let requests = [fixture.archive("a.tar.gz", "one"), fixture.archive("b.tar.gz", "two")];
        let first = decompose(&fixture.ctx, &requests);
        let second = decompose(&fixture.ctx, &requests);

        assert_eq!(first.directories, second.directories);
        assert_eq!(second.extracted, 0);
        assert_eq!(fixture.calls(), 2);
    }

    #[test]
    fn test_unicode_name_skipped_on_miss() {
        let fixture = Fixture::new();
        let requests = [fixture.archive("café.tar.gz", "accented"), fixture.archive("plain.tar.gz", "plain")];
        let outcome = decompose(&fixture.ctx, &requests);

        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(&*outcome.failures[0].error, ErrorKind::UnicodeName(_)));
        assert_eq!(outcome.directories, vec![fixture.ctx.cache.entry_path(&ContentDigest::of(b"plain"))]);
        assert!(!fixture.ctx.cache.lookup_or_reserve(&ContentDigest::of(b"accented")).is_hit());
    }

    #[test]
    fn test_unicode_name_served_from_cache() {
        let fixture = Fixture::new();
        decompose(&fixture.ctx, &[fixture.archive("first.tar.gz", "shared")]);
        let outcome = decompose(&fixture.ctx, &[fixture.archive("café.tar.gz", "shared")]);

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.directories.len(), 1);
        assert_eq!(fixture.calls(), 1);
    }

    #[test]
    fn test_unreadable_archive_is_hash_failure() {
        let fixture = Fixture::new();
        let missing = ArchiveRequest::new(fixture.inputs.join("missing.tar.gz"));
        let outcome = decompose(&fixture.ctx, &[missing, fixture.archive("ok.tar.gz", "ok")]);

        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(&*outcome.failures[0].error, ErrorKind::Hash));
        assert_eq!(outcome.directories.len(), 1);
    }

    #[test]
    fn test_failed_extraction_leaves_no_entry() {
        let fixture = Fixture::new();
        let requests = [fixture.archive("bad.tar.gz", "corrupt data"), fixture.archive("good.tar.gz", "fine")];
        let outcome = decompose(&fixture.ctx, &requests);

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].request.path, requests[0].path);
        assert!(matches!(&*outcome.failures[0].error, ErrorKind::Extraction));
        assert_eq!(outcome.directories, vec![fixture.ctx.cache.entry_path(&ContentDigest::of(b"fine"))]);

        // A partially written extraction must never turn into a hit.
        assert!(!fixture.ctx.cache.lookup_or_reserve(&ContentDigest::of(b"corrupt data")).is_hit());
        let retry = decompose(&fixture.ctx, &requests[..1]);
        assert_eq!(retry.failures.len(), 1);
        assert_eq!(fixture.calls(), 3);
    }

    #[test]
    fn test_unusable_cache_root_is_cache_failure() {
        let fixture = Fixture::new();
        let blocker = fixture.inputs.join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let ctx = fixture.ctx.clone();
        let ctx = Context { cache: Arc::new(unravel_cache::ExtractionCache::new(blocker.join("cache"))), ..ctx };

        let outcome = decompose(&ctx, &[fixture.archive("a.tar.gz", "a")]);
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(&*outcome.failures[0].error, ErrorKind::Cache));
        assert_eq!(fixture.calls(), 0);
    }

    #[test]
    fn test_empty_batch() {
        let fixture = Fixture::new();
        let outcome = decompose(&fixture.ctx, &[]);
        assert!(outcome.directories.is_empty() && outcome.failures.is_empty());
    }
}
