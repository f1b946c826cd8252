//! Archive extraction.
//!
//! The pipeline only ever sees the [`Extractor`] trait; [`TarExtractor`] is
//! the production implementation that streams a compressed tarball to disk.

use crate::error::{ErrorKind, Result};
use crate::format::ArchiveFormat;
use crate::sanitize;
use exn::{OptionExt, ResultExt};
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::instrument;
use unravel_compress::MAGIC_PROBE_LEN;

/// Unpacks an archive into a directory.
///
/// Implementations must create `destination` (and any parents) and populate
/// it with the archive's full decompressed contents, preserving relative
/// paths. Corrupt or truncated input is an error; what is left behind in
/// `destination` on failure is unspecified, so callers extract into a staging
/// location they can throw away.
pub trait Extractor: Send + Sync {
    fn extract(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Streaming extractor for compressed tarballs.
///
/// The compression layer is chosen from the file's suffix and cross-checked
/// against the file's magic bytes before decoding starts. Every entry path is
/// validated so that nothing lands outside `destination`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TarExtractor;

impl Extractor for TarExtractor {
    #[instrument(skip_all, fields(source = %source.display(), destination = %destination.display(), entries))]
    fn extract(&self, source: &Path, destination: &Path) -> Result<()> {
        let format =
            ArchiveFormat::from_path(source).ok_or_raise(|| ErrorKind::UnsupportedFormat(source.to_path_buf()))?;
        let mut file = File::open(source).or_raise(|| ErrorKind::Io)?;

        let mut head = Vec::with_capacity(MAGIC_PROBE_LEN);
        file.by_ref().take(MAGIC_PROBE_LEN as u64).read_to_end(&mut head).or_raise(|| ErrorKind::Io)?;
        if !format.compression().check_magic_bytes(&head) {
            exn::bail!(ErrorKind::FormatMismatch(source.to_path_buf()));
        }
        file.rewind().or_raise(|| ErrorKind::Io)?;

        let decoder = format.compression().wrap_reader(BufReader::new(file)).or_raise(|| ErrorKind::Compression)?;
        let mut archive = tar::Archive::new(decoder);
        fs::create_dir_all(destination).or_raise(|| ErrorKind::Io)?;

        let mut count = 0u64;
        for entry in archive.entries().or_raise(|| ErrorKind::Corrupted)? {
            let mut entry = entry.or_raise(|| ErrorKind::Corrupted)?;
            let path = entry.path().or_raise(|| ErrorKind::Corrupted)?.into_owned();
            let relative = sanitize::entry_path(&path)?;
            if relative.as_os_str().is_empty() {
                continue;
            }
            // Earlier entries may have planted a symlink where a directory is expected.
            if sanitize::crosses_symlink(destination, &relative) {
                exn::bail!(ErrorKind::PathTraversal(path));
            }
            let target = destination.join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
            }
            entry.unpack(&target).or_raise(|| ErrorKind::Io)?;
            count += 1;
        }
        tracing::Span::current().record("entries", count);
        tracing::debug!(entries = count, %format, "archive unpacked");
        Ok(())
    }
}
