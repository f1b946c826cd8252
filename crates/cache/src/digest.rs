//! Content hashing.
//!
//! A [`ContentDigest`] is the BLAKE3 hash of an archive's complete byte
//! contents. It is the only cache key: file names, timestamps and other
//! metadata never contribute.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// Fixed-length digest of a file's full contents.
///
/// Renders as 64 lowercase hexadecimal characters, which is also the name of
/// the cache directory holding that content's extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContentDigest(blake3::Hash);

impl ContentDigest {
    /// Digest of an in-memory buffer.
    ///
    /// ```
    /// use unravel_cache::ContentDigest;
    ///
    /// let digest = ContentDigest::of(b"hello");
    /// assert_eq!(digest, ContentDigest::of(b"hello"));
    /// assert_ne!(digest, ContentDigest::of(b"hello!"));
    /// assert_eq!(digest.to_string().len(), 64);
    /// ```
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl Display for ContentDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for ContentDigest {
    type Err = blake3::HexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        blake3::Hash::from_hex(s).map(Self)
    }
}

/// Digest everything a reader yields until end of stream.
pub fn hash_reader(mut reader: impl Read) -> io::Result<ContentDigest> {
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(ContentDigest(hasher.finalize()))
}

/// Digest a file's complete contents, streaming rather than buffering.
///
/// Fails when the file cannot be opened or cannot be read to the end.
#[instrument(skip_all, fields(path = %path.as_ref().display(), digest))]
pub fn hash_file(path: impl AsRef<Path>) -> Result<ContentDigest> {
    let path = path.as_ref();
    let file = File::open(path).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let digest = hash_reader(BufReader::new(file)).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    tracing::Span::current().record("digest", tracing::field::display(&digest));
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn test_file_digest_matches_buffer_digest() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bundle.tar.gz");
        let bytes: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &bytes).unwrap();
        assert_eq!(hash_file(&path).unwrap(), ContentDigest::of(&bytes));
        assert_eq!(hash_reader(Cursor::new(&bytes)).unwrap(), ContentDigest::of(&bytes));
    }

    #[test]
    fn test_digest_ignores_file_name() {
        let temp = tempfile::tempdir().unwrap();
        let first = temp.path().join("a.tar.gz");
        let second = temp.path().join("renamed copy.tar.gz");
        fs::write(&first, b"same bytes").unwrap();
        fs::write(&second, b"same bytes").unwrap();
        assert_eq!(hash_file(&first).unwrap(), hash_file(&second).unwrap());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = hash_file(temp.path().join("gone.tar.gz")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Read(_)));
    }

    #[test]
    fn test_hex_round_trip() {
        let digest = ContentDigest::of(b"archive");
        let hex = digest.to_string();
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hex.parse::<ContentDigest>().unwrap(), digest);
        assert!("not hex".parse::<ContentDigest>().is_err());
    }
}
