use crate::Compression;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Compression {
    /// Returns the file extension for this compression format.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Bzip2 => ".bz2",
            Compression::Gzip => ".gz",
            #[cfg(feature = "xz")]
            Compression::Xz => ".xz",
            #[cfg(feature = "zstd")]
            Compression::Zstd => ".zst",
        }
    }

    /// Returns the short name for configuration (for displaying to user)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
            #[cfg(feature = "xz")]
            Compression::Xz => "xz",
            #[cfg(feature = "zstd")]
            Compression::Zstd => "zstd",
        }
    }

    /// Verify that `bytes` start with the expected magic bytes for this format.
    ///
    /// Used to cross-check a format detected from a file extension against the
    /// actual file contents before handing the stream to a decoder. Any input
    /// that matches no known magic is considered valid for
    /// [`None`](Self::None).
    #[must_use]
    pub fn check_magic_bytes(&self, bytes: &[u8]) -> bool {
        match Self::from_magic_bytes(bytes) {
            Compression::None => matches!(self, Compression::None),
            detected => *self == detected,
        }
    }
}
