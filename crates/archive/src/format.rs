use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use unravel_compress::Compression;

const TAR_EXTENSION: &str = ".tar";

/// A tar archive wrapped in one compression layer.
///
/// Archives are recognised purely by their two-part file name suffix
/// (`.tar.gz`, `.tar.bz2`, ...), compared case-insensitively. Plain `.tar`
/// files are not treated as archives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArchiveFormat {
    compression: Compression,
}

impl ArchiveFormat {
    /// Gzip-compressed tarball, the format every build supports.
    pub const TAR_GZ: ArchiveFormat = ArchiveFormat { compression: Compression::Gzip };
    /// Bzip2-compressed tarball.
    pub const TAR_BZ2: ArchiveFormat = ArchiveFormat { compression: Compression::Bzip2 };

    /// Every archive format compiled into this build.
    pub fn all() -> impl Iterator<Item = ArchiveFormat> {
        Compression::ALL
            .iter()
            .filter(|c| !matches!(c, Compression::None))
            .map(|&compression| ArchiveFormat { compression })
    }

    /// The compression layer wrapped around the tar stream.
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// The full two-part suffix, e.g. `.tar.gz`.
    #[must_use]
    pub fn suffix(&self) -> String {
        format!("{TAR_EXTENSION}{}", self.compression.extension())
    }

    /// Detect the archive format from a path's file name.
    ///
    /// Returns `None` when the name does not end with a supported two-part
    /// suffix, or when the suffix is the whole name (a dotfile).
    ///
    /// ```
    /// use unravel_archive::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_path("assets/Bundle.TAR.GZ"), Some(ArchiveFormat::TAR_GZ));
    /// assert_eq!(ArchiveFormat::from_path("notes.gz"), None);
    /// assert_eq!(ArchiveFormat::from_path(".tar.gz"), None);
    /// ```
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_string_lossy().to_lowercase();
        Self::all().find(|format| {
            let suffix = format.suffix();
            name.len() > suffix.len() && name.ends_with(&suffix)
        })
    }
}

impl Display for ArchiveFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "tar+{}", self.compression)
    }
}

/// Whether the path names a recognised archive.
#[inline]
#[must_use]
pub fn is_archive(path: impl AsRef<Path>) -> bool {
    ArchiveFormat::from_path(path).is_some()
}
