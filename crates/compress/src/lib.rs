//! Decompression layers for bundled archives.
//!
//! Archives handed to the import pipeline are tar streams wrapped in a single
//! compression layer. This crate names those layers behind one
//! [`Compression`] enum and provides:
//!
//! - **Format detection** from magic bytes ([`Compression::from_magic_bytes`],
//!   [`Compression::check_magic_bytes`])
//! - **Streaming** decompression via wrapped readers ([`Compression::wrap_reader`])
//!   so multi-gigabyte archives never have to fit in memory
//! - Wrapped writers ([`Compression::wrap_writer`]) for producing archives
//!
//! Bzip2 and Gzip are always available. XZ and Zstd are behind feature flags.

mod construct;
pub mod error;
mod ops;
mod util;

pub use crate::construct::MAGIC_PROBE_LEN;

/// A supported compression format.
///
/// Variants gated behind feature flags (`xz`, `zstd`) are only available when
/// the corresponding feature is enabled. Defaults to [`None`](Self::None)
/// (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// Gzip compression (.gz)
    Gzip,
    /// XZ/LZMA compression (.xz)
    #[cfg(feature = "xz")]
    Xz,
    /// Zstd compression (.zst)
    #[cfg(feature = "zstd")]
    Zstd,
}

impl Compression {
    /// Every format compiled into this build, uncompressed first.
    pub const ALL: &'static [Compression] = &[
        Compression::None,
        Compression::Bzip2,
        Compression::Gzip,
        #[cfg(feature = "xz")]
        Compression::Xz,
        #[cfg(feature = "zstd")]
        Compression::Zstd,
    ];
}
