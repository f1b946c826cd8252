//! Compression Operations

use crate::Compression;
#[cfg(feature = "zstd")]
use crate::error::ErrorKind;
use crate::error::Result;
use bzip2::{Compression as BzCompression, read::BzDecoder, write::BzEncoder};
#[cfg(feature = "zstd")]
use exn::ResultExt;
use flate2::{Compression as GzCompression, read::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};
#[cfg(feature = "xz")]
use xz2::{read::XzDecoder, write::XzEncoder};
#[cfg(feature = "zstd")]
use zstd::stream::{read::Decoder as ZstdDecoder, write::Encoder as ZstdEncoder};

// Writers only exist so that archives can be produced for fixtures;
// decoding is the hot path. Default levels are plenty.
#[cfg(feature = "xz")]
const XZ_LEVEL: u32 = 6;
#[cfg(feature = "zstd")]
const ZSTD_LEVEL: i32 = 3;

impl Compression {
    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// Returns a boxed reader that decompresses lazily as it is read; a
    /// corrupt stream surfaces as an [`std::io::Error`] from `read`, not here.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use unravel_compress::Compression;
    ///
    /// let mut reader = Compression::None.wrap_reader(Cursor::new(b"raw tar")).unwrap();
    /// let mut out = Vec::new();
    /// reader.read_to_end(&mut out).unwrap();
    /// assert_eq!(out, b"raw tar");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => Box::new(BzDecoder::new(reader)),
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(XzDecoder::new(reader)),
            #[cfg(feature = "zstd")]
            Compression::Zstd => Box::new(ZstdDecoder::new(reader).or_raise(|| ErrorKind::Codec)?),
        })
    }

    /// Wrap a writer with the appropriate compression layer.
    ///
    /// The compression trailer is written when the returned writer is
    /// dropped, so drop it before reading back the underlying buffer.
    pub fn wrap_writer<'a, W: Write + 'a>(&self, writer: W) -> Result<Box<dyn Write + 'a>> {
        Ok(match self {
            Compression::None => Box::new(writer),
            Compression::Bzip2 => Box::new(BzEncoder::new(writer, BzCompression::default())),
            Compression::Gzip => Box::new(GzEncoder::new(writer, GzCompression::default())),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(XzEncoder::new(writer, XZ_LEVEL)),
            #[cfg(feature = "zstd")]
            Compression::Zstd => {
                Box::new(ZstdEncoder::new(writer, ZSTD_LEVEL).or_raise(|| ErrorKind::Codec)?.auto_finish())
            },
        })
    }
}
