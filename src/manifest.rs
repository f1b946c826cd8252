use exn::ResultExt;
use std::io::Write;
use std::path::PathBuf;
use unravel_pipeline::error::{ErrorKind, Result};
use unravel_pipeline::stage::Importer;

/// Importer that writes each batch as `<container>\t<path>` lines.
pub struct ManifestImporter<W> {
    out: W,
}

impl<W: Write> ManifestImporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Importer for ManifestImporter<W> {
    fn import(&mut self, container: &str, files: &[PathBuf], raw_files: bool) -> Result<()> {
        tracing::debug!(container, files = files.len(), raw_files, "writing batch");
        for file in files {
            writeln!(self.out, "{container}\t{}", file.display()).or_raise(|| ErrorKind::Import)?;
        }
        self.out.flush().or_raise(|| ErrorKind::Import)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_lines() {
        let mut importer = ManifestImporter::new(Vec::new());
        importer.import("Archive import", &[PathBuf::from("cache/abc/img.png")], true).unwrap();
        importer.import("World", &[PathBuf::from("readme.txt"), PathBuf::from("b.wav")], true).unwrap();
        let out = String::from_utf8(importer.into_inner()).unwrap();
        assert_eq!(out, "Archive import\tcache/abc/img.png\nWorld\treadme.txt\nWorld\tb.wav\n");
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_import_error() {
        let err = ManifestImporter::new(Closed).import("World", &[PathBuf::from("a.png")], false).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Import));
    }
}
