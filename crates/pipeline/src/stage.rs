//! The stage chain in front of a batch importer.
//!
//! An [`ImportHost`] owns an [`Importer`] and a list of [`Stage`]s. Every
//! import request runs through each stage in order; a stage may import part
//! of the batch itself (as a separate batch) and pass the rest along. What
//! survives every stage is imported as the original request, unless nothing
//! survives, in which case the original request is dropped.

use crate::error::{ErrorKind, Result};
use crate::intercept::intercept;
use crate::{Context, Failure};
use exn::ResultExt;
use std::path::PathBuf;
use tracing::instrument;
use unravel_archive::is_archive;
use unravel_media::ImportSelection;

/// Downstream consumer of file batches.
///
/// Implementations decide what "importing" means; the pipeline only promises
/// that `files` is never empty.
pub trait Importer {
    fn import(&mut self, container: &str, files: &[PathBuf], raw_files: bool) -> Result<()>;
}

impl<I: Importer + ?Sized> Importer for Box<I> {
    fn import(&mut self, container: &str, files: &[PathBuf], raw_files: bool) -> Result<()> {
        (**self).import(container, files, raw_files)
    }
}

/// Summary of one [`ImportHost::import`] call.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Number of batches handed to the importer, including the original.
    pub batches: usize,
    /// Total files across those batches.
    pub files: usize,
    /// Whether the original request was dropped because no files were left.
    pub suppressed: bool,
    /// Inputs skipped by a stage. Never fatal.
    pub failures: Vec<Failure>,
}

impl ImportReport {
    fn record(&mut self, files: usize) {
        self.batches += 1;
        self.files += files;
    }
}

/// One step of the chain.
pub trait Stage {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Processes `files` and returns what should continue down the chain.
    ///
    /// A stage may import files itself through `importer`; it should record
    /// such batches and any skipped inputs in `report`. Errors returned here
    /// abort the whole request.
    fn apply(&self, files: Vec<PathBuf>, importer: &mut dyn Importer, report: &mut ImportReport)
    -> Result<Vec<PathBuf>>;
}

/// Replaces archives in a batch with their selected contents.
///
/// Archive-derived files are imported as their own batch into
/// [`container`](Self::container); non-archives pass through untouched.
pub struct ArchiveStage {
    ctx: Context,
    selection: ImportSelection,
    container: String,
}

impl ArchiveStage {
    pub fn new(ctx: Context, selection: ImportSelection, container: impl Into<String>) -> Self {
        Self { ctx, selection, container: container.into() }
    }

    pub fn container(&self) -> &str {
        &self.container
    }
}

impl Stage for ArchiveStage {
    fn name(&self) -> &str {
        "archive"
    }

    #[instrument(skip_all, fields(stage = self.name(), files = files.len()))]
    fn apply(
        &self,
        files: Vec<PathBuf>,
        importer: &mut dyn Importer,
        report: &mut ImportReport,
    ) -> Result<Vec<PathBuf>> {
        if !files.iter().any(|file| is_archive(file)) {
            return Ok(files);
        }
        let interception = intercept(&self.ctx, files, &self.selection);
        report.failures.extend(interception.failures);
        if interception.derived.is_empty() {
            tracing::info!("archives yielded nothing to import");
        } else {
            let count = interception.derived.len();
            tracing::info!(container = %self.container, files = count, "importing archive contents");
            importer
                .import(&self.container, &interception.derived, self.selection.raw_files)
                .or_raise(|| ErrorKind::Import)?;
            report.record(count);
        }
        Ok(interception.passthrough)
    }
}

/// An importer with a chain of stages in front of it.
pub struct ImportHost<I> {
    stages: Vec<Box<dyn Stage>>,
    importer: I,
}

impl<I: Importer> ImportHost<I> {
    pub fn new(importer: I) -> Self {
        Self { stages: Vec::new(), importer }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn importer(&self) -> &I {
        &self.importer
    }

    pub fn into_importer(self) -> I {
        self.importer
    }

    /// Runs `files` through every stage, then imports what is left.
    ///
    /// When no files are left the original request is suppressed and the
    /// importer never sees it. An empty request is suppressed outright.
    #[instrument(skip_all, fields(container, files = files.len()))]
    pub fn import(&mut self, container: &str, files: Vec<PathBuf>, raw_files: bool) -> Result<ImportReport> {
        tracing::Span::current().record("container", container);
        let mut report = ImportReport::default();
        let mut remaining = files;
        for stage in &self.stages {
            if remaining.is_empty() {
                break;
            }
            remaining = stage.apply(remaining, &mut self.importer, &mut report)?;
            tracing::debug!(stage = stage.name(), remaining = remaining.len(), "stage complete");
        }
        if remaining.is_empty() {
            tracing::debug!("nothing left to import; original request suppressed");
            report.suppressed = true;
            return Ok(report);
        }
        self.importer.import(container, &remaining, raw_files).or_raise(|| ErrorKind::Import)?;
        report.record(remaining.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        batches: Vec<(String, Vec<PathBuf>, bool)>,
    }

    impl Importer for Recorder {
        fn import(&mut self, container: &str, files: &[PathBuf], raw_files: bool) -> Result<()> {
            self.batches.push((container.to_string(), files.to_vec(), raw_files));
            Ok(())
        }
    }

    struct Failing;

    impl Importer for Failing {
        fn import(&mut self, _: &str, _: &[PathBuf], _: bool) -> Result<()> {
            exn::bail!(ErrorKind::Import)
        }
    }

    /// Drops every file with the given extension.
    struct DropExtension(&'static str);

    impl Stage for DropExtension {
        fn name(&self) -> &str {
            "drop"
        }

        fn apply(&self, files: Vec<PathBuf>, _: &mut dyn Importer, _: &mut ImportReport) -> Result<Vec<PathBuf>> {
            Ok(files.into_iter().filter(|f| f.extension().is_none_or(|ext| ext != self.0)).collect())
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_no_stages_forwards_everything() {
        let mut host = ImportHost::new(Recorder::default());
        let report = host.import("World", paths(&["a.png", "b.wav"]), false).unwrap();
        assert_eq!(report.batches, 1);
        assert!(!report.suppressed);
        assert_eq!(host.importer().batches, vec![("World".to_string(), paths(&["a.png", "b.wav"]), false)]);
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut host =
            ImportHost::new(Recorder::default()).with_stage(DropExtension("png")).with_stage(DropExtension("wav"));
        host.import("World", paths(&["a.png", "b.wav", "c.txt"]), true).unwrap();
        assert_eq!(host.into_importer().batches, vec![("World".to_string(), paths(&["c.txt"]), true)]);
    }

    #[test]
    fn test_empty_result_is_suppressed() {
        let mut host = ImportHost::new(Recorder::default()).with_stage(DropExtension("png"));
        let report = host.import("World", paths(&["a.png"]), true).unwrap();
        assert!(report.suppressed);
        assert_eq!(report.batches, 0);
        assert!(host.importer().batches.is_empty());

        let report = host.import("World", Vec::new(), true).unwrap();
        assert!(report.suppressed);
    }

    #[test]
    fn test_importer_error_propagates() {
        let mut host = ImportHost::new(Failing);
        let err = host.import("World", paths(&["a.png"]), true).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Import));
    }

    #[test]
    fn test_archive_stage_ignores_batches_without_archives() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = Context::new(temp.path().join("cache"));
        let stage = ArchiveStage::new(ctx, ImportSelection::default(), "Archive import");
        let mut recorder = Recorder::default();
        let mut report = ImportReport::default();
        let files = paths(&["a.png", "notes.gz"]);
        assert_eq!(stage.apply(files.clone(), &mut recorder, &mut report).unwrap(), files);
        assert!(recorder.batches.is_empty());
        assert!(!temp.path().join("cache").exists());
    }
}
