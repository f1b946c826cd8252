//! Recursive interception of an import batch.

use crate::decompose::{self, ArchiveRequest};
use crate::error::ErrorKind;
use crate::{Context, Failure};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::instrument;
use unravel_archive::is_archive;
use unravel_media::{ImportSelection, select_files};

/// An import batch after every archive in it has been expanded.
#[derive(Debug, Default)]
pub struct Interception {
    /// Selected files extracted from archives (at any nesting depth). These
    /// live inside the extraction cache.
    pub derived: Vec<PathBuf>,
    /// Input files that were not archives, untouched and in input order.
    pub passthrough: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl Interception {
    /// All files to import: archive-derived files first, then pass-through.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.derived.iter().chain(self.passthrough.iter())
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        let mut files = self.derived;
        files.extend(self.passthrough);
        files
    }
}

/// Expands every archive in `files` into its selected contents.
///
/// Archives are recognised by suffix. Each round decomposes the pending
/// archives, walks the resulting cache directories and filters what it finds
/// against `selection`; archives found inside go into the next round. A cache
/// directory is walked at most once per call, so an archive that contains
/// itself (directly or through a cycle) terminates.
///
/// Failures for individual archives or directories are collected and never
/// stop the remaining work.
#[instrument(skip_all, fields(files = files.len(), derived, passthrough, failed, rounds))]
pub fn intercept(ctx: &Context, files: Vec<PathBuf>, selection: &ImportSelection) -> Interception {
    let (mut pending, passthrough): (Vec<_>, Vec<_>) = files.into_iter().partition(|file| is_archive(file));
    let mut outcome = Interception { passthrough, ..Interception::default() };
    let mut walked = HashSet::new();
    let mut rounds = 0usize;

    while !pending.is_empty() {
        rounds += 1;
        let requests: Vec<ArchiveRequest> = pending.drain(..).map(ArchiveRequest::new).collect();
        let decomposition = decompose::decompose(ctx, &requests);
        for failure in decomposition.failures {
            let error = failure.error.raise(ErrorKind::Decompose);
            outcome.failures.push(Failure { path: failure.request.path, error });
        }

        for directory in decomposition.directories {
            if !walked.insert(directory.clone()) {
                tracing::debug!(directory = %directory.display(), "cache directory already expanded");
                continue;
            }
            match select_files(&directory, selection, ctx.classifier.as_ref()) {
                Ok(selected) => {
                    for file in selected {
                        if is_archive(&file) {
                            pending.push(file);
                        } else {
                            outcome.derived.push(file);
                        }
                    }
                },
                Err(error) => {
                    tracing::warn!(directory = %directory.display(), error = %*error, "could not enumerate extraction");
                    outcome.failures.push(Failure { path: directory, error: error.raise(ErrorKind::Select) });
                },
            }
        }
    }

    let span = tracing::Span::current();
    span.record("derived", outcome.derived.len());
    span.record("passthrough", outcome.passthrough.len());
    span.record("failed", outcome.failures.len());
    span.record("rounds", rounds);
    outcome
}
