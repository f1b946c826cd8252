use crate::error::{ErrorKind, Result};
use crate::{Classifier, ImportSelection, MediaCategory, extension_of};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;
use unravel_archive::is_archive;
use walkdir::WalkDir;

/// Generic markup extensions that model loaders claim but rarely are models.
pub const MARKUP_FALSE_POSITIVES: &[&str] = &["xml"];

/// Decides whether a single extracted file should be imported.
///
/// Archives are always kept so nested archives can be decomposed in turn.
/// Otherwise the file's category must be enabled, except that mesh-classified
/// markup (see [`MARKUP_FALSE_POSITIVES`]) is always dropped.
///
/// ```
/// use unravel_media::{ExtensionTable, ImportSelection, MediaCategory, should_include};
///
/// let table = ExtensionTable::default();
/// let selection = ImportSelection::none().with(MediaCategory::Mesh, true);
/// assert!(should_include("model.fbx", &selection, &table));
/// assert!(!should_include("scene.xml", &selection, &table));
/// assert!(should_include("nested.tar.gz", &selection, &table));
/// ```
pub fn should_include(path: impl AsRef<Path>, selection: &ImportSelection, classifier: &dyn Classifier) -> bool {
    let path = path.as_ref();
    if is_archive(path) {
        return true;
    }
    let extension = extension_of(path);
    let category = classifier.classify(&extension);
    if category == MediaCategory::Mesh && MARKUP_FALSE_POSITIVES.contains(&extension.as_str()) {
        return false;
    }
    selection.is_enabled(category)
}

/// Every regular file beneath `root`, at any depth, in a stable order.
pub fn walk_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.or_raise(|| ErrorKind::Walk(root.to_path_buf()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Walks `root` and keeps only the files [`should_include`] accepts.
#[instrument(skip(selection, classifier), fields(root = %root.display(), kept, dropped))]
pub fn select_files(root: &Path, selection: &ImportSelection, classifier: &dyn Classifier) -> Result<Vec<PathBuf>> {
    let (kept, dropped): (Vec<_>, Vec<_>) =
        walk_files(root)?.into_iter().partition(|path| should_include(path, selection, classifier));
    for path in &dropped {
        tracing::trace!(path = %path.display(), "file not selected for import");
    }
    let span = tracing::Span::current();
    span.record("kept", kept.len());
    span.record("dropped", dropped.len());
    Ok(kept)
}
