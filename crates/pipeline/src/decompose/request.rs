use std::path::PathBuf;

/// One candidate archive in a decomposition batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub path: PathBuf,
    /// File name minus its final extension, e.g. `café.tar` for `café.tar.gz`.
    pub base_name: String,
}

impl ArchiveRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base_name = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
        Self { path, base_name }
    }

    /// Whether the base name is safe to extract under. See [`is_portable_name`].
    pub fn has_portable_name(&self) -> bool {
        is_portable_name(&self.base_name)
    }
}

/// Whether every character of `name` is printable ASCII (space to tilde).
///
/// ```
/// use unravel_pipeline::decompose::is_portable_name;
///
/// assert!(is_portable_name("Props Pack (v2).tar"));
/// assert!(!is_portable_name("café.tar"));
/// assert!(!is_portable_name("tab\there.tar"));
/// ```
pub fn is_portable_name(name: &str) -> bool {
    name.chars().all(|c| (' '..='~').contains(&c))
}
