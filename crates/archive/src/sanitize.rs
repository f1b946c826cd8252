//! Entry path validation.
//!
//! Tar entries carry arbitrary paths. Anything absolute, prefixed, or climbing
//! out of the destination with `..` is rejected before a single byte is
//! written.

use crate::error::{ErrorKind, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Normalizes a tar entry path relative to the extraction root.
///
/// `.` components are dropped and `..` is resolved lexically; the result must
/// never leave the root. Null bytes are rejected explicitly because they pass
/// through [`Path::components`] on Unix. An entry that normalizes to nothing
/// (e.g. `./`) yields an empty path, which callers treat as the root itself.
pub fn entry_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(s) => {
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::PathTraversal(original.to_path_buf()));
                }
                components.push(s);
            },
            Component::CurDir => {},
            Component::RootDir | Component::Prefix(_) => exn::bail!(ErrorKind::PathTraversal(original.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::PathTraversal(original.to_path_buf()));
                }
            },
        }
    }
    Ok(components.into_iter().collect())
}

/// Whether writing `relative` under `root` would follow a symlink.
///
/// `relative` must already be normalized by [`entry_path`]. Only components
/// that exist on disk are checked; the first missing one ends the walk.
pub fn crosses_symlink(root: &Path, relative: &Path) -> bool {
    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => return true,
            Ok(_) => {},
            Err(_) => return false,
        }
    }
    false
}
