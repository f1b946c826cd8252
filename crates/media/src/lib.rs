//! Media classification for extracted archive contents.
//!
//! Every file is assigned exactly one [`MediaCategory`] from its extension.
//! An [`ImportSelection`] says which categories the user wants imported, and
//! [`should_include`] combines the two (with a couple of overrides) into the
//! yes/no decision the import pipeline needs.

mod classify;
pub mod error;
mod filter;
mod selection;

pub use crate::classify::{Classifier, ExtensionTable, extension_of};
pub use crate::filter::{MARKUP_FALSE_POSITIVES, select_files, should_include, walk_files};
pub use crate::selection::ImportSelection;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type ClassifierHandle = Arc<dyn Classifier>;

/// What kind of asset a file is, judged by extension alone.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    #[display("text")]
    Text,
    #[display("texture")]
    Texture,
    #[display("document")]
    Document,
    #[display("mesh")]
    Mesh,
    #[display("point cloud")]
    PointCloud,
    #[display("audio")]
    Audio,
    #[display("font")]
    Font,
    #[display("video")]
    Video,
    /// Unrecognised extension. Never imported.
    #[display("other")]
    Other,
}

impl MediaCategory {
    /// Every category a user can opt in to.
    pub const SELECTABLE: &'static [MediaCategory] = &[
        MediaCategory::Text,
        MediaCategory::Texture,
        MediaCategory::Document,
        MediaCategory::Mesh,
        MediaCategory::PointCloud,
        MediaCategory::Audio,
        MediaCategory::Font,
        MediaCategory::Video,
    ];
}
