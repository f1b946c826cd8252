use crate::MediaCategory;
use serde::{Deserialize, Serialize};

/// Which media categories to import, plus how to import them.
///
/// Every flag defaults to `true`, including `raw_files`. Missing keys in a
/// config file fall back to those defaults individually.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSelection {
    pub text: bool,
    pub texture: bool,
    pub document: bool,
    pub mesh: bool,
    pub point_cloud: bool,
    pub audio: bool,
    pub font: bool,
    pub video: bool,
    /// Import files as raw binary assets rather than converting them.
    pub raw_files: bool,
}

impl ImportSelection {
    /// A selection with every category switched off.
    pub fn none() -> Self {
        Self {
            text: false,
            texture: false,
            document: false,
            mesh: false,
            point_cloud: false,
            audio: false,
            font: false,
            video: false,
            raw_files: false,
        }
    }

    /// Whether files of `category` should be imported. [`MediaCategory::Other`]
    /// is never enabled.
    pub fn is_enabled(&self, category: MediaCategory) -> bool {
        match category {
            MediaCategory::Text => self.text,
            MediaCategory::Texture => self.texture,
            MediaCategory::Document => self.document,
            MediaCategory::Mesh => self.mesh,
            MediaCategory::PointCloud => self.point_cloud,
            MediaCategory::Audio => self.audio,
            MediaCategory::Font => self.font,
            MediaCategory::Video => self.video,
            MediaCategory::Other => false,
        }
    }

    /// Switches a single category on or off. Setting [`MediaCategory::Other`]
    /// has no effect.
    #[must_use]
    pub fn with(mut self, category: MediaCategory, enabled: bool) -> Self {
        let flag = match category {
            MediaCategory::Text => &mut self.text,
            MediaCategory::Texture => &mut self.texture,
            MediaCategory::Document => &mut self.document,
            MediaCategory::Mesh => &mut self.mesh,
            MediaCategory::PointCloud => &mut self.point_cloud,
            MediaCategory::Audio => &mut self.audio,
            MediaCategory::Font => &mut self.font,
            MediaCategory::Video => &mut self.video,
            MediaCategory::Other => return self,
        };
        *flag = enabled;
        self
    }
}

impl Default for ImportSelection {
    fn default() -> Self {
        Self {
            text: true,
            texture: true,
            document: true,
            mesh: true,
            point_cloud: true,
            audio: true,
            font: true,
            video: true,
            raw_files: true,
        }
    }
}
