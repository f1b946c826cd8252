use crate::MediaCategory;
use std::collections::HashMap;
use std::path::Path;

/// Maps a file extension to a media category.
///
/// Extensions are passed lowercase and without the leading dot; an empty
/// string means the file has no extension. Implementations must be pure.
pub trait Classifier: Send + Sync {
    fn classify(&self, extension: &str) -> MediaCategory;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> MediaCategory + Send + Sync,
{
    fn classify(&self, extension: &str) -> MediaCategory {
        self(extension)
    }
}

/// Lowercased final extension of a path, without the dot.
///
/// ```
/// use unravel_media::extension_of;
///
/// assert_eq!(extension_of("Textures/Wood.PNG"), "png");
/// assert_eq!(extension_of("bundle.tar.gz"), "gz");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
#[must_use]
pub fn extension_of(path: impl AsRef<Path>) -> String {
    path.as_ref().extension().map(|ext| ext.to_string_lossy().to_lowercase()).unwrap_or_default()
}

#[rustfmt::skip]
const DEFAULT_EXTENSIONS: &[(MediaCategory, &[&str])] = &[
    (MediaCategory::Text, &["txt", "md", "json", "csv", "log", "ini", "yaml", "yml", "toml"]),
    (MediaCategory::Texture, &[
        "png", "jpg", "jpeg", "bmp", "gif", "tga", "tif", "tiff", "webp", "exr", "hdr", "psd", "dds", "ktx",
    ]),
    (MediaCategory::Document, &["pdf"]),
    (MediaCategory::Mesh, &[
        "fbx", "obj", "gltf", "glb", "dae", "3ds", "blend", "stl", "ply", "x", "xml", "dxf", "lwo", "ms3d", "off",
        "3mf",
    ]),
    (MediaCategory::PointCloud, &["pts", "xyz", "las", "laz", "e57"]),
    (MediaCategory::Audio, &["wav", "mp3", "ogg", "flac", "opus", "aiff", "aif", "m4a", "wma"]),
    (MediaCategory::Font, &["ttf", "otf", "woff", "woff2"]),
    (MediaCategory::Video, &["mp4", "mkv", "webm", "mov", "avi", "m4v", "flv", "wmv"]),
];

/// Lookup table classifier.
///
/// The default table covers the common asset formats. Note that `xml` is
/// listed as a mesh format because some model loaders accept XML scenes;
/// [`should_include`](crate::should_include) carves it back out.
#[derive(Clone, Debug)]
pub struct ExtensionTable {
    map: HashMap<String, MediaCategory>,
}

impl ExtensionTable {
    /// A table that classifies everything as [`MediaCategory::Other`].
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    /// Adds or replaces a mapping. Leading dots and case are ignored.
    #[must_use]
    pub fn with(mut self, extension: &str, category: MediaCategory) -> Self {
        self.insert(extension, category);
        self
    }

    pub fn insert(&mut self, extension: &str, category: MediaCategory) {
        self.map.insert(normalize(extension), category);
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        let map = DEFAULT_EXTENSIONS
            .iter()
            .flat_map(|(category, extensions)| extensions.iter().map(|ext| (ext.to_string(), *category)))
            .collect();
        Self { map }
    }
}

impl Classifier for ExtensionTable {
    fn classify(&self, extension: &str) -> MediaCategory {
        self.map.get(&normalize(extension)).copied().unwrap_or(MediaCategory::Other)
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("png", MediaCategory::Texture)]
    #[case("PNG", MediaCategory::Texture)]
    #[case(".wav", MediaCategory::Audio)]
    #[case("txt", MediaCategory::Text)]
    #[case("pdf", MediaCategory::Document)]
    #[case("fbx", MediaCategory::Mesh)]
    #[case("xml", MediaCategory::Mesh)]
    #[case("xyz", MediaCategory::PointCloud)]
    #[case("ttf", MediaCategory::Font)]
    #[case("mp4", MediaCategory::Video)]
    #[case("exe", MediaCategory::Other)]
    #[case("", MediaCategory::Other)]
    fn test_default_table(#[case] extension: &str, #[case] expected: MediaCategory) {
        assert_eq!(ExtensionTable::default().classify(extension), expected);
    }

    #[test]
    fn test_default_table_has_no_duplicates() {
        let total: usize = DEFAULT_EXTENSIONS.iter().map(|(_, extensions)| extensions.len()).sum();
        assert_eq!(ExtensionTable::default().map.len(), total);
    }

    #[test]
    fn test_overrides() {
        let table = ExtensionTable::default().with(".PLY", MediaCategory::PointCloud);
        assert_eq!(table.classify("ply"), MediaCategory::PointCloud);
        assert_eq!(ExtensionTable::empty().classify("png"), MediaCategory::Other);
    }

    #[test]
    fn test_closure_classifier() {
        let everything_is_text = |_: &str| MediaCategory::Text;
        assert_eq!(everything_is_text.classify("bin"), MediaCategory::Text);
    }
}
