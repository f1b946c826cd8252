//! Layered configuration for unravel.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults ([`Config::default`]).
//! 2. An optional config file (TOML, YAML or JSON, chosen by extension).
//! 3. Environment variables prefixed with `UNRAVEL_`. Nested keys are
//!    separated by a double underscore, e.g. `UNRAVEL_SELECTION__MESH=false`.
//!
//! The resulting [`Config`] is a plain value handed to the pipeline; nothing
//! reads configuration from global state.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;
pub use unravel_media::ImportSelection;

pub const ENV_PREFIX: &str = "UNRAVEL_";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_CONTAINER: &str = "Archive import";
const APPLICATION: &str = "unravel";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the content-addressed extraction cache.
    pub cache_dir: PathBuf,
    /// Name of the container archive-derived files are imported into.
    pub container: String,
    /// Which media categories to import, and whether to import them raw.
    pub selection: ImportSelection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            container: DEFAULT_CONTAINER.to_string(),
            selection: ImportSelection::default(),
        }
    }
}

impl Config {
    /// Loads configuration from defaults, `file` (if given) and the environment.
    ///
    /// An explicitly named file must exist; there is no implicit search path.
    #[instrument]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(file_provider(path)?);
        }
        let config: Config =
            figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR)).extract().or_raise(|| ErrorKind::Extract)?;
        config.validate()?;
        tracing::debug!(cache_dir = %config.cache_dir.display(), container = %config.container, "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.container.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("container name must not be empty"));
        }
        if self.cache_dir.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("cache_dir must not be empty"));
        }
        Ok(())
    }
}

fn file_provider(path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    let extension = path.extension().map(|ext| ext.to_string_lossy().to_lowercase());
    let figment = Figment::new();
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

/// The platform cache directory plus `archives`, or a directory under the
/// system temp dir when the platform has no notion of a home directory.
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.cache_dir().join("archives"))
        .unwrap_or_else(|| std::env::temp_dir().join(APPLICATION).join("archives"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn load(file: Option<&str>) -> std::result::Result<Config, figment::Error> {
        Config::load(file.map(Path::new)).map_err(|err| err.to_string().into())
    }

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = load(None)?;
            assert_eq!(config.container, "Archive import");
            assert_eq!(config.selection, ImportSelection::default());
            assert!(config.selection.raw_files);
            assert!(config.cache_dir.ends_with("archives"));
            Ok(())
        });
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "unravel.toml",
                r#"
                cache_dir = "/srv/unravel"

                [selection]
                mesh = false
                raw_files = false
                "#,
            )?;
            let config = load(Some("unravel.toml"))?;
            assert_eq!(config.cache_dir, PathBuf::from("/srv/unravel"));
            assert_eq!(config.container, "Archive import");
            assert!(!config.selection.mesh);
            assert!(!config.selection.raw_files);
            assert!(config.selection.texture);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("unravel.yaml", "container: From file\nselection:\n  audio: true\n")?;
            jail.set_env("UNRAVEL_CONTAINER", "From env");
            jail.set_env("UNRAVEL_SELECTION__AUDIO", "false");
            let config = load(Some("unravel.yaml"))?;
            assert_eq!(config.container, "From env");
            assert!(!config.selection.audio);
            Ok(())
        });
    }

    #[test]
    fn test_json_file() {
        Jail::expect_with(|jail| {
            jail.create_file("unravel.json", r#"{ "selection": { "video": false } }"#)?;
            assert!(!load(Some("unravel.json"))?.selection.video);
            Ok(())
        });
    }

    #[rstest]
    #[case::missing("absent.toml", None)]
    #[case::unknown_extension("unravel.ini", Some("cache_dir = x"))]
    #[case::wrong_type("bad.toml", Some("selection = 5"))]
    #[case::empty_container("blank.toml", Some("container = \"  \""))]
    fn test_rejected(#[case] name: &str, #[case] contents: Option<&str>) {
        Jail::expect_with(|jail| {
            if let Some(contents) = contents {
                jail.create_file(name, contents)?;
            }
            let err = Config::load(Some(Path::new(name))).unwrap_err();
            let expected = match name {
                "absent.toml" => matches!(&*err, ErrorKind::NotFound(_)),
                "unravel.ini" => matches!(&*err, ErrorKind::UnsupportedFormat(_)),
                "bad.toml" => matches!(&*err, ErrorKind::Extract),
                _ => matches!(&*err, ErrorKind::Invalid(_)),
            };
            assert!(expected, "unexpected error for {name}: {err:?}");
            Ok(())
        });
    }
}
