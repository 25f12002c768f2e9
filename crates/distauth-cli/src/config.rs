//! # Settings
//!
//! Where the input files live and how parent references are linked. Values
//! come from built-in defaults, then an optional YAML file (`--config`),
//! then command-line overrides, in that order of increasing precedence.
//!
//! ```yaml
//! cities: data/cities.csv
//! distributors: data/distributors.csv
//! parent_linking: two-pass   # or: ordered
//! ```
//!
//! Relative paths in the file are resolved against the file's own
//! directory, so a settings file can sit next to its data.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use distauth_engine::ParentLinking;

use crate::resolve_path;

/// Default city records file, relative to the working directory.
pub const DEFAULT_CITIES_FILE: &str = "cities.csv";

/// Default distributor records file, relative to the working directory.
pub const DEFAULT_DISTRIBUTORS_FILE: &str = "distributors.csv";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// City records (CSV).
    pub cities: PathBuf,
    /// Distributor records (CSV).
    pub distributors: PathBuf,
    /// Parent linking mode for the distributor registry.
    pub parent_linking: ParentLinking,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cities: PathBuf::from(DEFAULT_CITIES_FILE),
            distributors: PathBuf::from(DEFAULT_DISTRIBUTORS_FILE),
            parent_linking: ParentLinking::default(),
        }
    }
}

impl Settings {
    /// Defaults, or the given settings file if one is named.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        match config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Read a YAML settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;
        let mut settings: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("invalid settings file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        settings.cities = resolve_path(&settings.cities, base);
        settings.distributors = resolve_path(&settings.distributors, base);

        tracing::debug!(path = %path.display(), ?settings, "loaded settings file");
        Ok(settings)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, cities: Option<PathBuf>, distributors: Option<PathBuf>) -> Self {
        if let Some(cities) = cities {
            self.cities = cities;
        }
        if let Some(distributors) = distributors {
            self.distributors = distributors;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_file_names() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.cities, PathBuf::from("cities.csv"));
        assert_eq!(settings.distributors, PathBuf::from("distributors.csv"));
        assert_eq!(settings.parent_linking, ParentLinking::TwoPass);
    }

    #[test]
    fn file_paths_resolve_against_settings_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distauth.yaml");
        std::fs::write(
            &path,
            "cities: data/cities.csv\ndistributors: /abs/distributors.csv\nparent_linking: ordered\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.cities, dir.path().join("data/cities.csv"));
        assert_eq!(settings.distributors, PathBuf::from("/abs/distributors.csv"));
        assert_eq!(settings.parent_linking, ParentLinking::Ordered);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distauth.yaml");
        std::fs::write(&path, "parent_linking: ordered\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.cities, dir.path().join("cities.csv"));
        assert_eq!(settings.parent_linking, ParentLinking::Ordered);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distauth.yaml");
        std::fs::write(&path, "citys: cities.csv\n").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid settings file"));
    }

    #[test]
    fn unknown_linking_mode_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distauth.yaml");
        std::fs::write(&path, "parent_linking: whenever\n").unwrap();
        assert!(Settings::from_file(&path).is_err());
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read settings file"));
    }

    #[test]
    fn overrides_replace_only_given_paths() {
        let settings = Settings::default().with_overrides(Some(PathBuf::from("x.csv")), None);
        assert_eq!(settings.cities, PathBuf::from("x.csv"));
        assert_eq!(settings.distributors, PathBuf::from("distributors.csv"));
    }
}
