//! Settings file: store layout and logging defaults.
//!
//! Read from `settings.toml` in the platform config folder unless a path is
//! given. A missing or unreadable file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use cad_store::StoreLayout;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "cad-manager";
const APP_NAME: &str = "CAD Manager";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreLayout,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: Option<LogFormat>,
}

/// Where the settings came from. Logging is not set up while settings are
/// read, so the outcome is reported afterwards through [`LoadedSettings::log`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    File(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, reason: String },
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: SettingsSource,
}

impl LoadedSettings {
    pub fn log(&self) {
        match &self.source {
            SettingsSource::File(path) => tracing::info!("Loaded settings from {}", path.display()),
            SettingsSource::Missing(path) => {
                tracing::debug!("No settings file at {}, using defaults", path.display());
            }
            SettingsSource::Invalid { path, reason } => tracing::warn!(
                "Failed to read settings file {}: {}, using defaults",
                path.display(),
                reason
            ),
            SettingsSource::NoConfigDir => {
                tracing::warn!("Could not determine settings path, using defaults");
            }
        }
    }
}

/// Default location of the settings file.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Reads settings from `explicit`, or from the default location.
pub fn load_settings(explicit: Option<&Path>) -> LoadedSettings {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_path() {
            Some(path) => path,
            None => {
                return LoadedSettings {
                    settings: Settings::default(),
                    source: SettingsSource::NoConfigDir,
                };
            }
        },
    };
    read_settings(path)
}

fn read_settings(path: PathBuf) -> LoadedSettings {
    let defaults = |source| LoadedSettings {
        settings: Settings::default(),
        source,
    };
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => LoadedSettings {
                settings,
                source: SettingsSource::File(path),
            },
            Err(e) => defaults(SettingsSource::Invalid {
                path,
                reason: e.to_string(),
            }),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => defaults(SettingsSource::Missing(path)),
        Err(e) => defaults(SettingsSource::Invalid {
            path,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[store]\nfolder_name = \"Toggles\"\n\n[logging]\nformat = \"json\"\n").unwrap();

        let loaded = load_settings(Some(&path));
        assert_eq!(loaded.source, SettingsSource::File(path));
        assert_eq!(loaded.settings.store.folder_name, "Toggles");
        assert_eq!(loaded.settings.store.extension, "json");
        assert_eq!(loaded.settings.logging.format, Some(LogFormat::Json));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "store = 3").unwrap();

        let loaded = load_settings(Some(&path));
        assert!(matches!(loaded.source, SettingsSource::Invalid { .. }));
        assert_eq!(loaded.settings, Settings::default());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let loaded = load_settings(Some(&dir.path().join("none.toml")));
        assert!(matches!(loaded.source, SettingsSource::Missing(_)));
    }
}
