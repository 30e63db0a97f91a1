//! Where record files live and what they are called.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Characters that are not allowed in file names on at least one platform.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces reserved and control characters with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Naming of the save folder and the per-user fallback location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLayout {
    /// Folder created next to the project file.
    pub folder_name: String,
    /// Record file extension, without the dot.
    pub extension: String,
    pub qualifier: String,
    pub organization: String,
    pub application: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            folder_name: "LayerToggles".to_string(),
            extension: "json".to_string(),
            qualifier: "com".to_string(),
            organization: "cad-manager".to_string(),
            application: "CAD Manager".to_string(),
        }
    }
}

/// The project a hierarchy belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectLocation {
    /// Path of the project file, if it has been saved.
    pub path: Option<PathBuf>,
    pub title: String,
}

impl ProjectLocation {
    pub fn new(path: Option<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path,
            title: title.into(),
        }
    }
}

impl StoreLayout {
    /// File name of the record for a container.
    pub fn record_file_name(&self, container_name: &str) -> String {
        let stem = sanitize_file_name(&cad_model::normalize_name(container_name));
        format!("{stem}.{}", self.extension)
    }

    pub fn record_path(&self, folder: &Path, container_name: &str) -> PathBuf {
        folder.join(self.record_file_name(container_name))
    }

    /// `<project dir>/<folder_name>`, for projects saved to disk.
    pub fn project_folder(&self, project: &ProjectLocation) -> Option<PathBuf> {
        let parent = project.path.as_deref()?.parent()?;
        if parent.as_os_str().is_empty() {
            return None;
        }
        Some(parent.join(&self.folder_name))
    }

    /// Per-user data folder keyed by the project title.
    pub fn fallback_folder(&self, project: &ProjectLocation) -> Result<PathBuf> {
        let dirs = ProjectDirs::from(&self.qualifier, &self.organization, &self.application)
            .ok_or_else(|| StoreError::NoSaveFolder {
                project: project.title.clone(),
            })?;
        Ok(dirs
            .data_dir()
            .join(&self.folder_name)
            .join(sanitize_file_name(&project.title)))
    }

    /// Project folder when available, otherwise the per-user fallback.
    pub fn save_folder(&self, project: &ProjectLocation) -> Result<PathBuf> {
        match self.project_folder(project) {
            Some(folder) => Ok(folder),
            None => self.fallback_folder(project),
        }
    }
}
