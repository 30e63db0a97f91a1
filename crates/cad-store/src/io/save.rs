//! Hierarchy saving.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use cad_model::Hierarchy;

use crate::error::{Result, StoreError};
use crate::layout::StoreLayout;
use crate::record::ContainerRecord;

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub folder: PathBuf,
    pub files_written: usize,
}

/// Writes one record file per container into `folder`.
///
/// Existing files for the same containers are replaced; files for containers
/// not in the hierarchy are left alone.
pub fn save_hierarchy(
    layout: &StoreLayout,
    folder: &Path,
    hierarchy: &Hierarchy,
) -> Result<SaveSummary> {
    fs::create_dir_all(folder).map_err(|e| StoreError::Io {
        operation: "create directory",
        path: folder.to_path_buf(),
        source: e,
    })?;

    let mut files_written = 0;
    for container in hierarchy.containers() {
        let record = ContainerRecord::from_container(container);
        let bytes =
            serde_json::to_vec_pretty(&record).map_err(|e| StoreError::Serialization {
                container: container.name.clone(),
                source: e,
            })?;
        let path = layout.record_path(folder, &container.name);
        write_atomic(&path, &bytes, &layout.extension)?;
        files_written += 1;
    }

    tracing::info!(
        folder = %folder.display(),
        files = files_written,
        "Saved layer settings"
    );
    Ok(SaveSummary {
        folder: folder.to_path_buf(),
        files_written,
    })
}

/// Temp file + rename so a crash never leaves a truncated record behind.
fn write_atomic(path: &Path, bytes: &[u8], extension: &str) -> Result<()> {
    let temp_path = path.with_extension(format!("{extension}.tmp"));

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
