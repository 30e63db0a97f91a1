//! Hierarchy loading.

use std::fs;
use std::path::{Path, PathBuf};

use cad_model::Hierarchy;

use crate::error::{Result, StoreError};
use crate::layout::StoreLayout;
use crate::record::ContainerRecord;

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub folder: PathBuf,
    pub containers_loaded: usize,
    /// Containers with no record file in the folder.
    pub containers_skipped: usize,
    pub sub_items_updated: usize,
    pub values_ignored: usize,
}

/// Loads saved state into `hierarchy` from `folder`.
///
/// All record files are read and applied to a staged copy first; the
/// hierarchy is only replaced once every file has loaded, so on error it is
/// left exactly as it was.
pub fn load_hierarchy(
    layout: &StoreLayout,
    folder: &Path,
    hierarchy: &mut Hierarchy,
) -> Result<LoadSummary> {
    if !folder.is_dir() {
        return Err(StoreError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }

    let mut staged = hierarchy.clone();
    let mut summary = LoadSummary {
        folder: folder.to_path_buf(),
        ..LoadSummary::default()
    };

    for container in staged.containers_mut() {
        let path = layout.record_path(folder, &container.name);
        if !path.is_file() {
            summary.containers_skipped += 1;
            continue;
        }
        let record = read_record(&path)?;
        let counts = record.apply_to(container);
        summary.containers_loaded += 1;
        summary.sub_items_updated += counts.sub_items_updated;
        summary.values_ignored += counts.values_ignored;
    }

    if summary.containers_loaded == 0 && !staged.is_empty() {
        return Err(StoreError::NoMatchingRecords {
            path: folder.to_path_buf(),
        });
    }

    staged.sort();
    *hierarchy = staged;

    tracing::info!(
        folder = %folder.display(),
        loaded = summary.containers_loaded,
        skipped = summary.containers_skipped,
        "Loaded layer settings"
    );
    Ok(summary)
}

fn read_record(path: &Path) -> Result<ContainerRecord> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
