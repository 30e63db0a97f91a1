//! Locating a folder that holds records for the current hierarchy.

use std::fs;
use std::path::{Path, PathBuf};

use cad_model::Hierarchy;

use crate::error::{Result, StoreError};
use crate::layout::StoreLayout;

/// Whether `folder` holds a record for at least one container.
pub fn folder_matches(layout: &StoreLayout, folder: &Path, hierarchy: &Hierarchy) -> bool {
    hierarchy
        .containers()
        .iter()
        .any(|c| layout.record_path(folder, &c.name).is_file())
}

/// Checks `base`, then its immediate subfolders in name order, returning the
/// first that matches. A missing `base` yields `None`.
pub fn find_matching_folder(
    layout: &StoreLayout,
    base: &Path,
    hierarchy: &Hierarchy,
) -> Result<Option<PathBuf>> {
    if !base.is_dir() {
        return Ok(None);
    }
    if folder_matches(layout, base, hierarchy) {
        return Ok(Some(base.to_path_buf()));
    }

    let entries = fs::read_dir(base).map_err(|e| StoreError::Io {
        operation: "list",
        path: base.to_path_buf(),
        source: e,
    })?;
    let mut subfolders: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subfolders.sort();

    let found = subfolders
        .into_iter()
        .find(|folder| folder_matches(layout, folder, hierarchy));
    if let Some(folder) = &found {
        tracing::debug!("Matched saved template folder {}", folder.display());
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad_model::{Container, ExternalId};
    use tempfile::tempdir;

    fn site() -> Hierarchy {
        Hierarchy::new(vec![Container::new(ExternalId::from_raw(1), "Site.dwg")])
    }

    #[test]
    fn one_matching_file_is_enough() {
        let dir = tempdir().unwrap();
        let layout = StoreLayout::default();
        assert!(!folder_matches(&layout, dir.path(), &site()));
        fs::write(dir.path().join("Site.dwg.json"), "{}").unwrap();
        assert!(folder_matches(&layout, dir.path(), &site()));
    }

    #[test]
    fn searches_subfolders_in_order() {
        let dir = tempdir().unwrap();
        let layout = StoreLayout::default();
        for name in ["b-template", "a-other", "c-template"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("b-template").join("Site.dwg.json"), "{}").unwrap();
        fs::write(dir.path().join("c-template").join("Site.dwg.json"), "{}").unwrap();

        let found = find_matching_folder(&layout, dir.path(), &site()).unwrap();
        assert_eq!(found, Some(dir.path().join("b-template")));
    }

    #[test]
    fn missing_base_is_not_an_error() {
        let dir = tempdir().unwrap();
        let found =
            find_matching_folder(&StoreLayout::default(), &dir.path().join("nope"), &site())
                .unwrap();
        assert_eq!(found, None);
    }
}
