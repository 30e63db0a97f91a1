//! End-to-end runs of the subcommands against a scene file.

use std::fs;
use std::path::{Path, PathBuf};

use cad_cli::cli::{LoadArgs, ProjectArgs, PropagateArgs, SaveArgs, SceneArgs, ShowArgs};
use cad_cli::commands::{read_scene, run_load, run_propagate, run_save, run_show, write_scene};
use cad_cli::summary::hierarchy_table;
use cad_core::CoreError;
use cad_model::{ExternalId, OverrideRecord, Rgb, ViewId};
use cad_store::StoreLayout;
use tempfile::tempdir;

const SCENE: &str = r##"{
  "views": [
    {"id": 1, "name": "Level 1", "template": 9},
    {"id": 2, "name": "Level 2"},
    {"id": 9, "name": "Plan Template", "categories": [
      {"id": 102, "hidden": true, "overrides": {"lineColor": {"red": 255, "green": 0, "blue": 0, "isValid": true}}}
    ]}
  ],
  "containers": [
    {"id": 100, "name": "Site Plan", "subItems": [{"id": 101, "name": "0"}, {"id": 102, "name": "Grid"}]},
    {"id": 200, "name": "Floor Plan", "subItems": [{"id": 201, "name": "0"}, {"id": 202, "name": "Doors"}]}
  ],
  "linePatterns": [{"id": 7, "name": "Dashed"}]
}"##;

fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("scene.json");
    fs::write(&path, SCENE).unwrap();
    path
}

fn scene_args(scene: &Path, view: &str) -> SceneArgs {
    SceneArgs {
        scene: scene.to_path_buf(),
        view: view.to_string(),
    }
}

fn project_args(dir: &Path) -> ProjectArgs {
    ProjectArgs {
        project: Some(dir.join("tower.rvt")),
        title: None,
    }
}

fn record(scene: &Path, view: u64, id: u64) -> Option<(bool, OverrideRecord)> {
    let scene = read_scene(scene).unwrap();
    scene
        .category(ViewId::from_raw(view), ExternalId::from_raw(id))
        .map(|c| (c.hidden, c.overrides.clone()))
}

#[test]
fn show_filters_by_query() {
    let dir = tempdir().unwrap();
    let scene = write_fixture(dir.path());
    let args = ShowArgs {
        scene: scene_args(&scene, "level 1"),
        query: Some("grid".into()),
    };
    let containers = run_show(&args, &StoreLayout::default()).unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].sub_items.len(), 1);
    assert!(!containers[0].sub_items[0].visible);

    let table = hierarchy_table(&containers).to_string();
    assert!(table.contains("Site Plan"));
    assert!(table.contains("#FF0000"));
    assert!(!table.contains("Doors"));
}

#[test]
fn save_writes_one_file_per_drawing() {
    let dir = tempdir().unwrap();
    let scene = write_fixture(dir.path());
    let args = SaveArgs {
        scene: scene_args(&scene, "Level 1"),
        project: project_args(dir.path()),
    };
    let summary = run_save(&args, &StoreLayout::default()).unwrap();
    assert_eq!(summary.files_written, 2);

    let saved = fs::read_to_string(dir.path().join("LayerToggles").join("Site Plan.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value["subitems"]["Grid"]["visible"], false);
    assert_eq!(value["subitems"]["Grid"]["lineColor"], "#FF0000");
}

#[test]
fn load_applies_saved_state_and_rewrites_scene() {
    let dir = tempdir().unwrap();
    let scene = write_fixture(dir.path());
    let saved = dir.path().join("saved");
    fs::create_dir(&saved).unwrap();
    fs::write(
        saved.join("Floor Plan.json"),
        r##"{"visible": true, "subitems": {"Doors": {"visible": false, "lineColor": "#00FF00", "linePattern": "dashed"}}}"##,
    )
    .unwrap();

    let args = LoadArgs {
        scene: scene_args(&scene, "Level 1"),
        project: project_args(dir.path()),
        from: Some(saved),
    };
    let outcome = run_load(&args, &StoreLayout::default()).unwrap();
    assert_eq!(outcome.store.containers_loaded, 1);
    assert_eq!(outcome.store.containers_skipped, 1);

    let (hidden, overrides) = record(&scene, 9, 202).unwrap();
    assert!(hidden);
    assert_eq!(overrides.effective_color(), Some(Rgb::new(0, 255, 0)));
    assert!(overrides.line_pattern.is_some());
    assert!(record(&scene, 1, 202).is_none());
}

#[test]
fn load_without_saved_folder_reports_store_error() {
    let dir = tempdir().unwrap();
    let scene = write_fixture(dir.path());
    let before = fs::read_to_string(&scene).unwrap();
    let args = LoadArgs {
        scene: scene_args(&scene, "Level 1"),
        project: project_args(dir.path()),
        from: None,
    };
    let err = run_load(&args, &StoreLayout::default()).unwrap_err();
    let core = err.downcast_ref::<CoreError>().unwrap();
    assert!(core.suggestion().is_some());
    assert_eq!(fs::read_to_string(&scene).unwrap(), before);
}

#[test]
fn propagate_copies_to_other_views() {
    let dir = tempdir().unwrap();
    let scene = write_fixture(dir.path());
    let args = PropagateArgs {
        scene: scene_args(&scene, "Level 1"),
        to: vec!["Level 2".into()],
    };
    let report = run_propagate(&args, &StoreLayout::default()).unwrap();
    assert!(report.views[0].not_found.is_empty());
    insta::assert_snapshot!(report.to_string(), @r"
    Applied settings from 'Level 1':

    Level 2:
      Applied: Site Plan, Floor Plan
    ");

    let (hidden, overrides) = record(&scene, 2, 102).unwrap();
    assert!(hidden);
    assert_eq!(overrides.effective_color(), Some(Rgb::new(255, 0, 0)));
}

#[test]
fn unknown_view_is_rejected() {
    let dir = tempdir().unwrap();
    let scene = write_fixture(dir.path());
    let args = PropagateArgs {
        scene: scene_args(&scene, "Level 1"),
        to: vec!["Roof".into()],
    };
    let err = run_propagate(&args, &StoreLayout::default()).unwrap_err();
    assert!(err.to_string().contains("Roof"));
}

#[test]
fn scene_survives_rewrite() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path());
    let scene = read_scene(&path).unwrap();
    write_scene(&path, &scene).unwrap();
    assert_eq!(read_scene(&path).unwrap(), scene);
}
