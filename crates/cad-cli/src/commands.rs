//! Subcommand implementations over a scene file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use cad_core::{
    LoadOutcome, MemoryTarget, PropagationReport, Scene, Session,
};
use cad_model::{Container, ViewId};
use cad_store::{ProjectLocation, SaveSummary, StoreLayout};
use tracing::info_span;

use crate::cli::{LoadArgs, ProjectArgs, PropagateArgs, SaveArgs, SceneArgs, ShowArgs};

pub fn read_scene(path: &Path) -> Result<Scene> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read scene file {}", path.display()))?;
    Scene::from_json(&text).with_context(|| format!("parse scene file {}", path.display()))
}

pub fn write_scene(path: &Path, scene: &Scene) -> Result<()> {
    let text = scene.to_json().context("serialize scene")?;
    fs::write(path, text).with_context(|| format!("write scene file {}", path.display()))
}

fn view_id(scene: &Scene, name: &str) -> Result<ViewId> {
    scene
        .view_by_name(name)
        .map(|v| v.id)
        .ok_or_else(|| anyhow!("view '{name}' not found in scene"))
}

fn project_location(args: &ProjectArgs, scene_path: &Path) -> ProjectLocation {
    let title = args.title.clone().unwrap_or_else(|| {
        args.project
            .as_deref()
            .unwrap_or(scene_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    ProjectLocation::new(args.project.clone(), title)
}

fn open_session(
    args: &SceneArgs,
    project: ProjectLocation,
    layout: StoreLayout,
) -> Result<Session<MemoryTarget>> {
    let scene = read_scene(&args.scene)?;
    let view = view_id(&scene, &args.view)?;
    let session = Session::open(MemoryTarget::new(scene), view, project, layout)
        .with_context(|| format!("open view '{}'", args.view))?;
    Ok(session)
}

/// Returns the (filtered) containers of the view.
pub fn run_show(args: &ShowArgs, layout: &StoreLayout) -> Result<Vec<Container>> {
    let mut session = open_session(
        &args.scene,
        ProjectLocation::default(),
        layout.clone(),
    )?;
    if let Some(query) = &args.query {
        session.set_query(query.as_str());
    }
    Ok(session.visible_containers().into_owned())
}

pub fn run_save(args: &SaveArgs, layout: &StoreLayout) -> Result<SaveSummary> {
    let span = info_span!("save", view = %args.scene.view);
    let _guard = span.enter();
    let project = project_location(&args.project, &args.scene.scene);
    let session = open_session(&args.scene, project, layout.clone())?;
    let summary = session.save().context("save layer settings")?;
    Ok(summary)
}

pub fn run_load(args: &LoadArgs, layout: &StoreLayout) -> Result<LoadOutcome> {
    let span = info_span!("load", view = %args.scene.view);
    let _guard = span.enter();
    let project = project_location(&args.project, &args.scene.scene);
    let mut session = open_session(&args.scene, project, layout.clone())?;
    let outcome = match &args.from {
        Some(folder) => session.load_from(folder),
        None => session.load(),
    }
    .context("load layer settings")?;
    write_scene(&args.scene.scene, session.target().scene())?;
    Ok(outcome)
}

pub fn run_propagate(args: &PropagateArgs, layout: &StoreLayout) -> Result<PropagationReport> {
    let span = info_span!("propagate", view = %args.scene.view);
    let _guard = span.enter();
    let mut session = open_session(
        &args.scene,
        ProjectLocation::default(),
        layout.clone(),
    )?;
    let views = args
        .to
        .iter()
        .map(|name| view_id(session.target().scene(), name))
        .collect::<Result<Vec<_>>>()?;
    let report = session.propagate(&views).context("apply to views")?;
    write_scene(&args.scene.scene, session.target().scene())?;
    Ok(report)
}
