#![allow(dead_code)]

use cad_core::{
    CategoryState, MemoryTarget, Scene, SceneContainer, ScenePattern, SceneSubItem, SceneView,
    Session,
};
use cad_model::{ExternalId, OverrideRecord, PatternId, ViewId};
use cad_store::{ProjectLocation, StoreLayout};

pub const LEVEL_1: ViewId = ViewId::from_raw(1);
pub const LEVEL_2: ViewId = ViewId::from_raw(2);
pub const LEVEL_3: ViewId = ViewId::from_raw(3);
pub const TEMPLATE: ViewId = ViewId::from_raw(9);

pub const SITE: ExternalId = ExternalId::from_raw(100);
pub const SITE_ZERO: ExternalId = ExternalId::from_raw(101);
pub const SITE_GRID: ExternalId = ExternalId::from_raw(102);
pub const FLOOR: ExternalId = ExternalId::from_raw(200);
pub const FLOOR_ZERO: ExternalId = ExternalId::from_raw(201);
pub const FLOOR_DOORS: ExternalId = ExternalId::from_raw(202);

pub const DASHED: PatternId = PatternId::from_raw(7);
pub const DOT: PatternId = PatternId::from_raw(8);

fn view(id: ViewId, name: &str, template: Option<ViewId>) -> SceneView {
    SceneView {
        id,
        name: name.into(),
        template,
        scope: None,
        categories: Vec::new(),
    }
}

fn sub(id: ExternalId, name: &str) -> SceneSubItem {
    SceneSubItem {
        id,
        name: name.into(),
    }
}

/// Level 1 is governed by a template; Level 3 only shows the site plan.
pub fn scene() -> Scene {
    let mut level_3 = view(LEVEL_3, "Level 3", None);
    level_3.scope = Some(vec![SITE]);
    Scene {
        views: vec![
            view(LEVEL_1, "Level 1", Some(TEMPLATE)),
            view(LEVEL_2, "Level 2", None),
            level_3,
            view(TEMPLATE, "Plan Template", None),
        ],
        containers: vec![
            SceneContainer {
                id: SITE,
                name: "Site Plan".into(),
                sub_items: vec![sub(SITE_ZERO, "0"), sub(SITE_GRID, "Grid")],
            },
            SceneContainer {
                id: FLOOR,
                name: "Floor Plan".into(),
                sub_items: vec![sub(FLOOR_ZERO, "0"), sub(FLOOR_DOORS, "Doors")],
            },
        ],
        line_patterns: vec![
            ScenePattern {
                id: DASHED,
                name: "Dashed".into(),
            },
            ScenePattern {
                id: DOT,
                name: "Dot".into(),
            },
        ],
        locked: Vec::new(),
        locked_overrides: Vec::new(),
    }
}

/// Seeds per-view state directly, bypassing transactions.
pub fn set_state(scene: &mut Scene, view: ViewId, id: ExternalId, hidden: bool, overrides: OverrideRecord) {
    if let Some(v) = scene.views.iter_mut().find(|v| v.id == view) {
        v.categories.retain(|c| c.id != id);
        v.categories.push(CategoryState {
            id,
            hidden,
            overrides,
        });
    }
}

pub fn record(target: &MemoryTarget, view: ViewId, id: ExternalId) -> OverrideRecord {
    target
        .scene()
        .category(view, id)
        .map(|c| c.overrides.clone())
        .unwrap_or_default()
}

pub fn hidden(target: &MemoryTarget, view: ViewId, id: ExternalId) -> bool {
    target.scene().category(view, id).is_some_and(|c| c.hidden)
}

pub fn open(scene: Scene) -> Session<MemoryTarget> {
    open_in(scene, ProjectLocation::new(None, "Tower"))
}

pub fn open_in(scene: Scene, project: ProjectLocation) -> Session<MemoryTarget> {
    Session::open(
        MemoryTarget::new(scene),
        LEVEL_1,
        project,
        StoreLayout::default(),
    )
    .unwrap()
}
