//! An in-memory rendering target backed by a serializable scene.

use cad_model::{ExternalId, OverrideRecord, PatternId, ViewId, names_equal};
use serde::{Deserialize, Serialize};

use crate::error::{TargetError, TargetResult};
use crate::target::{ContainerInfo, RenderTarget, SubItemInfo};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub views: Vec<SceneView>,
    #[serde(default)]
    pub containers: Vec<SceneContainer>,
    #[serde(default)]
    pub line_patterns: Vec<ScenePattern>,
    /// Objects that reject writes.
    #[serde(default)]
    pub locked: Vec<ExternalId>,
    /// Objects whose override records reject writes; their visibility can
    /// still change.
    #[serde(default)]
    pub locked_overrides: Vec<ExternalId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneView {
    pub id: ViewId,
    pub name: String,
    #[serde(default)]
    pub template: Option<ViewId>,
    /// Containers shown in this view; `None` shows all of them.
    #[serde(default)]
    pub scope: Option<Vec<ExternalId>>,
    #[serde(default)]
    pub categories: Vec<CategoryState>,
}

/// Per-view state of one container or sub-item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryState {
    pub id: ExternalId,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub overrides: OverrideRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneContainer {
    pub id: ExternalId,
    pub name: String,
    #[serde(default)]
    pub sub_items: Vec<SceneSubItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSubItem {
    pub id: ExternalId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePattern {
    pub id: PatternId,
    pub name: String,
}

impl Scene {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn view(&self, id: ViewId) -> Option<&SceneView> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn view_by_name(&self, name: &str) -> Option<&SceneView> {
        self.views.iter().find(|v| names_equal(&v.name, name))
    }

    /// Stored state of `id` in `view`, if any was ever written.
    pub fn category(&self, view: ViewId, id: ExternalId) -> Option<&CategoryState> {
        self.view(view)?.categories.iter().find(|c| c.id == id)
    }

    fn object_exists(&self, id: ExternalId) -> bool {
        self.containers
            .iter()
            .any(|c| c.id == id || c.sub_items.iter().any(|s| s.id == id))
    }
}

/// [`RenderTarget`] over a [`Scene`]. Transactions snapshot the scene and
/// restore the snapshot on rollback.
#[derive(Debug, Clone, Default)]
pub struct MemoryTarget {
    scene: Scene,
    snapshot: Option<Scene>,
    fail_after_writes: Option<usize>,
    writes: usize,
    commits: usize,
}

impl MemoryTarget {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Makes every write after the first `writes` ones fail with a
    /// non-recoverable error.
    pub fn fail_after_writes(&mut self, writes: usize) {
        self.fail_after_writes = Some(writes);
        self.writes = 0;
    }

    fn view(&self, view: ViewId) -> TargetResult<&SceneView> {
        self.scene.view(view).ok_or(TargetError::ViewNotFound { view })
    }

    fn check_object(&self, id: ExternalId) -> TargetResult<()> {
        if self.scene.object_exists(id) {
            Ok(())
        } else {
            Err(TargetError::NotFound { id })
        }
    }

    fn category_mut(&mut self, view: ViewId, id: ExternalId) -> TargetResult<&mut CategoryState> {
        if self.snapshot.is_none() {
            return Err(TargetError::NoTransaction);
        }
        self.check_object(id)?;
        if self.scene.locked.contains(&id) {
            return Err(TargetError::Locked { id });
        }
        if let Some(limit) = self.fail_after_writes {
            if self.writes >= limit {
                return Err(TargetError::Failed(format!("write to {id} rejected")));
            }
            self.writes += 1;
        }
        let scene_view = self
            .scene
            .views
            .iter_mut()
            .find(|v| v.id == view)
            .ok_or(TargetError::ViewNotFound { view })?;
        let index = match scene_view.categories.iter().position(|c| c.id == id) {
            Some(index) => index,
            None => {
                scene_view.categories.push(CategoryState {
                    id,
                    hidden: false,
                    overrides: OverrideRecord::default(),
                });
                scene_view.categories.len() - 1
            }
        };
        Ok(&mut scene_view.categories[index])
    }
}

impl RenderTarget for MemoryTarget {
    fn view_name(&self, view: ViewId) -> TargetResult<String> {
        Ok(self.view(view)?.name.clone())
    }

    fn enumerate_entities(&self, view: ViewId) -> TargetResult<Vec<ContainerInfo>> {
        let scope = self.view(view)?.scope.as_ref();
        Ok(self
            .scene
            .containers
            .iter()
            .filter(|c| scope.is_none_or(|ids| ids.contains(&c.id)))
            .map(|c| ContainerInfo {
                id: c.id,
                name: c.name.clone(),
                sub_items: c
                    .sub_items
                    .iter()
                    .map(|s| SubItemInfo {
                        id: s.id,
                        name: s.name.clone(),
                    })
                    .collect(),
            })
            .collect())
    }

    fn resolve_template(&self, view: ViewId) -> TargetResult<Option<ViewId>> {
        Ok(self.view(view)?.template)
    }

    fn is_hidden(&self, view: ViewId, id: ExternalId) -> TargetResult<bool> {
        self.view(view)?;
        self.check_object(id)?;
        Ok(self.scene.category(view, id).is_some_and(|c| c.hidden))
    }

    fn set_hidden(&mut self, view: ViewId, id: ExternalId, hidden: bool) -> TargetResult<()> {
        self.category_mut(view, id)?.hidden = hidden;
        Ok(())
    }

    fn get_overrides(&self, view: ViewId, id: ExternalId) -> TargetResult<OverrideRecord> {
        self.view(view)?;
        self.check_object(id)?;
        Ok(self
            .scene
            .category(view, id)
            .map(|c| c.overrides.clone())
            .unwrap_or_default())
    }

    fn set_overrides(
        &mut self,
        view: ViewId,
        id: ExternalId,
        record: &OverrideRecord,
    ) -> TargetResult<()> {
        if self.scene.locked_overrides.contains(&id) {
            return Err(TargetError::Locked { id });
        }
        self.category_mut(view, id)?.overrides = record.clone();
        Ok(())
    }

    fn find_pattern_id_by_name(&self, name: &str) -> Option<PatternId> {
        self.scene
            .line_patterns
            .iter()
            .find(|p| names_equal(&p.name, name))
            .map(|p| p.id)
    }

    fn pattern_name(&self, id: PatternId) -> Option<String> {
        self.scene
            .line_patterns
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
    }

    fn line_patterns(&self) -> Vec<String> {
        self.scene.line_patterns.iter().map(|p| p.name.clone()).collect()
    }

    fn begin_transaction(&mut self, name: &str) -> TargetResult<()> {
        if self.snapshot.is_some() {
            return Err(TargetError::TransactionActive);
        }
        tracing::trace!(transaction = name, "memory target: begin");
        self.snapshot = Some(self.scene.clone());
        Ok(())
    }

    fn commit_transaction(&mut self) -> TargetResult<()> {
        if self.snapshot.take().is_none() {
            return Err(TargetError::NoTransaction);
        }
        self.commits += 1;
        Ok(())
    }

    fn rollback_transaction(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.scene = snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene {
            views: vec![SceneView {
                id: ViewId::from_raw(1),
                name: "Level 1".into(),
                template: None,
                scope: None,
                categories: Vec::new(),
            }],
            containers: vec![SceneContainer {
                id: ExternalId::from_raw(100),
                name: "Site.dwg".into(),
                sub_items: vec![SceneSubItem {
                    id: ExternalId::from_raw(101),
                    name: "Grid".into(),
                }],
            }],
            line_patterns: vec![ScenePattern {
                id: PatternId::from_raw(7),
                name: "Dashed".into(),
            }],
            locked: vec![ExternalId::from_raw(101)],
            locked_overrides: Vec::new(),
        }
    }

    #[test]
    fn writes_require_a_transaction() {
        let mut target = MemoryTarget::new(scene());
        let err = target
            .set_hidden(ViewId::from_raw(1), ExternalId::from_raw(100), true)
            .unwrap_err();
        assert_eq!(err, TargetError::NoTransaction);
    }

    #[test]
    fn rollback_restores_snapshot() {
        let mut target = MemoryTarget::new(scene());
        let view = ViewId::from_raw(1);
        let id = ExternalId::from_raw(100);
        target.begin_transaction("t").unwrap();
        target.set_hidden(view, id, true).unwrap();
        assert!(target.is_hidden(view, id).unwrap());
        target.rollback_transaction();
        assert!(!target.is_hidden(view, id).unwrap());
    }

    #[test]
    fn locked_objects_reject_writes() {
        let mut target = MemoryTarget::new(scene());
        target.begin_transaction("t").unwrap();
        let err = target
            .set_hidden(ViewId::from_raw(1), ExternalId::from_raw(101), true)
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn pattern_lookup_ignores_case() {
        let target = MemoryTarget::new(scene());
        assert_eq!(target.find_pattern_id_by_name("DASHED"), Some(PatternId::from_raw(7)));
        assert_eq!(target.find_pattern_id_by_name("Dotted"), None);
    }

    #[test]
    fn scene_json_round_trips() {
        let json = scene().to_json().unwrap();
        assert_eq!(Scene::from_json(&json).unwrap(), scene());
    }
}
