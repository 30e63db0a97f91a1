//! The top-level controller owning the canonical hierarchy.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use cad_model::{
    Container, EntityKey, EntityKind, EntityRef, ExternalId, Hierarchy, OverrideSet, ViewId,
    compare_names,
};
use cad_store::{
    LoadSummary, ProjectLocation, SaveSummary, StoreError, StoreLayout, find_matching_folder,
    folder_matches, load_hierarchy, save_hierarchy,
};

use crate::applicator::{ApplyItem, ApplyReport, apply_batch};
use crate::collect::collect_hierarchy;
use crate::error::{CoreError, Result};
use crate::filter::filter;
use crate::propagate::{PropagationReport, propagate_to_views};
use crate::resolver::{OverrideEdit, OverrideSummary, resolve_overrides};
use crate::selection::{ClickModifier, SelectionController, enumeration_order};
use crate::sync::sync_to_canonical;
use crate::target::RenderTarget;

/// Everything an override edit surface needs to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEditContext {
    /// Entities the edit will apply to.
    pub targets: Vec<EntityKey>,
    pub summary: OverrideSummary,
    /// Line pattern names, sorted.
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub store: LoadSummary,
    pub apply: ApplyReport,
}

/// Owns the target, the canonical hierarchy, the search query and the
/// selection state for one view.
#[derive(Debug)]
pub struct Session<T: RenderTarget> {
    target: T,
    view: ViewId,
    project: ProjectLocation,
    layout: StoreLayout,
    hierarchy: Hierarchy,
    selection: SelectionController,
    query: String,
}

impl<T: RenderTarget> Session<T> {
    /// Opens a session on `view` and collects its hierarchy.
    pub fn open(
        target: T,
        view: ViewId,
        project: ProjectLocation,
        layout: StoreLayout,
    ) -> Result<Self> {
        let mut session = Self {
            target,
            view,
            project,
            layout,
            hierarchy: Hierarchy::default(),
            selection: SelectionController::new(),
            query: String::new(),
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Replaces the hierarchy with a fresh read of the target.
    pub fn refresh(&mut self) -> Result<()> {
        let hierarchy = collect_hierarchy(&self.target, self.view)?;
        self.replace_hierarchy(hierarchy);
        Ok(())
    }

    fn replace_hierarchy(&mut self, hierarchy: Hierarchy) {
        self.hierarchy = hierarchy;
        self.selection.rebuild(&self.hierarchy);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The containers to display for the current query.
    pub fn visible_containers(&self) -> Cow<'_, [Container]> {
        filter(self.hierarchy.containers(), &self.query)
    }

    pub fn click(&mut self, key: EntityKey, modifier: ClickModifier) -> bool {
        let order = enumeration_order(&self.visible_containers());
        self.selection
            .click(&mut self.hierarchy, &order, key, modifier)
    }

    pub fn select_all_siblings(&mut self) -> usize {
        self.selection.select_all_siblings(&mut self.hierarchy)
    }

    /// Escape: deselect everything and clear the search.
    pub fn clear(&mut self) {
        self.selection.clear(&mut self.hierarchy);
        self.query.clear();
    }

    /// Copies edits made on filtered copies back to the canonical entities.
    pub fn commit_filtered_edit(&mut self, edited: &[Container]) -> usize {
        sync_to_canonical(&mut self.hierarchy, edited)
    }

    /// Sets visibility on every selected entity, or on `key` alone when
    /// nothing is selected, and writes the result to the target.
    pub fn set_visibility(&mut self, key: EntityKey, visible: bool) -> Result<ApplyReport> {
        let mut keys = self.hierarchy.selected_keys(EntityKind::Container);
        keys.extend(self.hierarchy.selected_keys(EntityKind::SubItem));
        if keys.is_empty() {
            keys.push(key);
        }

        let items = keys
            .iter()
            .map(|k| {
                let mut item = self.apply_item(*k)?;
                item.visible = visible;
                Ok(item)
            })
            .collect::<Result<Vec<_>>>()?;

        let report = apply_batch(&mut self.target, self.view, &items)?;
        for key in &report.applied {
            self.hierarchy.set_visible(*key, visible);
        }
        Ok(report)
    }

    /// Sets halftone on every selected container when `container` is
    /// selected, otherwise on `container` alone.
    pub fn toggle_halftone(&mut self, container: ExternalId, halftone: bool) -> Result<ApplyReport> {
        let key = EntityKey::Container(container);
        let clicked = self
            .hierarchy
            .container(container)
            .ok_or(CoreError::UnknownEntity(key))?;
        let keys = if clicked.selected {
            self.hierarchy.selected_keys(EntityKind::Container)
        } else {
            vec![key]
        };

        let items = keys
            .iter()
            .map(|k| {
                let mut item = self.apply_item(*k)?;
                item.halftone = halftone;
                Ok(item)
            })
            .collect::<Result<Vec<_>>>()?;

        let report = apply_batch(&mut self.target, self.view, &items)?;
        for key in &report.applied {
            if let Some(c) = self.hierarchy.container_mut(key.id()) {
                c.halftone = halftone;
            }
        }
        Ok(report)
    }

    /// Determines the entities an override edit on `key` covers and
    /// summarizes their current state.
    pub fn begin_override_edit(&self, key: EntityKey) -> Result<OverrideEditContext> {
        let entity = self
            .hierarchy
            .entity(key)
            .ok_or(CoreError::UnknownEntity(key))?;
        let targets = if entity.selected() {
            self.hierarchy.selected_keys(key.kind())
        } else {
            vec![key]
        };
        let summary = resolve_overrides(&self.target, self.view, &targets)?;
        let mut patterns = self.target.line_patterns();
        patterns.sort_by(|a, b| compare_names(a, b));
        Ok(OverrideEditContext {
            targets,
            summary,
            patterns,
        })
    }

    /// Applies `edit` to `targets`. Untouched fields keep each entity's
    /// current override.
    pub fn apply_override_edit(
        &mut self,
        targets: &[EntityKey],
        edit: &OverrideEdit,
    ) -> Result<ApplyReport> {
        let items = targets
            .iter()
            .map(|k| {
                let mut item = self.apply_item(*k)?;
                item.overrides = edit.desired(&item.overrides);
                item.halftone = edit.desired_halftone(item.halftone);
                Ok(item)
            })
            .collect::<Result<Vec<_>>>()?;

        let report = apply_batch(&mut self.target, self.view, &items)?;
        for item in items.iter().filter(|i| report.was_applied(i.key)) {
            self.store_overrides(item.key, item.overrides.clone(), item.halftone);
        }
        Ok(report)
    }

    fn apply_item(&self, key: EntityKey) -> Result<ApplyItem> {
        self.hierarchy
            .entity(key)
            .map(ApplyItem::from_entity)
            .ok_or(CoreError::UnknownEntity(key))
    }

    fn store_overrides(&mut self, key: EntityKey, overrides: OverrideSet, halftone: bool) {
        match key {
            EntityKey::Container(id) => {
                if let Some(c) = self.hierarchy.container_mut(id) {
                    c.overrides = overrides;
                    c.halftone = halftone;
                }
            }
            EntityKey::SubItem(id) => {
                if let Some(s) = self.hierarchy.sub_item_mut(id) {
                    s.overrides = overrides;
                }
            }
        }
    }

    pub fn save_folder(&self) -> Result<PathBuf> {
        Ok(self.layout.save_folder(&self.project)?)
    }

    /// Saves the hierarchy. Overrides are re-read from the target so changes
    /// made outside this session are captured; visibility and halftone come
    /// from the session.
    pub fn save(&self) -> Result<SaveSummary> {
        let span = tracing::info_span!("save", view = %self.view);
        let _guard = span.enter();

        let mut fresh = collect_hierarchy(&self.target, self.view)?;
        for container in fresh.containers_mut() {
            let Some(current) = self.hierarchy.container_by_name(&container.name) else {
                continue;
            };
            container.visible = current.visible;
            container.halftone = current.halftone;
            for sub_item in &mut container.sub_items {
                if let Some(current_sub) = current.sub_item_by_name(&sub_item.name) {
                    sub_item.visible = current_sub.visible;
                }
            }
        }

        let folder = self.save_folder()?;
        let summary = save_hierarchy(&self.layout, &folder, &fresh).inspect_err(|e| {
            tracing::error!(error = %e, "Saving layer settings failed");
        })?;
        Ok(summary)
    }

    /// Loads from the project save folder, or the first of its sub-folders
    /// holding records for this hierarchy.
    pub fn load(&mut self) -> Result<LoadOutcome> {
        let base = self.save_folder()?;
        let folder = find_matching_folder(&self.layout, &base, &self.hierarchy)?
            .ok_or(StoreError::NoMatchingRecords { path: base })?;
        self.load_from(&folder)
    }

    /// Loads from `folder` and applies the loaded state to the target. On
    /// any failure neither the hierarchy nor the target changes.
    pub fn load_from(&mut self, folder: &Path) -> Result<LoadOutcome> {
        let span = tracing::info_span!("load", folder = %folder.display());
        let _guard = span.enter();

        if !folder_matches(&self.layout, folder, &self.hierarchy) {
            let err = StoreError::NoMatchingRecords {
                path: folder.to_path_buf(),
            };
            tracing::error!(error = %err, "Loading layer settings failed");
            return Err(err.into());
        }

        let mut staged = self.hierarchy.clone();
        let store = load_hierarchy(&self.layout, folder, &mut staged).inspect_err(|e| {
            tracing::error!(error = %e, "Loading layer settings failed");
        })?;

        let items: Vec<ApplyItem> = staged
            .containers()
            .iter()
            .flat_map(|c| {
                std::iter::once(ApplyItem::from_entity(EntityRef::Container(c))).chain(
                    c.sub_items
                        .iter()
                        .map(|s| ApplyItem::from_entity(EntityRef::SubItem(s))),
                )
            })
            .collect();
        let apply = apply_batch(&mut self.target, self.view, &items)?;

        self.replace_hierarchy(staged);
        Ok(LoadOutcome { store, apply })
    }

    /// Copies this view's state onto `views`.
    pub fn propagate(&mut self, views: &[ViewId]) -> Result<PropagationReport> {
        propagate_to_views(&mut self.target, self.view, views)
    }
}
