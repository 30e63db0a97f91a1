//! Click, modifier-click and range selection over containers and sub-items.
//!
//! Selection state lives on the entities of the canonical hierarchy. Plain
//! and range clicks leave only one kind (containers or sub-items) selected;
//! a modifier toggle and "select all siblings" touch nothing but the
//! entities they select.

use std::collections::HashMap;

use cad_model::{Container, EntityKey, EntityKind, ExternalId, Hierarchy, SubItem};

/// Sub-item → owning container lookup, derived from the hierarchy.
#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    parents: HashMap<ExternalId, ExternalId>,
}

impl ParentIndex {
    pub fn build(hierarchy: &Hierarchy) -> Self {
        let parents = hierarchy
            .sub_items()
            .map(|(container, sub_item)| (sub_item.external_id, container.external_id))
            .collect();
        Self { parents }
    }

    pub fn parent_of(&self, sub_item: ExternalId) -> Option<ExternalId> {
        self.parents.get(&sub_item).copied()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Modifier state of a pointer-down event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClickModifier {
    #[default]
    None,
    /// Ctrl/Cmd: toggle the clicked entity.
    Toggle,
    /// Shift: extend from the last selected entity.
    Range,
}

/// Entities in display order: each container followed by its sub-items.
pub fn enumeration_order(containers: &[Container]) -> Vec<EntityKey> {
    let mut order = Vec::new();
    for container in containers {
        order.push(container.key());
        order.extend(container.sub_items.iter().map(SubItem::key));
    }
    order
}

#[derive(Debug, Default)]
pub struct SelectionController {
    last_selected: Option<EntityKey>,
    parents: Option<ParentIndex>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the parent index for a replaced hierarchy and forgets the
    /// anchor.
    pub fn rebuild(&mut self, hierarchy: &Hierarchy) {
        self.parents = Some(ParentIndex::build(hierarchy));
        self.last_selected = None;
    }

    pub fn last_selected(&self) -> Option<EntityKey> {
        self.last_selected
    }

    pub fn parent_of(&self, sub_item: ExternalId) -> Option<ExternalId> {
        self.parents.as_ref()?.parent_of(sub_item)
    }

    /// Handles a click on `key`. `order` is the current enumeration order
    /// (after filtering). Returns whether any selection changed.
    pub fn click(
        &mut self,
        hierarchy: &mut Hierarchy,
        order: &[EntityKey],
        key: EntityKey,
        modifier: ClickModifier,
    ) -> bool {
        let Some(entity) = hierarchy.entity(key) else {
            return false;
        };
        let was_selected = entity.selected();

        match modifier {
            ClickModifier::None => {
                hierarchy.clear_selection();
                hierarchy.set_selected(key, true);
                self.last_selected = Some(key);
                true
            }
            ClickModifier::Toggle => {
                hierarchy.set_selected(key, !was_selected);
                self.last_selected = Some(key);
                true
            }
            ClickModifier::Range => self.select_range(hierarchy, order, key),
        }
    }

    fn select_range(&mut self, hierarchy: &mut Hierarchy, order: &[EntityKey], key: EntityKey) -> bool {
        let Some(anchor) = self.last_selected else {
            return false;
        };
        if anchor.kind() != key.kind() {
            tracing::debug!(anchor = %anchor, clicked = %key, "range across entity kinds ignored");
            return false;
        }
        let (Some(from), Some(to)) = (
            order.iter().position(|k| *k == anchor),
            order.iter().position(|k| *k == key),
        ) else {
            return false;
        };
        let (start, end) = if from <= to { (from, to) } else { (to, from) };

        hierarchy.clear_selection_of(other_kind(key.kind()));
        for k in &order[start..=end] {
            if k.kind() == key.kind() {
                hierarchy.set_selected(*k, true);
            }
        }
        true
    }

    /// Selects every sub-item of the container owning the anchor (or, with no
    /// anchor, the first selected entity). Returns the number selected.
    pub fn select_all_siblings(&mut self, hierarchy: &mut Hierarchy) -> usize {
        let anchor = self.last_selected.or_else(|| {
            hierarchy
                .selected_keys(EntityKind::SubItem)
                .into_iter()
                .chain(hierarchy.selected_keys(EntityKind::Container))
                .next()
        });
        let container_id = match anchor {
            Some(EntityKey::Container(id)) => Some(id),
            Some(EntityKey::SubItem(id)) => self.parent_of(id),
            None => None,
        };
        let Some(container_id) = container_id else {
            return 0;
        };

        let keys: Vec<EntityKey> = match hierarchy.container(container_id) {
            Some(container) => container.sub_items.iter().map(SubItem::key).collect(),
            None => return 0,
        };
        for key in &keys {
            hierarchy.set_selected(*key, true);
        }
        keys.len()
    }

    /// Deselects everything and forgets the anchor.
    pub fn clear(&mut self, hierarchy: &mut Hierarchy) {
        hierarchy.clear_selection();
        self.last_selected = None;
    }
}

fn other_kind(kind: EntityKind) -> EntityKind {
    match kind {
        EntityKind::Container => EntityKind::SubItem,
        EntityKind::SubItem => EntityKind::Container,
    }
}
