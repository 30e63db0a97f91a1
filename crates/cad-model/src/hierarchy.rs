use crate::entity::{Container, EntityKey, EntityKind, EntityRef, SubItem};
use crate::ids::ExternalId;
use crate::name::{compare_names, names_equal};

/// The canonical, sorted list of containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    containers: Vec<Container>,
}

impl Hierarchy {
    /// Builds a hierarchy, sorting containers and their sub-items by name.
    pub fn new(containers: Vec<Container>) -> Self {
        let mut hierarchy = Self { containers };
        hierarchy.sort();
        hierarchy
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn containers_mut(&mut self) -> &mut [Container] {
        &mut self.containers
    }

    pub fn into_containers(self) -> Vec<Container> {
        self.containers
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn sort(&mut self) {
        self.containers.sort_by(|a, b| compare_names(&a.name, &b.name));
        for container in &mut self.containers {
            container.sort_sub_items();
        }
    }

    pub fn container(&self, id: ExternalId) -> Option<&Container> {
        self.containers.iter().find(|c| c.external_id == id)
    }

    pub fn container_mut(&mut self, id: ExternalId) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.external_id == id)
    }

    pub fn container_by_name(&self, name: &str) -> Option<&Container> {
        self.containers.iter().find(|c| names_equal(&c.name, name))
    }

    /// Linear lookup of a sub-item and its owner.
    pub fn sub_item(&self, id: ExternalId) -> Option<(&Container, &SubItem)> {
        self.containers
            .iter()
            .find_map(|c| c.sub_item(id).map(|s| (c, s)))
    }

    pub fn sub_item_mut(&mut self, id: ExternalId) -> Option<&mut SubItem> {
        self.containers
            .iter_mut()
            .find_map(|c| c.sub_item_mut(id))
    }

    pub fn entity(&self, key: EntityKey) -> Option<EntityRef<'_>> {
        match key {
            EntityKey::Container(id) => self.container(id).map(EntityRef::Container),
            EntityKey::SubItem(id) => self.sub_item(id).map(|(_, s)| EntityRef::SubItem(s)),
        }
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entity(key).is_some()
    }

    /// All sub-items in display order, paired with their owner.
    pub fn sub_items(&self) -> impl Iterator<Item = (&Container, &SubItem)> {
        self.containers
            .iter()
            .flat_map(|c| c.sub_items.iter().map(move |s| (c, s)))
    }

    pub fn set_selected(&mut self, key: EntityKey, selected: bool) -> bool {
        let updated = match key {
            EntityKey::Container(id) => self.container_mut(id).map(|c| c.selected = selected),
            EntityKey::SubItem(id) => self.sub_item_mut(id).map(|s| s.selected = selected),
        };
        updated.is_some()
    }

    pub fn set_visible(&mut self, key: EntityKey, visible: bool) -> bool {
        let updated = match key {
            EntityKey::Container(id) => self.container_mut(id).map(|c| c.visible = visible),
            EntityKey::SubItem(id) => self.sub_item_mut(id).map(|s| s.visible = visible),
        };
        updated.is_some()
    }

    /// Clears selection on every entity of `kind`.
    pub fn clear_selection_of(&mut self, kind: EntityKind) {
        for container in &mut self.containers {
            match kind {
                EntityKind::Container => container.selected = false,
                EntityKind::SubItem => {
                    for sub_item in &mut container.sub_items {
                        sub_item.selected = false;
                    }
                }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.clear_selection_of(EntityKind::Container);
        self.clear_selection_of(EntityKind::SubItem);
    }

    /// Keys of selected entities of `kind`, in display order.
    pub fn selected_keys(&self, kind: EntityKind) -> Vec<EntityKey> {
        match kind {
            EntityKind::Container => self
                .containers
                .iter()
                .filter(|c| c.selected)
                .map(Container::key)
                .collect(),
            EntityKind::SubItem => self
                .sub_items()
                .filter(|(_, s)| s.selected)
                .map(|(_, s)| s.key())
                .collect(),
        }
    }
}
