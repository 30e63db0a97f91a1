//! Containers (imported drawings) and their sub-items (layers).

use std::fmt;

use crate::ids::ExternalId;
use crate::name::{NameSet, compare_names, name_key, names_equal, normalize_name};
use crate::overrides::OverrideSet;

/// Which of the two entity levels a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Container,
    SubItem,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => f.write_str("container"),
            Self::SubItem => f.write_str("sub-item"),
        }
    }
}

/// Identity of an entity in the hierarchy.
///
/// Sub-item handles are unique across the whole hierarchy, so the owning
/// container is not part of the key; it is recovered through the parent index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKey {
    Container(ExternalId),
    SubItem(ExternalId),
}

impl EntityKey {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Container(_) => EntityKind::Container,
            Self::SubItem(_) => EntityKind::SubItem,
        }
    }

    pub fn id(self) -> ExternalId {
        match self {
            Self::Container(id) | Self::SubItem(id) => id,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubItem {
    pub name: String,
    pub visible: bool,
    pub overrides: OverrideSet,
    pub selected: bool,
    pub external_id: ExternalId,
}

impl SubItem {
    pub fn new(external_id: ExternalId, name: &str) -> Self {
        Self {
            name: normalize_name(name),
            visible: true,
            overrides: OverrideSet::default(),
            selected: false,
            external_id,
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::SubItem(self.external_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub name: String,
    pub visible: bool,
    pub halftone: bool,
    pub overrides: OverrideSet,
    pub sub_items: Vec<SubItem>,
    pub selected: bool,
    pub expanded: bool,
    pub external_id: ExternalId,
}

impl Container {
    pub fn new(external_id: ExternalId, name: &str) -> Self {
        Self {
            name: normalize_name(name),
            visible: true,
            halftone: false,
            overrides: OverrideSet::default(),
            sub_items: Vec::new(),
            selected: false,
            expanded: true,
            external_id,
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::Container(self.external_id)
    }

    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// Adds a sub-item unless one with an equivalent name already exists.
    pub fn push_sub_item(&mut self, sub_item: SubItem) -> bool {
        if self.sub_item_by_name(&sub_item.name).is_some() {
            return false;
        }
        self.sub_items.push(sub_item);
        true
    }

    /// Builder form of [`Container::push_sub_item`].
    #[must_use]
    pub fn with_sub_items(mut self, sub_items: impl IntoIterator<Item = SubItem>) -> Self {
        let mut seen = NameSet::new();
        for existing in &self.sub_items {
            seen.insert(&existing.name);
        }
        for sub_item in sub_items {
            if seen.insert(&sub_item.name) {
                self.sub_items.push(sub_item);
            }
        }
        self
    }

    pub fn sub_item(&self, id: ExternalId) -> Option<&SubItem> {
        self.sub_items.iter().find(|s| s.external_id == id)
    }

    pub fn sub_item_mut(&mut self, id: ExternalId) -> Option<&mut SubItem> {
        self.sub_items.iter_mut().find(|s| s.external_id == id)
    }

    pub fn sub_item_by_name(&self, name: &str) -> Option<&SubItem> {
        self.sub_items.iter().find(|s| names_equal(&s.name, name))
    }

    pub fn sub_item_by_name_mut(&mut self, name: &str) -> Option<&mut SubItem> {
        self.sub_items.iter_mut().find(|s| names_equal(&s.name, name))
    }

    pub fn sort_sub_items(&mut self) {
        self.sub_items.sort_by(|a, b| compare_names(&a.name, &b.name));
    }
}

/// Borrowed view of either entity level, for code that handles both.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Container(&'a Container),
    SubItem(&'a SubItem),
}

impl<'a> EntityRef<'a> {
    pub fn key(self) -> EntityKey {
        match self {
            Self::Container(c) => c.key(),
            Self::SubItem(s) => s.key(),
        }
    }

    pub fn name(self) -> &'a str {
        match self {
            Self::Container(c) => &c.name,
            Self::SubItem(s) => &s.name,
        }
    }

    pub fn visible(self) -> bool {
        match self {
            Self::Container(c) => c.visible,
            Self::SubItem(s) => s.visible,
        }
    }

    pub fn selected(self) -> bool {
        match self {
            Self::Container(c) => c.selected,
            Self::SubItem(s) => s.selected,
        }
    }

    pub fn overrides(self) -> &'a OverrideSet {
        match self {
            Self::Container(c) => &c.overrides,
            Self::SubItem(s) => &s.overrides,
        }
    }

    /// Halftone is tracked on containers only; sub-items always report false.
    pub fn halftone(self) -> bool {
        match self {
            Self::Container(c) => c.halftone,
            Self::SubItem(_) => false,
        }
    }
}
