//! Copying edits made on filtered copies back to the canonical hierarchy.

use cad_model::{Container, Hierarchy};

/// Copies the mutable state of every container and sub-item in `edited`
/// onto the canonical entity with the same `external_id`. Entities with no
/// canonical counterpart are ignored. Returns the number of entities updated.
pub fn sync_to_canonical(canonical: &mut Hierarchy, edited: &[Container]) -> usize {
    let mut updated = 0;
    for source in edited {
        let Some(target) = canonical.container_mut(source.external_id) else {
            tracing::debug!(container = %source.name, "no canonical container to sync");
            continue;
        };
        target.visible = source.visible;
        target.halftone = source.halftone;
        target.overrides.clone_from(&source.overrides);
        target.selected = source.selected;
        target.expanded = source.expanded;
        updated += 1;

        for sub in &source.sub_items {
            if let Some(target_sub) = target.sub_item_mut(sub.external_id) {
                target_sub.visible = sub.visible;
                target_sub.overrides.clone_from(&sub.overrides);
                target_sub.selected = sub.selected;
                updated += 1;
            }
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use cad_model::{ExternalId, SubItem};

    #[test]
    fn edits_on_partial_copy_reach_canonical() {
        let mut canonical = Hierarchy::new(vec![
            Container::new(ExternalId::from_raw(1), "Site").with_sub_items([
                SubItem::new(ExternalId::from_raw(10), "Grid"),
                SubItem::new(ExternalId::from_raw(11), "Walls"),
            ]),
        ]);
        let mut filtered = filter(canonical.containers(), "grid").into_owned();
        filtered[0].sub_items[0].visible = false;
        filtered[0].sub_items[0].selected = true;

        let updated = sync_to_canonical(&mut canonical, &filtered);
        assert_eq!(updated, 2);
        let site = canonical.container(ExternalId::from_raw(1)).unwrap();
        assert!(!site.sub_item(ExternalId::from_raw(10)).unwrap().visible);
        assert!(site.sub_item(ExternalId::from_raw(10)).unwrap().selected);
        assert_eq!(site.sub_items.len(), 2);
        assert!(site.sub_item(ExternalId::from_raw(11)).unwrap().visible);
    }
}
