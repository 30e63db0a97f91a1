//! Search filtering of the container list.

use std::borrow::Cow;

use cad_model::{Container, name_contains_key, name_key};

/// Derives the filtered container list for `query`.
///
/// A blank query borrows `containers` as-is. Otherwise every returned
/// container is an owned copy: containers whose own name matches keep all
/// their sub-items, containers matched only through sub-items keep just the
/// matching ones. Identity (`external_id`) is preserved so edits can be
/// synchronized back with [`crate::sync::sync_to_canonical`].
pub fn filter<'a>(containers: &'a [Container], query: &str) -> Cow<'a, [Container]> {
    let query = query.trim();
    if query.is_empty() {
        return Cow::Borrowed(containers);
    }
    let key = name_key(query);

    let filtered = containers
        .iter()
        .filter_map(|container| {
            if name_contains_key(&container.name, &key) {
                return Some(container.clone());
            }
            let matching: Vec<_> = container
                .sub_items
                .iter()
                .filter(|s| name_contains_key(&s.name, &key))
                .cloned()
                .collect();
            if matching.is_empty() {
                return None;
            }
            Some(Container {
                name: container.name.clone(),
                visible: container.visible,
                halftone: container.halftone,
                overrides: container.overrides.clone(),
                sub_items: matching,
                selected: container.selected,
                expanded: container.expanded,
                external_id: container.external_id,
            })
        })
        .collect::<Vec<_>>();
    Cow::Owned(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad_model::{ExternalId, Hierarchy, SubItem};

    fn plans() -> Hierarchy {
        Hierarchy::new(vec![
            Container::new(ExternalId::from_raw(1), "Site Plan").with_sub_items([
                SubItem::new(ExternalId::from_raw(10), "0"),
                SubItem::new(ExternalId::from_raw(11), "Grid"),
            ]),
            Container::new(ExternalId::from_raw(2), "Floor Plan").with_sub_items([
                SubItem::new(ExternalId::from_raw(20), "0"),
                SubItem::new(ExternalId::from_raw(21), "Doors"),
            ]),
        ])
    }

    #[test]
    fn blank_query_borrows_the_input() {
        let hierarchy = plans();
        for query in ["", "   ", "\t"] {
            let result = filter(hierarchy.containers(), query);
            assert!(matches!(result, Cow::Borrowed(_)));
            assert!(std::ptr::eq(result.as_ref(), hierarchy.containers()));
        }
    }

    #[test]
    fn sub_item_match_keeps_only_matching_sub_items() {
        let hierarchy = plans();
        let result = filter(hierarchy.containers(), "grid");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Site Plan");
        let names: Vec<_> = result[0].sub_items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Grid"]);
    }

    #[test]
    fn container_match_keeps_all_sub_items() {
        let hierarchy = plans();
        let result = filter(hierarchy.containers(), "FLOOR");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sub_items.len(), 2);
    }

    #[test]
    fn full_width_query_matches() {
        let hierarchy = plans();
        let result = filter(hierarchy.containers(), "ＤＯＯＲ");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Floor Plan");
    }

    #[test]
    fn shared_sub_item_name_matches_both() {
        let hierarchy = plans();
        let result = filter(hierarchy.containers(), " 0 ");
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|c| c.sub_items.len() == 1));
    }
}
