//! Building the canonical hierarchy from the target.

use cad_model::{Container, ExternalId, Hierarchy, OverrideSet, SubItem, ViewId, normalize_name};

use crate::error::Result;
use crate::resolver::effective_overrides;
use crate::target::{RenderTarget, effective_view};

/// Enumerates the containers of `view` with their current visibility and
/// effective overrides, read through the view's template.
///
/// Sub-items with blank names, or whose names collide with an earlier
/// sibling after normalization, are dropped. Per-object read failures fall
/// back to visible with no overrides.
pub fn collect_hierarchy<T: RenderTarget + ?Sized>(target: &T, view: ViewId) -> Result<Hierarchy> {
    let infos = target.enumerate_entities(view)?;
    let read_view = effective_view(target, view)?;

    let mut containers = Vec::with_capacity(infos.len());
    for info in infos {
        let mut container = Container::new(info.id, &info.name);
        container.visible = read_visible(target, read_view, info.id);
        let (overrides, halftone) = read_overrides(target, read_view, info.id);
        container.overrides = overrides;
        container.halftone = halftone;

        for sub in info.sub_items {
            if normalize_name(&sub.name).trim().is_empty() {
                continue;
            }
            let mut sub_item = SubItem::new(sub.id, &sub.name);
            sub_item.visible = read_visible(target, read_view, sub.id);
            sub_item.overrides = read_overrides(target, read_view, sub.id).0;
            if !container.push_sub_item(sub_item) {
                tracing::debug!(container = %container.name, sub_item = %sub.name, "dropping duplicate sub-item");
            }
        }
        containers.push(container);
    }

    let hierarchy = Hierarchy::new(containers);
    tracing::debug!(view = %view, containers = hierarchy.len(), "Collected hierarchy");
    Ok(hierarchy)
}

fn read_visible<T: RenderTarget + ?Sized>(target: &T, view: ViewId, id: ExternalId) -> bool {
    match target.is_hidden(view, id) {
        Ok(hidden) => !hidden,
        Err(e) => {
            tracing::debug!(id = %id, error = %e, "visibility unreadable, assuming visible");
            true
        }
    }
}

fn read_overrides<T: RenderTarget + ?Sized>(
    target: &T,
    view: ViewId,
    id: ExternalId,
) -> (OverrideSet, bool) {
    match target.get_overrides(view, id) {
        Ok(record) => (effective_overrides(target, &record), record.halftone),
        Err(e) => {
            tracing::debug!(id = %id, error = %e, "overrides unreadable, assuming none");
            (OverrideSet::default(), false)
        }
    }
}
