use cad_model::{
    Container, EntityKey, EntityKind, EntityRef, ExternalId, Hierarchy, LineWeight,
    OverrideSet, Rgb, SubItem,
};
use proptest::prelude::*;

fn id(raw: u64) -> ExternalId {
    ExternalId::from_raw(raw)
}

fn sample() -> Hierarchy {
    Hierarchy::new(vec![
        Container::new(id(1), "Site Plan").with_sub_items([
            SubItem::new(id(11), "Grid"),
            SubItem::new(id(10), "0"),
        ]),
        Container::new(id(2), "floor plan").with_sub_items([
            SubItem::new(id(21), "Doors"),
            SubItem::new(id(20), "0"),
        ]),
    ])
}

#[test]
fn hierarchy_sorts_containers_and_sub_items() {
    let hierarchy = sample();
    let names: Vec<_> = hierarchy.containers().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["floor plan", "Site Plan"]);
    let site = hierarchy.container(id(1)).unwrap();
    let layers: Vec<_> = site.sub_items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(layers, vec!["0", "Grid"]);
}

#[test]
fn duplicate_sub_item_names_are_dropped() {
    let container = Container::new(id(1), "A").with_sub_items([
        SubItem::new(id(2), "Walls"),
        SubItem::new(id(3), "WALLS"),
        SubItem::new(id(4), "Ｗａｌｌｓ"),
    ]);
    assert_eq!(container.sub_items.len(), 1);
    assert_eq!(container.sub_items[0].external_id, id(2));

    let mut container = container;
    assert!(!container.push_sub_item(SubItem::new(id(5), "walls")));
    assert!(container.push_sub_item(SubItem::new(id(6), "Windows")));
}

#[test]
fn entity_lookup_is_kind_tagged() {
    let hierarchy = sample();
    match hierarchy.entity(EntityKey::SubItem(id(21))) {
        Some(EntityRef::SubItem(sub_item)) => assert_eq!(sub_item.name, "Doors"),
        other => panic!("unexpected lookup result: {other:?}"),
    }
    assert!(hierarchy.entity(EntityKey::Container(id(21))).is_none());
    let (owner, _) = hierarchy.sub_item(id(21)).unwrap();
    assert_eq!(owner.external_id, id(2));
}

#[test]
fn selection_helpers_respect_kind() {
    let mut hierarchy = sample();
    hierarchy.set_selected(EntityKey::Container(id(1)), true);
    hierarchy.set_selected(EntityKey::SubItem(id(20)), true);
    assert_eq!(
        hierarchy.selected_keys(EntityKind::Container),
        vec![EntityKey::Container(id(1))]
    );
    hierarchy.clear_selection_of(EntityKind::Container);
    assert!(hierarchy.selected_keys(EntityKind::Container).is_empty());
    assert_eq!(
        hierarchy.selected_keys(EntityKind::SubItem),
        vec![EntityKey::SubItem(id(20))]
    );
}

#[test]
fn override_set_serializes_absent_fields_as_null() {
    let set = OverrideSet::default()
        .with_color(Rgb::new(255, 0, 0))
        .with_line_weight(LineWeight::new(3).unwrap());
    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["color"], "#FF0000");
    assert_eq!(json["linePattern"], serde_json::Value::Null);
    assert_eq!(json["lineWeight"], 3);
}

proptest! {
    #[test]
    fn rgb_hex_round_trips(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let rgb = Rgb::new(r, g, b);
        prop_assert_eq!(Rgb::parse_hex(&rgb.to_hex()).unwrap(), rgb);
    }
}
