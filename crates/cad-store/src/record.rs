//! On-disk record schema.
//!
//! One record per container. Sub-item entries come in two shapes: the
//! legacy form is a bare visibility boolean, the current form is an object
//! carrying visibility and overrides. Both load; only the current form is
//! written. PascalCase field names from older writers are accepted as aliases.

use std::collections::BTreeMap;

use cad_model::{Container, LineWeight, OverrideSet, Rgb, SubItem};
use serde::{Deserialize, Serialize};

/// Persisted state of one container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    #[serde(default, alias = "Visibility")]
    pub visible: bool,
    #[serde(default, alias = "Halftone")]
    pub halftone: Option<bool>,
    #[serde(default, alias = "LinePattern")]
    pub line_pattern: Option<String>,
    #[serde(default, alias = "LineColor")]
    pub line_color: Option<String>,
    #[serde(default, alias = "LineWeight")]
    pub line_weight: Option<i32>,
    /// Keyed by normalized sub-item name.
    #[serde(default, alias = "Layers")]
    pub subitems: Option<BTreeMap<String, Option<SubItemValue>>>,
}

/// A sub-item entry in either schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubItemValue {
    Legacy(bool),
    Record(SubItemRecord),
    /// Anything else; ignored on load.
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubItemRecord {
    #[serde(default, alias = "Visibility")]
    pub visible: bool,
    #[serde(default, alias = "LinePattern")]
    pub line_pattern: Option<String>,
    #[serde(default, alias = "LineColor")]
    pub line_color: Option<String>,
    #[serde(default, alias = "LineWeight")]
    pub line_weight: Option<i32>,
}

/// Counts gathered while applying one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyCounts {
    pub sub_items_updated: usize,
    pub sub_items_missing: usize,
    pub values_ignored: usize,
}

impl ContainerRecord {
    pub fn from_container(container: &Container) -> Self {
        let subitems = container
            .sub_items
            .iter()
            .map(|s| {
                (
                    s.name.clone(),
                    Some(SubItemValue::Record(SubItemRecord::from_sub_item(s))),
                )
            })
            .collect();
        Self {
            visible: container.visible,
            halftone: Some(container.halftone),
            line_pattern: container.overrides.line_pattern.clone(),
            line_color: container.overrides.color.map(Rgb::to_hex),
            line_weight: container.overrides.line_weight.map(i32::from),
            subitems: Some(subitems),
        }
    }

    /// Overwrites the container's state with this record.
    ///
    /// Sub-items the record does not mention keep their state; entries naming
    /// sub-items the container does not have are skipped.
    pub fn apply_to(&self, container: &mut Container) -> ApplyCounts {
        let mut counts = ApplyCounts::default();
        container.visible = self.visible;
        container.halftone = self.halftone.unwrap_or(false);
        container.overrides = decode_overrides(
            &container.name,
            self.line_pattern.as_deref(),
            self.line_color.as_deref(),
            self.line_weight,
        );

        let Some(entries) = &self.subitems else {
            return counts;
        };
        let owner = container.name.clone();
        for (name, value) in entries {
            let Some(sub_item) = find_sub_item(container, name) else {
                tracing::debug!(container = %owner, sub_item = %name, "saved sub-item not present");
                counts.sub_items_missing += 1;
                continue;
            };
            match value {
                Some(SubItemValue::Legacy(visible)) => {
                    sub_item.visible = *visible;
                    sub_item.overrides = OverrideSet::default();
                    counts.sub_items_updated += 1;
                }
                Some(SubItemValue::Record(record)) => {
                    record.apply_to(sub_item);
                    counts.sub_items_updated += 1;
                }
                Some(SubItemValue::Unrecognized(raw)) => {
                    tracing::warn!(sub_item = %name, value = %raw, "ignoring unrecognized sub-item entry");
                    counts.values_ignored += 1;
                }
                None => counts.values_ignored += 1,
            }
        }
        counts
    }
}

impl SubItemRecord {
    pub fn from_sub_item(sub_item: &SubItem) -> Self {
        Self {
            visible: sub_item.visible,
            line_pattern: sub_item.overrides.line_pattern.clone(),
            line_color: sub_item.overrides.color.map(Rgb::to_hex),
            line_weight: sub_item.overrides.line_weight.map(i32::from),
        }
    }

    pub fn apply_to(&self, sub_item: &mut SubItem) {
        sub_item.visible = self.visible;
        sub_item.overrides = decode_overrides(
            &sub_item.name,
            self.line_pattern.as_deref(),
            self.line_color.as_deref(),
            self.line_weight,
        );
    }
}

/// Exact normalized-name match first, then case-insensitive.
fn find_sub_item<'a>(container: &'a mut Container, name: &str) -> Option<&'a mut SubItem> {
    let normalized = cad_model::normalize_name(name);
    let index = container
        .sub_items
        .iter()
        .position(|s| s.name == normalized)
        .or_else(|| {
            container
                .sub_items
                .iter()
                .position(|s| cad_model::names_equal(&s.name, &normalized))
        })?;
    container.sub_items.get_mut(index)
}

/// Invalid stored values degrade to "no override".
fn decode_overrides(
    owner: &str,
    pattern: Option<&str>,
    color: Option<&str>,
    weight: Option<i32>,
) -> OverrideSet {
    let color = color.and_then(|raw| match Rgb::parse_hex(raw) {
        Ok(rgb) => Some(rgb),
        Err(e) => {
            tracing::warn!(entity = %owner, error = %e, "dropping stored color");
            None
        }
    });
    let line_weight = weight.and_then(|raw| match LineWeight::new(raw) {
        Ok(w) => Some(w),
        Err(e) => {
            if raw > 0 {
                tracing::warn!(entity = %owner, error = %e, "dropping stored line weight");
            }
            None
        }
    });
    OverrideSet {
        color,
        line_pattern: pattern.filter(|p| !p.is_empty()).map(str::to_string),
        line_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cad_model::ExternalId;

    fn walls() -> Container {
        Container::new(ExternalId::from_raw(1), "Floor.dwg").with_sub_items([
            SubItem::new(ExternalId::from_raw(10), "Walls"),
            SubItem::new(ExternalId::from_raw(11), "Doors"),
        ])
    }

    #[test]
    fn legacy_boolean_entries_clear_overrides() {
        let json = r#"{"visible": true, "subitems": {"Walls": false}}"#;
        let record: ContainerRecord = serde_json::from_str(json).unwrap();
        let mut container = walls();
        for sub_item in &mut container.sub_items {
            sub_item.overrides.line_pattern = Some("Dashed".into());
        }
        let counts = record.apply_to(&mut container);
        assert_eq!(counts.sub_items_updated, 1);
        let walls = container.sub_item_by_name("Walls").unwrap();
        assert!(!walls.visible);
        assert!(walls.overrides.is_empty());
        assert_eq!(
            container.sub_item_by_name("Doors").unwrap().overrides.line_pattern.as_deref(),
            Some("Dashed")
        );
    }

    #[test]
    fn pascal_case_fields_are_accepted() {
        let json = r##"{
            "Visibility": false,
            "Halftone": true,
            "LineColor": "#00FF00",
            "LineWeight": 4,
            "Layers": {"walls": {"Visibility": false, "LinePattern": "Dashed"}}
        }"##;
        let record: ContainerRecord = serde_json::from_str(json).unwrap();
        let mut container = walls();
        record.apply_to(&mut container);
        assert!(!container.visible);
        assert!(container.halftone);
        assert_eq!(container.overrides.color, Some(Rgb::new(0, 255, 0)));
        assert_eq!(container.overrides.line_weight.map(LineWeight::get), Some(4));
        let walls = container.sub_item_by_name("Walls").unwrap();
        assert!(!walls.visible);
        assert_eq!(walls.overrides.line_pattern.as_deref(), Some("Dashed"));
    }

    #[test]
    fn invalid_values_degrade_to_absent() {
        let json = r#"{"visible": true, "lineColor": "chartreuse", "lineWeight": 99}"#;
        let record: ContainerRecord = serde_json::from_str(json).unwrap();
        let mut container = walls();
        container.overrides.color = Some(Rgb::new(1, 2, 3));
        record.apply_to(&mut container);
        assert!(container.overrides.is_empty());
    }

    #[test]
    fn unrecognized_entries_are_counted_not_fatal() {
        let json = r#"{"visible": true, "subitems": {"Walls": 7, "Doors": null}}"#;
        let record: ContainerRecord = serde_json::from_str(json).unwrap();
        let counts = record.apply_to(&mut walls());
        assert_eq!(counts.values_ignored, 2);
        assert_eq!(counts.sub_items_updated, 0);
    }
}
