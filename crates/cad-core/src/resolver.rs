//! Summarizing override state across several entities, and the edit that
//! is later applied to them.

use cad_model::{
    EntityKey, LineWeight, ModelError, OverrideRecord, OverrideSet, Rgb, ViewId,
};

use crate::error::Result;
use crate::target::{RenderTarget, effective_view};

/// A property summarized across one or more entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriState<T> {
    /// Every entity has the same value; `None` means no override.
    Uniform(Option<T>),
    Varies,
}

impl<T: PartialEq> TriState<T> {
    /// Folds the next entity's effective value in. Once a field varies it
    /// stays that way.
    fn merge(&mut self, value: Option<T>) {
        if let Self::Uniform(current) = self
            && *current != value
        {
            *self = Self::Varies;
        }
    }

    pub fn is_varies(&self) -> bool {
        matches!(self, Self::Varies)
    }

    /// The shared value, when uniform.
    pub fn uniform(&self) -> Option<&Option<T>> {
        match self {
            Self::Uniform(value) => Some(value),
            Self::Varies => None,
        }
    }
}

impl<T> Default for TriState<T> {
    fn default() -> Self {
        Self::Uniform(None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSummary {
    pub color: TriState<Rgb>,
    pub pattern: TriState<String>,
    pub weight: TriState<LineWeight>,
    /// Number of entities that contributed.
    pub entities: usize,
}

/// Summarizes effective override sets, seeding from the first.
pub fn summarize<'a>(sets: impl IntoIterator<Item = &'a OverrideSet>) -> OverrideSummary {
    let mut sets = sets.into_iter();
    let Some(first) = sets.next() else {
        return OverrideSummary::default();
    };
    let mut summary = OverrideSummary {
        color: TriState::Uniform(first.color),
        pattern: TriState::Uniform(first.line_pattern.clone()),
        weight: TriState::Uniform(first.line_weight),
        entities: 1,
    };
    for set in sets {
        summary.color.merge(set.color);
        summary.pattern.merge(set.line_pattern.clone());
        summary.weight.merge(set.line_weight);
        summary.entities += 1;
    }
    summary
}

/// Effective values of a target record. A pattern counts only while its id
/// still resolves in the catalog.
pub fn effective_overrides<T: RenderTarget + ?Sized>(
    target: &T,
    record: &OverrideRecord,
) -> OverrideSet {
    OverrideSet {
        color: record.effective_color(),
        line_pattern: record.line_pattern.and_then(|id| target.pattern_name(id)),
        line_weight: record.effective_weight(),
    }
}

/// Reads the current override state of `keys` from the target and
/// summarizes it. Objects that cannot be read individually are left out.
pub fn resolve_overrides<T: RenderTarget + ?Sized>(
    target: &T,
    view: ViewId,
    keys: &[EntityKey],
) -> Result<OverrideSummary> {
    let read_view = effective_view(target, view)?;
    let mut sets = Vec::with_capacity(keys.len());
    for key in keys {
        match target.get_overrides(read_view, key.id()) {
            Ok(record) => sets.push(effective_overrides(target, &record)),
            Err(e) if e.is_recoverable() => {
                tracing::debug!(entity = %key, error = %e, "skipping unreadable overrides");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(summarize(&sets))
}

/// What the user did to one property in the edit surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldEdit<T> {
    /// Not touched; the existing override stays.
    #[default]
    Untouched,
    Set(T),
    /// Explicitly removed.
    Clear,
}

impl<T: Clone> FieldEdit<T> {
    pub fn apply(&self, current: Option<&T>) -> Option<T> {
        match self {
            Self::Untouched => current.cloned(),
            Self::Set(value) => Some(value.clone()),
            Self::Clear => None,
        }
    }

    pub fn is_untouched(&self) -> bool {
        matches!(self, Self::Untouched)
    }
}

/// Interprets a raw line weight from the edit surface: `-1` clears,
/// `1..=16` sets.
pub fn weight_edit_from_raw(raw: i32) -> std::result::Result<FieldEdit<LineWeight>, ModelError> {
    if raw == LineWeight::CLEAR_SENTINEL {
        Ok(FieldEdit::Clear)
    } else {
        LineWeight::new(raw).map(FieldEdit::Set)
    }
}

/// The dirty-tracked result of an override edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideEdit {
    pub color: FieldEdit<Rgb>,
    pub pattern: FieldEdit<String>,
    pub weight: FieldEdit<LineWeight>,
    /// Clears every override and turns halftone off.
    pub clear_all: bool,
}

impl OverrideEdit {
    pub fn clear_all() -> Self {
        Self {
            clear_all: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn color(mut self, edit: FieldEdit<Rgb>) -> Self {
        self.color = edit;
        self
    }

    #[must_use]
    pub fn pattern(mut self, edit: FieldEdit<String>) -> Self {
        self.pattern = edit;
        self
    }

    #[must_use]
    pub fn weight(mut self, edit: FieldEdit<LineWeight>) -> Self {
        self.weight = edit;
        self
    }

    pub fn is_noop(&self) -> bool {
        !self.clear_all
            && self.color.is_untouched()
            && self.pattern.is_untouched()
            && self.weight.is_untouched()
    }

    /// The override set an entity should end up with.
    pub fn desired(&self, current: &OverrideSet) -> OverrideSet {
        if self.clear_all {
            return OverrideSet::default();
        }
        OverrideSet {
            color: self.color.apply(current.color.as_ref()),
            line_pattern: self.pattern.apply(current.line_pattern.as_ref()),
            line_weight: self.weight.apply(current.line_weight.as_ref()),
        }
    }

    /// Halftone after the edit; only a clear-all changes it.
    pub fn desired_halftone(&self, current: bool) -> bool {
        !self.clear_all && current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored(hex: &str) -> OverrideSet {
        OverrideSet::default().with_color(Rgb::parse_hex(hex).unwrap())
    }

    #[test]
    fn differing_colors_vary() {
        let sets = [colored("#FF0000"), colored("#FF0000"), colored("#00FF00")];
        let summary = summarize(&sets);
        assert_eq!(summary.color, TriState::Varies);
        assert_eq!(summary.pattern, TriState::Uniform(None));
        assert_eq!(summary.entities, 3);
    }

    #[test]
    fn identical_colors_are_uniform() {
        let sets = [colored("#FF0000"), colored("#FF0000"), colored("#FF0000")];
        let summary = summarize(&sets);
        assert_eq!(summary.color, TriState::Uniform(Some(Rgb::new(255, 0, 0))));
    }

    #[test]
    fn absent_versus_present_varies() {
        let sets = [OverrideSet::default(), colored("#FF0000")];
        assert!(summarize(&sets).color.is_varies());
    }

    #[test]
    fn varies_is_sticky() {
        let sets = [colored("#FF0000"), colored("#00FF00"), colored("#FF0000")];
        assert!(summarize(&sets).color.is_varies());
    }

    #[test]
    fn empty_selection_summarizes_to_no_override() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary, OverrideSummary::default());
    }

    #[test]
    fn weight_sentinel_clears() {
        assert_eq!(weight_edit_from_raw(-1).unwrap(), FieldEdit::Clear);
        assert_eq!(
            weight_edit_from_raw(5).unwrap(),
            FieldEdit::Set(LineWeight::new(5).unwrap())
        );
        assert!(weight_edit_from_raw(0).is_err());
        assert!(weight_edit_from_raw(-2).is_err());
    }

    #[test]
    fn clearing_weight_keeps_untouched_pattern() {
        let current = OverrideSet::default()
            .with_line_pattern("Dashed")
            .with_line_weight(LineWeight::new(5).unwrap());
        let edit = OverrideEdit::default().weight(weight_edit_from_raw(-1).unwrap());
        let desired = edit.desired(&current);
        assert_eq!(desired.line_weight, None);
        assert_eq!(desired.line_pattern.as_deref(), Some("Dashed"));
    }

    #[test]
    fn clear_all_drops_everything() {
        let current = colored("#123456").with_line_pattern("Dot");
        let edit = OverrideEdit::clear_all().color(FieldEdit::Set(Rgb::new(1, 1, 1)));
        assert!(edit.desired(&current).is_empty());
        assert!(!edit.desired_halftone(true));
        assert!(OverrideEdit::default().desired_halftone(true));
    }
}
