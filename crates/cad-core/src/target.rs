//! The rendering target the hierarchy is displayed against.
//!
//! Hosts implement [`RenderTarget`] over their own object model. All calls
//! happen on the thread that owns the target; writes are only valid inside
//! a transaction (see [`crate::transaction`]).

use cad_model::{ExternalId, OverrideRecord, PatternId, ViewId};

use crate::error::TargetResult;

/// A sub-item as enumerated by the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubItemInfo {
    pub id: ExternalId,
    pub name: String,
}

/// A container and its sub-items as enumerated by the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: ExternalId,
    pub name: String,
    pub sub_items: Vec<SubItemInfo>,
}

pub trait RenderTarget {
    fn view_name(&self, view: ViewId) -> TargetResult<String>;

    /// Containers (and their sub-items) visible in the scope of `view`.
    fn enumerate_entities(&self, view: ViewId) -> TargetResult<Vec<ContainerInfo>>;

    /// The template governing `view`, if any.
    fn resolve_template(&self, view: ViewId) -> TargetResult<Option<ViewId>>;

    fn is_hidden(&self, view: ViewId, id: ExternalId) -> TargetResult<bool>;

    fn set_hidden(&mut self, view: ViewId, id: ExternalId, hidden: bool) -> TargetResult<()>;

    fn get_overrides(&self, view: ViewId, id: ExternalId) -> TargetResult<OverrideRecord>;

    fn set_overrides(
        &mut self,
        view: ViewId,
        id: ExternalId,
        record: &OverrideRecord,
    ) -> TargetResult<()>;

    /// Case-insensitive lookup in the line-pattern catalog.
    fn find_pattern_id_by_name(&self, name: &str) -> Option<PatternId>;

    fn pattern_name(&self, id: PatternId) -> Option<String>;

    /// Names of every line pattern in the catalog.
    fn line_patterns(&self) -> Vec<String>;

    fn begin_transaction(&mut self, name: &str) -> TargetResult<()>;

    fn commit_transaction(&mut self) -> TargetResult<()>;

    fn rollback_transaction(&mut self);
}

/// The view writes (and reads) of `view` actually land on: its template when
/// one governs it, otherwise the view itself.
pub fn effective_view<T: RenderTarget + ?Sized>(target: &T, view: ViewId) -> TargetResult<ViewId> {
    Ok(target.resolve_template(view)?.unwrap_or(view))
}
