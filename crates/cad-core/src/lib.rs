//! Layer visibility and graphic-override management for imported drawings.
//!
//! The [`Session`] owns the canonical [`Hierarchy`](cad_model::Hierarchy) of
//! one view and drives everything else:
//!
//! - [`filter`] derives the search-filtered container list.
//! - [`selection`] implements click, modifier-click, range and
//!   select-all-siblings semantics.
//! - [`resolver`] summarizes overrides across a selection as tri-state
//!   values and models the edit applied to them.
//! - [`applicator`] writes visibility and freshly built override records to
//!   the view or its template in one transaction.
//! - [`propagate`] copies one view's state onto other views.
//!
//! The rendering target is abstracted by [`RenderTarget`];
//! [`MemoryTarget`] implements it over a JSON scene.

pub mod applicator;
pub mod collect;
pub mod error;
pub mod filter;
pub mod memory;
pub mod propagate;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod sync;
pub mod target;
pub mod transaction;

pub use applicator::{ApplyItem, ApplyReport, SkippedEntity, apply_batch, build_record};
pub use collect::collect_hierarchy;
pub use error::{CoreError, Result, TargetError, TargetResult};
pub use filter::filter;
pub use memory::{
    CategoryState, MemoryTarget, Scene, SceneContainer, ScenePattern, SceneSubItem, SceneView,
};
pub use propagate::{PropagationReport, ViewPropagation, propagate_to_views};
pub use resolver::{
    FieldEdit, OverrideEdit, OverrideSummary, TriState, effective_overrides, resolve_overrides,
    summarize, weight_edit_from_raw,
};
pub use selection::{ClickModifier, ParentIndex, SelectionController, enumeration_order};
pub use session::{LoadOutcome, OverrideEditContext, Session};
pub use sync::sync_to_canonical;
pub use target::{ContainerInfo, RenderTarget, SubItemInfo, effective_view};
pub use transaction::in_transaction;
