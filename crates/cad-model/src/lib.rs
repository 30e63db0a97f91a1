//! Entity model for imported drawings (containers), their layers
//! (sub-items), and the graphic overrides displayed against a view.

pub mod color;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod name;
pub mod overrides;

pub use color::Rgb;
pub use entity::{Container, EntityKey, EntityKind, EntityRef, SubItem};
pub use error::{ModelError, Result};
pub use hierarchy::Hierarchy;
pub use ids::{ExternalId, PatternId, ViewId};
pub use name::{NameSet, compare_names, name_contains_key, name_key, names_equal, normalize_name};
pub use overrides::{LineColor, LineWeight, OverrideRecord, OverrideSet};
