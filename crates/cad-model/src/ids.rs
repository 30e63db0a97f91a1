//! Stable identities for objects owned by the rendering target.
//!
//! The target hands out its own handle types; hosts convert them into these
//! once, at the boundary, and every other layer works with the opaque values.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(
    /// Handle of a container or sub-item inside the rendering target.
    ExternalId
);

opaque_id!(
    /// Handle of a view (or view template) inside the rendering target.
    ViewId
);

opaque_id!(
    /// Handle of a line pattern in the target's pattern catalog.
    PatternId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&ExternalId::from_raw(42)).unwrap();
        assert_eq!(json, "42");
        let back: ViewId = serde_json::from_str("7").unwrap();
        assert_eq!(back.raw(), 7);
    }
}
