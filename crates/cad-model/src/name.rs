//! Name normalization and case-insensitive comparison.
//!
//! Container and layer names arrive from the target in arbitrary Unicode
//! forms. Every name is stored in NFKC form (which also folds full-width
//! characters) and compared through its lowercase key.

use std::cmp::Ordering;
use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Compatibility-normalizes a raw name (NFKC).
pub fn normalize_name(raw: &str) -> String {
    raw.nfkc().collect()
}

/// Comparison key of a name: normalized, then lowercased.
pub fn name_key(name: &str) -> String {
    normalize_name(name).to_lowercase()
}

/// Case-insensitive ordering used for display and persistence order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    name_key(a).cmp(&name_key(b)).then_with(|| a.cmp(b))
}

pub fn names_equal(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Whether `name` contains an already-computed query key.
pub fn name_contains_key(name: &str, query_key: &str) -> bool {
    name_key(name).contains(query_key)
}

/// Set of names with case-insensitive membership.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    keys: HashSet<String>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `name`; returns false when an equivalent name is already present.
    pub fn insert(&mut self, name: &str) -> bool {
        self.keys.insert(name_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&name_key(name))
    }
}
