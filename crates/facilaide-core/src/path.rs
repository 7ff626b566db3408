//! # Declarative Path Extraction
//!
//! Each semantic field of the normalized record is described by a
//! [`FieldRule`]: an ordered list of candidate access paths into the raw
//! input and a coercion function. One generic traversal evaluates every
//! rule, so supporting a new upstream shape means adding a path to a table.
//!
//! A path is a slice of segments. A segment addresses an object key, or an
//! array index when the current node is an array and the segment is a
//! decimal integer (`["enfants", "0", "prenom"]`).

use serde_json::Value;

/// A candidate access path into the raw input.
pub type FieldPath = &'static [&'static str];

/// Follow `path` from `root`. Returns `None` if any step is missing or the
/// final value is `null`.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    (!current.is_null()).then_some(current)
}

/// The first path (in priority order) that reaches a non-null value.
pub fn first_present<'a>(root: &'a Value, paths: &[FieldPath]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(root, path))
}

/// How a rule picks among its candidate paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The first non-null value wins; if it fails coercion the field is
    /// absent. Upstream priority is trusted over fallback paths.
    FirstPresent,
    /// Paths are tried in order until one coerces successfully.
    FirstCoercible,
}

/// An ordered list of candidate paths plus the coercion applied to the
/// selected value.
#[derive(Debug)]
pub struct FieldRule<T> {
    /// Candidate paths, highest priority first.
    pub paths: &'static [FieldPath],
    /// Coercion from the raw leaf.
    pub coerce: fn(&Value) -> Option<T>,
    /// Selection policy.
    pub selection: Selection,
}

impl<T> Clone for FieldRule<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldRule<T> {}

impl<T> FieldRule<T> {
    /// A rule where the first present value wins.
    pub const fn first_present(
        paths: &'static [FieldPath],
        coerce: fn(&Value) -> Option<T>,
    ) -> Self {
        Self {
            paths,
            coerce,
            selection: Selection::FirstPresent,
        }
    }

    /// A rule that keeps trying paths until one coerces.
    pub const fn first_coercible(
        paths: &'static [FieldPath],
        coerce: fn(&Value) -> Option<T>,
    ) -> Self {
        Self {
            paths,
            coerce,
            selection: Selection::FirstCoercible,
        }
    }

    /// Evaluate the rule against the raw input.
    pub fn resolve(&self, root: &Value) -> Option<T> {
        match self.selection {
            Selection::FirstPresent => first_present(root, self.paths).and_then(self.coerce),
            Selection::FirstCoercible => self
                .paths
                .iter()
                .filter_map(|path| lookup(root, path))
                .find_map(self.coerce),
        }
    }

    /// The raw value this rule would select, before coercion.
    pub fn raw<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        first_present(root, self.paths)
    }
}
