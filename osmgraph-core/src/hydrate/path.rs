//! Cycle guard for relation hydration.

use std::collections::HashSet;

/// Relation ids currently open on the active resolution path.
///
/// An id is entered when its relation starts resolving and left once all of
/// its members are done. Siblings never see each other: a relation shared by
/// two branches is open on at most one of them at a time.
///
/// ```
/// use osmgraph_core::hydrate::OpenPath;
///
/// let mut path = OpenPath::default();
/// assert!(path.enter(1));
/// assert!(!path.enter(1));
/// assert!(path.leave(1));
/// assert!(!path.contains(1));
/// ```
#[derive(Debug, Default, Clone)]
pub struct OpenPath {
    open: HashSet<i64>,
}

impl OpenPath {
    /// Mark `id` as open. Returns `false` when it was already open, which
    /// means following it again would close a cycle.
    pub fn enter(&mut self, id: i64) -> bool {
        self.open.insert(id)
    }

    /// Mark `id` as finished. Returns `false` if it was not open.
    pub fn leave(&mut self, id: i64) -> bool {
        self.open.remove(&id)
    }

    /// Whether `id` is currently open.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.open.contains(&id)
    }
}
