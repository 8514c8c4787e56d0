//! Entity revisions.

use serde::{Deserialize, Serialize};

/// Revision of an entity, incremented by every event applied to it.
///
/// A new entity is at revision 0; its first event carries revision 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(i64);

impl Revision {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Revision of an entity that has no events yet.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Revision carried by an entity's first event.
    pub fn first() -> Self {
        Self(1)
    }

    /// The following revision, staying at `i64::MAX` once reached.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Revision {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Revision> for i64 {
    fn from(revision: Revision) -> Self {
        revision.0
    }
}
