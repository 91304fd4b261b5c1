//! Occupancy tracking
//!
//! Treats many overlapping occupants as a single presence: the tracker only
//! reports a change when the first occupant arrives or the last one leaves.

use ahash::AHashSet;
use std::hash::Hash;

/// Effect of an [`Occupancy::enter`] or [`Occupancy::exit`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Went from empty to occupied
    BecameOccupied,
    /// Last occupant left
    BecameEmpty,
    Unchanged,
}

/// A set of current occupants
///
/// # Example
///
/// ```rust
/// use curvefn::{Occupancy, Transition};
///
/// let mut zone = Occupancy::new();
/// assert_eq!(zone.enter("a"), Transition::BecameOccupied);
/// assert_eq!(zone.enter("b"), Transition::Unchanged);
/// assert_eq!(zone.exit(&"a"), Transition::Unchanged);
/// assert_eq!(zone.exit(&"b"), Transition::BecameEmpty);
/// ```
#[derive(Debug, Clone)]
pub struct Occupancy<K> {
    occupants: AHashSet<K>,
}

impl<K: Eq + Hash> Default for Occupancy<K> {
    fn default() -> Self {
        Self {
            occupants: AHashSet::new(),
        }
    }
}

impl<K: Eq + Hash> Occupancy<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `occupant` as present; entering twice is `Unchanged`
    pub fn enter(&mut self, occupant: K) -> Transition {
        let was_empty = self.occupants.is_empty();
        if !self.occupants.insert(occupant) {
            return Transition::Unchanged;
        }

        if was_empty {
            tracing::debug!("occupied");
            Transition::BecameOccupied
        } else {
            Transition::Unchanged
        }
    }

    /// Record `occupant` as gone; unknown occupants are `Unchanged`
    pub fn exit(&mut self, occupant: &K) -> Transition {
        if !self.occupants.remove(occupant) {
            return Transition::Unchanged;
        }

        if self.occupants.is_empty() {
            tracing::debug!("emptied");
            Transition::BecameEmpty
        } else {
            Transition::Unchanged
        }
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    pub fn contains(&self, occupant: &K) -> bool {
        self.occupants.contains(occupant)
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Forget every occupant without reporting a transition
    pub fn clear(&mut self) {
        self.occupants.clear();
    }
}
