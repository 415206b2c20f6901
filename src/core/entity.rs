//! Entity identification.
//!
//! Every card instance on the tabletop has a unique `EntityId`. IDs are
//! allocated densely in creation order, so an ID doubles as the index of
//! the entity in the tabletop's arena and as its position in the
//! "creation order" that persistence reconciliation walks.
//!
//! ```
//! use depths_tabletop::core::{EntityAllocator, EntityId};
//!
//! let mut ids = EntityAllocator::default();
//! assert_eq!(ids.alloc(), EntityId(0));
//! assert_eq!(ids.alloc(), EntityId(1));
//! assert_eq!(ids.allocated(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a live tabletop entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Arena index of this entity.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hands out sequential entity IDs.
#[derive(Clone, Debug, Default)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    /// Allocate the next ID.
    pub fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.next as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.index(), 7);
        assert_eq!(format!("{}", id), "Entity(7)");
    }

    #[test]
    fn test_allocator_is_sequential() {
        let mut ids = EntityAllocator::default();
        let allocated: Vec<_> = (0..4).map(|_| ids.alloc()).collect();
        assert_eq!(allocated, vec![EntityId(0), EntityId(1), EntityId(2), EntityId(3)]);
        assert_eq!(ids.allocated(), 4);
    }

    #[test]
    fn test_ordering_follows_creation() {
        let mut ids = EntityAllocator::default();
        let first = ids.alloc();
        let second = ids.alloc();
        assert!(first < second);
    }
}
