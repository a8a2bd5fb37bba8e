//! Defines entities, the opaque identities in a [`Store`](crate::store::Store).

use std::fmt;
use std::num::NonZeroU32;

use thiserror::Error;

pub use self::allocator::EntityIter;
pub(crate) use self::allocator::Entities;

mod allocator;

/// An identifier for an entity in a [`Store`](crate::store::Store).
///
/// 64 bits wide: a slot index plus a version. Freeing an entity bumps its
/// slot's version, so a stale handle never compares equal to the entity
/// that later recycles the same slot.
///
/// Entities are only ever minted by a store; they carry no payload of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    pub(crate) index: u32,
    pub(crate) version: NonZeroU32,
}

/// An error for when a requested entity was not found in the store.
#[derive(Debug, Clone, Copy, Error)]
#[error("entity not found: {0}")]
pub struct EntityNotFound(pub Entity);

/// An error for when the entity index space is exhausted.
///
/// Raised when every index has been handed out and the free list is
/// empty. This is fatal: no further entities can be minted from the
/// store.
#[derive(Debug, Clone, Copy, Error)]
#[error("entity index space exhausted")]
pub struct EntitiesExhausted;

impl Entity {
    pub(crate) const fn new(index: u32, version: NonZeroU32) -> Self {
        Self { index, version }
    }

    /// The slot index of this entity.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// The version of this entity's slot when it was minted.
    pub const fn version(self) -> u32 {
        self.version.get()
    }

    /// Packs this entity into a single `u64`.
    ///
    /// The ordering of packed bits matches [`Ord`] for [`Entity`].
    pub const fn to_bits(self) -> u64 {
        ((self.index as u64) << 32) | self.version.get() as u64
    }

    /// Unpacks an entity from [`Entity::to_bits`].
    ///
    /// Returns `None` if the version bits are zero, which no minted
    /// entity ever has.
    pub const fn from_bits(bits: u64) -> Option<Self> {
        match NonZeroU32::new(bits as u32) {
            Some(version) => Some(Self { index: (bits >> 32) as u32, version }),
            None => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip() {
        let entity =
            Entity::new(42, NonZeroU32::new(7).unwrap());

        assert_eq!(Entity::from_bits(entity.to_bits()), Some(entity));
        assert_eq!(Entity::from_bits(42 << 32), None);
    }

    #[test]
    fn ordered_by_index_then_version() {
        let a = Entity::new(0, NonZeroU32::new(2).unwrap());
        let b = Entity::new(1, NonZeroU32::new(1).unwrap());

        assert!(a < b);
        assert!(a.to_bits() < b.to_bits());
    }
}
