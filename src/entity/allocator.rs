// Allocation scheme adapted from
// [HECS](https://github.com/Ralith/hecs/blob/master/src/entities.rs).

use std::iter::Enumerate;
use std::num::NonZeroU32;
use std::slice;
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

use super::{EntitiesExhausted, Entity};

/// Manages and allocates the entities of a [`Store`](crate::store::Store).
///
/// This is the one piece of the store that is safe to drive from multiple
/// threads: [`Entities::reserve`] mints through atomic cursors and the
/// reservations are materialized by the next `&mut self` call.
#[derive(Debug)]
pub struct Entities {
    slots: Vec<EntitySlot>,
    /// Freed indices awaiting reuse, popped most-recently-freed first.
    pending: Vec<u32>,
    /// When `>= 0`, the count of `pending` entries not yet handed out by
    /// [`Entities::reserve`]. When `< 0`, its magnitude is the count of
    /// fresh indices promised past `slots.len()`.
    cursor: AtomicIsize,
    alive: usize,
    reserved: AtomicUsize,
}

/// Describes the current occupant (or absence) of one entity index.
#[derive(Debug, Clone, Copy)]
struct EntitySlot {
    version: NonZeroU32,
    occupied: bool,
}

/// An iterator over the live entities of a [`Store`](crate::store::Store).
#[derive(Clone)]
pub struct EntityIter<'a> {
    inner: Enumerate<slice::Iter<'a, EntitySlot>>,
}

impl Entities {
    pub fn new() -> Self {
        let slots = Vec::new();
        let pending = Vec::new();
        let cursor = AtomicIsize::new(0);
        let alive = 0;
        let reserved = AtomicUsize::new(0);

        Self { slots, pending, cursor, alive, reserved }
    }

    /// Count of live entities, including unflushed reservations.
    pub fn len(&self) -> usize {
        self.alive + self.reserved.load(Ordering::Relaxed)
    }

    /// Whether there are any live entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the entity is currently live.
    pub fn contains(&self, entity: Entity) -> bool {
        if let Some(slot) = self.slots.get(entity.index as usize) {
            if slot.version != entity.version {
                return false;
            }

            if slot.occupied {
                return true;
            }

            // a freed slot at the current version can only be live if its
            // index was reserved off the free list and not yet flushed
            let n = self.cursor.load(Ordering::Relaxed).max(0) as usize;

            self.pending[n..].contains(&entity.index)
        } else {
            // a fresh index promised by `reserve` but not yet flushed
            let n = self.cursor.load(Ordering::Relaxed);

            entity.version.get() == 1
                && n < 0
                && (entity.index as usize) < self.slots.len() + n.unsigned_abs()
        }
    }

    /// Iterate over the live entities, in index order.
    ///
    /// Must only be called when all reservations have been flushed.
    pub fn iter(&self) -> EntityIter<'_> {
        debug_assert_eq!(
            self.reserved.load(Ordering::Relaxed),
            0,
            "`Entities::iter` requires all reserved entities to have been \
             flushed",
        );

        EntityIter { inner: self.slots.iter().enumerate() }
    }

    /// Allocate a new entity, reusing a freed index if one is pending.
    ///
    /// Flushes all outstanding reservations first. Errors when the index
    /// space is spent and nothing is pending.
    pub fn alloc(&mut self) -> Result<Entity, EntitiesExhausted> {
        self.flush();

        if let Some(index) = self.pending.pop() {
            *self.cursor.get_mut() = self.pending.len() as isize;

            let slot = &mut self.slots[index as usize];

            slot.occupied = true;
            self.alive += 1;

            Ok(Entity::new(index, slot.version))
        } else {
            let index = u32::try_from(self.slots.len())
                .map_err(|_| EntitiesExhausted)?;

            self.slots.push(EntitySlot::new());
            self.alive += 1;

            Ok(Entity::new(index, NonZeroU32::MIN))
        }
    }

    /// Reserve a new entity through `&self`.
    ///
    /// Reserved entities are fully allocated by the next mutating call
    /// (see [`Entities::flush`]).
    ///
    /// # Panics
    ///
    /// Panics on index-space exhaustion; this path has no way to report
    /// the error without giving up its lock-freedom.
    pub fn reserve(&self) -> Entity {
        self.reserved.fetch_add(1, Ordering::Relaxed);

        let n = self.cursor.fetch_sub(1, Ordering::Relaxed);

        if n > 0 {
            let index = self.pending[(n - 1) as usize];

            Entity::new(index, self.slots[index as usize].version)
        } else {
            let index = u32::try_from(self.slots.len() as isize - n)
                .expect("entity index space exhausted");

            Entity::new(index, NonZeroU32::MIN)
        }
    }

    /// Free a live entity, making its index eligible for reuse.
    ///
    /// Returns `None` if the entity is not live (already freed, stale
    /// version, or never minted).
    pub fn free(&mut self, entity: Entity) -> Option<()> {
        self.flush();

        let slot = self.slots.get_mut(entity.index as usize)?;

        if !slot.occupied || slot.version != entity.version {
            return None;
        }

        slot.occupied = false;
        self.alive -= 1;

        // a slot whose version space is spent is retired instead of
        // returned to the free list
        if let Some(next) = slot.version.checked_add(1) {
            slot.version = next;
            self.pending.push(entity.index);
            *self.cursor.get_mut() = self.pending.len() as isize;
        }

        Some(())
    }

    /// Remove all entities and reset allocation state.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.pending.clear();
        *self.cursor.get_mut() = 0;
        self.alive = 0;
        *self.reserved.get_mut() = 0;
    }

    /// Fully allocates all reserved entities.
    pub fn flush(&mut self) {
        if *self.reserved.get_mut() == 0 {
            return;
        }

        let cursor = self.cursor.get_mut();

        let new_cursor = if *cursor >= 0 {
            *cursor as usize
        } else {
            // fresh indices past the end were promised; grow to cover them
            let promised = cursor.unsigned_abs();

            self.slots.resize(self.slots.len() + promised, EntitySlot::new());
            self.alive += promised;

            0
        };

        // `pending[new_cursor..]` was handed out by `reserve`
        for &index in &self.pending[new_cursor..] {
            self.slots[index as usize].occupied = true;
        }

        self.alive += self.pending.len() - new_cursor;
        self.pending.truncate(new_cursor);

        *cursor = new_cursor as isize;
        *self.reserved.get_mut() = 0;
    }
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitySlot {
    /// A new occupied slot at the first version.
    const fn new() -> Self {
        Self { version: NonZeroU32::MIN, occupied: true }
    }
}

impl Iterator for EntityIter<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|(index, slot)| {
            slot.occupied.then(|| Entity::new(index as u32, slot.version))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}
