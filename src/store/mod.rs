//! Defines the [`Store`], the entity-component database.

pub(crate) use self::index::ComponentIndex;
use crate::component::{
    Bundle,
    BundleWriter,
    Component,
    ComponentId,
    ComponentNotFound,
};
use crate::entity::{
    Entities,
    EntitiesExhausted,
    Entity,
    EntityIter,
    EntityNotFound,
};

mod index;
mod query;

/// An in-memory entity-component store.
///
/// Owns the identity registry (live entities plus a free list of
/// recycled indices) and one (entity → instance) map per component type.
/// Designed for a single logical writer per tick; the only operation
/// safe to call from other threads is [`Store::reserve`].
///
/// - [Entity methods](#entity-methods)
/// - [Component methods](#component-methods)
/// - [Query methods](#query-methods)
#[derive(Debug, Default)]
pub struct Store {
    entities: Entities,
    index: ComponentIndex,
}

impl Store {
    /// Creates a new empty store.
    pub fn new() -> Self {
        let entities = Entities::new();
        let index = ComponentIndex::new();

        Self { entities, index }
    }

    /// Removes every entity and component, keeping the store usable.
    ///
    /// All component instances are dropped. Component types stay
    /// registered (see [`Store::registered`]).
    pub fn clear(&mut self) {
        self.index.clear();
        self.entities.clear();
    }

    /// Consumes the store, dropping every component instance and all
    /// identity state.
    ///
    /// Teardown is ownership-scoped: a disposed store cannot be touched
    /// again, enforced at compile time rather than at runtime.
    pub fn dispose(self) {
        drop(self);
    }
}

/// # Entity methods
impl Store {
    /// Count of live entities, including unflushed reservations.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the store contains no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns `true` if the entity is live in this store.
    ///
    /// A destroyed entity's handle stays dead forever, even after its
    /// index is recycled to an unrelated entity.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Creates a new entity with no components.
    ///
    /// Reuses the most recently freed index if any, otherwise mints a
    /// fresh one. Errors when the index space is exhausted and nothing
    /// is free; that condition is fatal for the store.
    pub fn spawn(&mut self) -> Result<Entity, EntitiesExhausted> {
        self.entities.alloc()
    }

    /// Creates a new entity holding the components of `bundle`.
    ///
    /// Equivalent to [`Store::spawn`] followed by
    /// [`Store::insert_bundle`].
    pub fn spawn_with(
        &mut self,
        bundle: impl Bundle,
    ) -> Result<Entity, EntitiesExhausted> {
        let entity = self.entities.alloc()?;

        self.insert_bundle(entity, bundle);

        Ok(entity)
    }

    /// Reserves a new entity through `&self`.
    ///
    /// The one minting path that is safe under concurrent callers.
    /// Reserved entities are live immediately but hold no components
    /// until attached; the reservation is fully materialized by the next
    /// mutating call.
    ///
    /// # Panics
    ///
    /// Panics on index-space exhaustion (see [`EntitiesExhausted`]); the
    /// lock-free path has no way to return the error.
    pub fn reserve(&self) -> Entity {
        self.entities.reserve()
    }

    /// Destroys an entity: every component it holds is removed and
    /// dropped, and its index is returned to the free list.
    ///
    /// Errors if the entity is not live (never created, already
    /// destroyed, or a stale handle to a recycled index). Use
    /// [`Store::despawn_if_live`] when absence is expected.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), EntityNotFound> {
        if !self.entities.contains(entity) {
            return Err(EntityNotFound(entity));
        }

        self.index.remove_entity(entity);

        let freed = self.entities.free(entity);
        debug_assert!(freed.is_some());

        Ok(())
    }

    /// Destroys an entity if it is live; a no-op otherwise.
    ///
    /// Returns whether the entity was destroyed.
    pub fn despawn_if_live(&mut self, entity: Entity) -> bool {
        self.despawn(entity).is_ok()
    }

    /// Iterate over the live entities, in index order.
    pub fn iter(&self) -> EntityIter<'_> {
        self.entities.iter()
    }
}

/// # Component methods
impl Store {
    /// Attaches a component to an entity, registering the type on first
    /// use.
    ///
    /// If the entity already holds a component of this type, the prior
    /// instance is replaced and returned. Liveness of `entity` is not
    /// validated; attaching to a destroyed entity is a caller error.
    pub fn insert<C: Component>(
        &mut self,
        entity: Entity,
        component: C,
    ) -> Option<C> {
        self.entities.flush();

        self.index.insert(entity, component)
    }

    /// Attaches every component of a bundle to an entity.
    ///
    /// Equivalent to repeated [`Store::insert`] in declaration order; a
    /// later same-type entry within the bundle wins.
    pub fn insert_bundle(&mut self, entity: Entity, bundle: impl Bundle) {
        self.entities.flush();

        bundle.write(&mut BundleWriter::new(&mut self.index, entity));
    }

    /// Detaches and returns the entity's `C`.
    ///
    /// Errors if the entity does not hold one; check [`Store::has`]
    /// first or use [`Store::remove_if_present`] when absence is
    /// expected.
    pub fn remove<C: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<C, ComponentNotFound> {
        self.entities.flush();

        self.index
            .remove(entity)
            .ok_or_else(|| ComponentNotFound::new::<C>(entity))
    }

    /// Detaches and returns the entity's `C` if it holds one; a no-op
    /// otherwise.
    pub fn remove_if_present<C: Component>(
        &mut self,
        entity: Entity,
    ) -> Option<C> {
        self.entities.flush();

        self.index.remove(entity)
    }

    /// Returns `true` if the entity currently holds a `C`.
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.index.contains::<C>(entity)
    }

    /// Returns `true` if `C` has ever been attached to any entity,
    /// regardless of current occupancy.
    ///
    /// Distinguishes "this type was never used" (likely a caller bug)
    /// from "no entity currently holds it" (a valid empty result).
    pub fn registered<C: Component>(&self) -> bool {
        self.index.registered(ComponentId::of::<C>())
    }

    /// Borrows the entity's `C`.
    ///
    /// Errors if the entity does not hold one; use [`Store::get_opt`]
    /// when absence is expected.
    pub fn get<C: Component>(
        &self,
        entity: Entity,
    ) -> Result<&C, ComponentNotFound> {
        self.index
            .get(entity)
            .ok_or_else(|| ComponentNotFound::new::<C>(entity))
    }

    /// Mutably borrows the entity's `C`.
    ///
    /// Errors if the entity does not hold one; use
    /// [`Store::get_opt_mut`] when absence is expected.
    pub fn get_mut<C: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut C, ComponentNotFound> {
        self.entities.flush();

        self.index
            .get_mut(entity)
            .ok_or_else(|| ComponentNotFound::new::<C>(entity))
    }

    /// Borrows the entity's `C`, or `None` if it holds none.
    pub fn get_opt<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.index.get(entity)
    }

    /// Mutably borrows the entity's `C`, or `None` if it holds none.
    pub fn get_opt_mut<C: Component>(
        &mut self,
        entity: Entity,
    ) -> Option<&mut C> {
        self.entities.flush();

        self.index.get_mut(entity)
    }
}
