use std::fmt;

use indexmap::IndexMap;

use crate::component::{Component, ComponentId, ComponentInfo};
use crate::entity::Entity;

/// Per-type component storage.
///
/// One [`Column`] per component type that has ever been attached, indexed
/// by dense [`ComponentId`]. Columns are never pruned: a column emptied
/// by detaching keeps its type registered, and queries on it return
/// empty results rather than errors.
#[derive(Debug, Default)]
pub(crate) struct ComponentIndex {
    columns: Vec<Option<Column>>,
}

/// The (entity → instance) map of a single component type.
///
/// Iteration order is first-attach order, which makes query snapshots
/// reproducible.
pub(crate) struct Column {
    info: ComponentInfo,
    map: IndexMap<Entity, Box<dyn Component>>,
}

impl ComponentIndex {
    pub fn new() -> Self {
        Self { columns: Vec::new() }
    }

    /// The column for a component id, if the type was ever attached.
    pub fn column(&self, id: ComponentId) -> Option<&Column> {
        self.columns.get(id.index()).and_then(Option::as_ref)
    }

    fn column_mut(&mut self, id: ComponentId) -> Option<&mut Column> {
        self.columns.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// The column for `C`, registering the type on first use.
    fn column_or_register<C: Component>(&mut self) -> &mut Column {
        let info = ComponentInfo::of::<C>();
        let index = info.id().index();

        if index >= self.columns.len() {
            self.columns.resize_with(index + 1, || None);
        }

        self.columns[index].get_or_insert_with(|| Column::new(info))
    }

    /// Iterate over all registered columns, in registration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().flatten()
    }

    /// Whether the type has ever been attached to any entity.
    pub fn registered(&self, id: ComponentId) -> bool {
        self.column(id).is_some()
    }

    /// Whether the entity currently holds a `C`.
    pub fn contains<C: Component>(&self, entity: Entity) -> bool {
        self.column(ComponentId::of::<C>())
            .is_some_and(|column| column.contains(entity))
    }

    /// Attaches a component, returning the replaced instance if the
    /// entity already held one of this type.
    pub fn insert<C: Component>(
        &mut self,
        entity: Entity,
        component: C,
    ) -> Option<C> {
        self.column_or_register::<C>()
            .map
            .insert(entity, Box::new(component))
            .and_then(|prior| prior.into_any().downcast().ok())
            .map(|boxed| *boxed)
    }

    /// Detaches and returns the entity's `C`, if it holds one.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.column_mut(ComponentId::of::<C>())?
            .map
            // shift (not swap) so column order stays first-attach order
            .shift_remove(&entity)
            .and_then(|component| component.into_any().downcast().ok())
            .map(|boxed| *boxed)
    }

    /// Detaches every component of the entity, across all columns.
    pub fn remove_entity(&mut self, entity: Entity) {
        for column in self.columns.iter_mut().flatten() {
            column.map.shift_remove(&entity);
        }
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.column(ComponentId::of::<C>())?
            .map
            .get(&entity)?
            .downcast_ref()
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.column_mut(ComponentId::of::<C>())?
            .map
            .get_mut(&entity)?
            .downcast_mut()
    }

    /// Drops every stored component. Types stay registered.
    pub fn clear(&mut self) {
        for column in self.columns.iter_mut().flatten() {
            column.map.clear();
        }
    }
}

impl Column {
    fn new(info: ComponentInfo) -> Self {
        let map = IndexMap::new();

        Self { info, map }
    }

    pub fn info(&self) -> ComponentInfo {
        self.info
    }

    /// Count of entities currently holding this type.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.map.contains_key(&entity)
    }

    /// The entities holding this type, in first-attach order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.map.keys().copied()
    }

    /// The stored instances, in first-attach order.
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.map.values().map(Box::as_ref)
    }

    pub fn get(&self, entity: Entity) -> Option<&dyn Component> {
        self.map.get(&entity).map(Box::as_ref)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("info", &self.info)
            .field("entities", &self.map.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
