use indexmap::IndexSet;

use super::Store;
use crate::component::{
    Component,
    ComponentId,
    ComponentInfo,
    ComponentQuery,
    UnregisteredComponent,
};
use crate::entity::Entity;

/// # Query methods
///
/// Every query returns an independent snapshot, never a live view into
/// the index: callers may destroy entities while iterating a previously
/// captured result, and the mutation lands in the index for the next
/// query. Snapshot order is deterministic (first-attach order of the
/// relevant column).
impl Store {
    /// All entities currently holding a `C`.
    ///
    /// Errors if `C` was never attached to any entity (see
    /// [`Store::registered`]); a registered type with no current holders
    /// yields an empty set.
    pub fn entities_with<C: Component>(
        &self,
    ) -> Result<IndexSet<Entity>, UnregisteredComponent> {
        let column = self
            .index
            .column(ComponentId::of::<C>())
            .ok_or_else(|| UnregisteredComponent(ComponentInfo::of::<C>()))?;

        Ok(column.entities().collect())
    }

    /// All entities currently holding every component type in `Q`.
    ///
    /// `Q` is a non-empty tuple of component types; duplicates within it
    /// are harmless and argument order never changes the resulting set.
    /// Errors if any named type was never attached.
    ///
    /// A streaming intersection: seeded from the smallest participating
    /// column, then filtered against the rest, so cost is bounded by the
    /// smallest column's size times the number of remaining types.
    pub fn entities_with_all<Q: ComponentQuery>(
        &self,
    ) -> Result<IndexSet<Entity>, UnregisteredComponent> {
        let mut infos = Vec::new();
        Q::components(&mut infos);

        // resolve every column up front so an unknown type fails before
        // any intersection work
        let mut columns = Vec::with_capacity(infos.len());

        for info in infos {
            columns.push(
                self.index
                    .column(info.id())
                    .ok_or(UnregisteredComponent(info))?,
            );
        }

        // intersection is commutative; seeding from the smallest column
        // only affects cost
        columns.sort_unstable_by_key(|column| column.len());

        let Some((seed, rest)) = columns.split_first() else {
            return Ok(IndexSet::new());
        };

        Ok(seed
            .entities()
            .filter(|entity| {
                rest.iter().all(|column| column.contains(*entity))
            })
            .collect())
    }

    /// All components currently attached to the entity, at most one per
    /// type, in type-registration order.
    ///
    /// Empty for entities holding nothing, including destroyed or
    /// never-created ones.
    pub fn components_of(&self, entity: Entity) -> Vec<&dyn Component> {
        self.index
            .columns()
            .filter_map(|column| column.get(entity))
            .collect()
    }

    /// All stored instances of `C`, in first-attach order.
    ///
    /// Errors if `C` was never attached to any entity.
    pub fn components_of_type<C: Component>(
        &self,
    ) -> Result<Vec<&C>, UnregisteredComponent> {
        let column = self
            .index
            .column(ComponentId::of::<C>())
            .ok_or_else(|| UnregisteredComponent(ComponentInfo::of::<C>()))?;

        Ok(column
            .components()
            .filter_map(|component| component.downcast_ref())
            .collect())
    }
}
