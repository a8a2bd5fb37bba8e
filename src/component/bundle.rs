use super::Component;
use crate::entity::Entity;
use crate::store::ComponentIndex;

/// A group of components attached to an entity together.
///
/// Implemented for tuples of components up to 16 elements (including the
/// empty tuple). Components are written in declaration order, so a later
/// entry of the same type within one bundle replaces an earlier one.
///
/// Tuples are flat: every element is itself a component. A single
/// component is attached as `(component,)` or through
/// [`Store::insert`](crate::store::Store::insert).
pub trait Bundle: 'static {
    /// Writes the components of this bundle to store.
    fn write(self, writer: &mut BundleWriter<'_>);
}

/// Writes the components of a [`Bundle`] into one entity's slots.
pub struct BundleWriter<'w> {
    index: &'w mut ComponentIndex,
    entity: Entity,
}

impl<'w> BundleWriter<'w> {
    pub(crate) fn new(index: &'w mut ComponentIndex, entity: Entity) -> Self {
        Self { index, entity }
    }

    /// Writes a component, replacing a prior instance of its type.
    pub fn write<C: Component>(&mut self, component: C) {
        self.index.insert(self.entity, component);
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    struct Name(&'static str);
    struct Age(u32);

    #[test]
    fn tuple_bundle_writes_every_component() {
        let mut store = Store::new();
        let entity =
            store.spawn_with((Name("Alexandra"), Age(u32::MAX))).unwrap();

        assert!(store.has::<Name>(entity));
        assert_eq!(store.get::<Name>(entity).unwrap().0, "Alexandra");
        assert_eq!(store.get::<Age>(entity).unwrap().0, u32::MAX);
    }

    #[test]
    fn later_entry_of_same_type_wins() {
        let mut store = Store::new();
        let entity =
            store.spawn_with((Age(1), Name("a"), Age(2))).unwrap();

        assert_eq!(store.get::<Age>(entity).unwrap().0, 2);
        assert_eq!(store.components_of(entity).len(), 2);
    }
}
