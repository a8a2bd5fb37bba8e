//! Defines components, the typed records attached to entities.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use dashmap::DashMap;
use thiserror::Error;

pub use self::bundle::*;
pub use self::set::*;
use crate::entity::Entity;

mod bundle;
mod set;
mod tuple_impl;

/// A single typed value attached to an entity.
///
/// Implemented for all types that are `Send + Sync + 'static`. Components
/// are plain data: any per-component teardown (for instances holding
/// external resources) is expressed through [`Drop`].
pub trait Component: Send + Sync + 'static {
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;

    #[doc(hidden)]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<C: Send + Sync + 'static> Component for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn Component {
    /// Whether this component is of type `C`.
    pub fn is<C: Component>(&self) -> bool {
        self.as_any().is::<C>()
    }

    /// Borrows this component as a `C`, if it is one.
    pub fn downcast_ref<C: Component>(&self) -> Option<&C> {
        self.as_any().downcast_ref()
    }

    /// Mutably borrows this component as a `C`, if it is one.
    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.as_any_mut().downcast_mut()
    }
}

/// A unique identifier for a component type.
///
/// Ids are dense: allocated in first-use order, they double as indices
/// into per-type storage.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(usize);

impl ComponentId {
    /// Returns the id of the given component type, allocating one on
    /// first use.
    pub fn of<C: Component>() -> Self {
        static REGISTRY: OnceLock<DashMap<TypeId, ComponentId>> =
            OnceLock::new();
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        *REGISTRY
            .get_or_init(Default::default)
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Self(COUNTER.fetch_add(1, Ordering::Relaxed)))
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// Metadata for a component type.
///
/// Carries the dense [`ComponentId`] along with the [`TypeId`] and type
/// name, which diagnostics display.
#[derive(Clone, Copy)]
pub struct ComponentInfo {
    id: ComponentId,
    type_id: TypeId,
    type_name: &'static str,
}

impl ComponentInfo {
    /// Returns the info of the given component type.
    pub fn of<C: Component>() -> Self {
        let id = ComponentId::of::<C>();
        let type_id = TypeId::of::<C>();
        let type_name = type_name::<C>();

        Self { id, type_id, type_name }
    }

    /// The dense id of the component type.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The [`TypeId`] of the component type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The [type name](std::any::type_name) of the component type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// An error for when an entity does not hold a requested component.
#[derive(Debug, Clone, Copy, Error)]
#[error("entity {entity} does not have a `{component}` component")]
pub struct ComponentNotFound {
    pub entity: Entity,
    pub component: ComponentInfo,
}

/// An error for querying a component type that has never been attached
/// to any entity.
///
/// Queries fail fast on unknown types so that typos surface immediately
/// instead of producing silently-empty results. Probe with
/// [`Store::registered`](crate::store::Store::registered) when absence is
/// expected.
#[derive(Debug, Clone, Copy, Error)]
#[error("component type `{0}` has never been attached")]
pub struct UnregisteredComponent(pub ComponentInfo);

impl ComponentNotFound {
    pub(crate) fn new<C: Component>(entity: Entity) -> Self {
        Self { entity, component: ComponentInfo::of::<C>() }
    }
}

// ---

impl fmt::Debug for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInfo")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.type_name.fmt(f)
    }
}

impl PartialEq for ComponentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentInfo {}

impl Hash for ComponentInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_id_unique() {
        struct A;
        struct B;

        assert_ne!(ComponentId::of::<A>(), ComponentId::of::<B>());
        assert_eq!(ComponentId::of::<A>(), ComponentId::of::<A>());
    }

    #[test]
    fn downcast() {
        struct Health(u32);

        let mut component: Box<dyn Component> = Box::new(Health(10));

        assert!(component.is::<Health>());
        assert!(!component.is::<u32>());
        assert_eq!(component.downcast_ref::<Health>().unwrap().0, 10);

        component.downcast_mut::<Health>().unwrap().0 = 3;

        assert_eq!(component.downcast_ref::<Health>().unwrap().0, 3);
    }

    #[test]
    fn info_displays_type_name() {
        struct Position;

        let info = ComponentInfo::of::<Position>();

        assert!(info.type_name().ends_with("Position"));
        assert_eq!(format!("{info}"), info.type_name());
    }
}
