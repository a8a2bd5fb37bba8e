//! An in-memory entity-component store.
//!
//! A [`Store`](store::Store) hands out recyclable [`Entity`](entity::Entity)
//! ids, associates them with typed [`Component`](component::Component)
//! values, and answers composition queries ("which entities have `A` and
//! `B`") as independent snapshot collections.

pub mod component;
pub mod entity;
pub mod store;

/// Re-export of all items in this crate.
pub mod prelude {
    pub use crate::component::*;
    pub use crate::entity::*;
    pub use crate::store::*;
}
