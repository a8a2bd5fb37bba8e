use super::ComponentInfo;

/// A non-empty set of component types used as an intersection-query key.
///
/// Implemented for tuples of components from 1 up to 16 elements.
/// Listing a type more than once is harmless: intersecting a set with
/// itself changes nothing. The empty tuple is deliberately excluded —
/// an intersection over zero types is a caller error, not "all
/// entities".
pub trait ComponentQuery: 'static {
    /// Appends the info of every component type in this query.
    fn components(out: &mut Vec<ComponentInfo>);
}
