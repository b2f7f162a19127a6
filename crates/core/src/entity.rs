//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Participants and expenses are entities: two records with the same id are the
/// same participant/expense even if their display fields or allocations differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` refers to the same entity.
    fn same_identity_as(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
