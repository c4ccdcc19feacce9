//! Entity trait: identity that persists across state changes.

/// Minimal contract for stored records with a stable identity.
///
/// Products, variants and orders are compared by id, not by field values;
/// two loads of the same record are the same entity even if an admin edit
/// happened in between.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
