//! Described records: the capability every entity type implements so the
//! engine can work with it without per-type code.

pub mod descriptor;
pub mod id;
pub mod registry;
pub mod value;

#[cfg(test)]
pub(crate) mod fixtures;

pub use descriptor::{EntityDescriptor, FieldDef, Relation};
pub use id::EntityId;
pub use registry::{FieldSummary, TypeRegistry, TypeSummary};
pub use value::{format_date, FieldKind, FieldValue, ValueError};

/// An entity type the engine can describe, initialize and persist.
///
/// `Default` stands in for the parameterless constructor: the engine builds
/// fresh instances and rehydrates stored records through it.
pub trait Entity: Clone + Default + Send + Sync + 'static {
    /// The static field table for this type.
    fn descriptor() -> &'static EntityDescriptor<Self>;

    /// Short type name used as the configuration key and store table name.
    #[must_use]
    fn type_name() -> &'static str {
        Self::descriptor().type_name()
    }
}

/// An entity holding a reference to an `R`.
///
/// The reference itself is not a scalar field, so it is assigned through
/// this trait; the matching foreign key comes from the descriptor's
/// [`Relation`] for `R`.
pub trait Related<R: Entity>: Entity {
    fn set_related(&mut self, related: R);

    fn related(&self) -> Option<&R>;
}
