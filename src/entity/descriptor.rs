//! Static per-type descriptors: field tables with typed accessors and
//! relationship declarations.

use super::value::{FieldKind, FieldValue, ValueError};
use crate::store::Record;
use std::fmt;

type Getter<E> = fn(&E) -> FieldValue;
type Setter<E> = fn(&mut E, FieldValue) -> Result<(), ValueError>;

/// One field of an entity type.
pub struct FieldDef<E> {
    name: &'static str,
    kind: FieldKind,
    identity: bool,
    display_name: bool,
    required: bool,
    getter: Getter<E>,
    setter: Setter<E>,
}

impl<E> FieldDef<E> {
    #[must_use]
    pub fn new(name: &'static str, kind: FieldKind, getter: Getter<E>, setter: Setter<E>) -> Self {
        Self {
            name,
            kind,
            identity: false,
            display_name: false,
            required: false,
            getter,
            setter,
        }
    }

    /// Mark this field as the identity, regardless of its name.
    #[must_use]
    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Annotate this field as the type's display name.
    #[must_use]
    pub fn display_name(mut self) -> Self {
        self.display_name = true;
        self
    }

    /// The store rejects records where this field is null.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    #[must_use]
    pub fn is_display_name(&self) -> bool {
        self.display_name
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn get(&self, entity: &E) -> FieldValue {
        (self.getter)(entity)
    }

    pub fn set(&self, entity: &mut E, value: FieldValue) -> Result<(), ValueError> {
        (self.setter)(entity, value)
    }
}

impl<E> fmt::Debug for FieldDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("identity", &self.identity)
            .field("display_name", &self.display_name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Declares that a type holds a reference to another entity type, with an
/// optional scalar foreign-key field mirroring the related identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub related_type: &'static str,
    pub reference_field: &'static str,
    pub foreign_key: Option<&'static str>,
}

impl Relation {
    #[must_use]
    pub const fn new(
        related_type: &'static str,
        reference_field: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        Self {
            related_type,
            reference_field,
            foreign_key: Some(foreign_key),
        }
    }

    /// A relationship without a scalar foreign-key mirror.
    #[must_use]
    pub const fn reference_only(related_type: &'static str, reference_field: &'static str) -> Self {
        Self {
            related_type,
            reference_field,
            foreign_key: None,
        }
    }
}

/// Field table and relationships of one entity type, in declaration order.
pub struct EntityDescriptor<E> {
    type_name: &'static str,
    fields: Vec<FieldDef<E>>,
    relations: Vec<Relation>,
}

impl<E> EntityDescriptor<E> {
    #[must_use]
    pub fn new(type_name: &'static str, fields: Vec<FieldDef<E>>) -> Self {
        Self {
            type_name,
            fields,
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef<E>] {
        &self.fields
    }

    /// Look up a field by its exact name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef<E>> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// The relationship pointing at `related_type`, if declared.
    #[must_use]
    pub fn relation_to(&self, related_type: &str) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|r| r.related_type == related_type)
    }

    /// Snapshot every scalar field of `entity` into a store record.
    #[must_use]
    pub fn to_record(&self, entity: &E) -> Record {
        let mut record = Record::new();
        for field in &self.fields {
            record.insert(field.name, field.get(entity));
        }
        record
    }

    /// Write every field present in `record` onto `entity`.
    ///
    /// Returns the offending field name alongside the error on a kind
    /// mismatch.
    pub fn apply_record(
        &self,
        entity: &mut E,
        record: &Record,
    ) -> Result<(), (&'static str, ValueError)> {
        for field in &self.fields {
            if let Some(value) = record.get(field.name) {
                field
                    .set(entity, value.clone())
                    .map_err(|e| (field.name, e))?;
            }
        }
        Ok(())
    }
}

impl<E> fmt::Debug for EntityDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("relations", &self.relations)
            .finish()
    }
}
