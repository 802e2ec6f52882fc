//! New-item detection, placeholder initialization and related-entity
//! linking.

use crate::entity::{Entity, FieldKind, FieldValue, Related};
use crate::error::EngineError;
use crate::metadata::{
    identity_value, resolve_display_name_field, resolve_identity_field, resolve_supported_identity,
};
use tracing::debug;
use uuid::Uuid;

/// Integer identity marking an entity that has not been persisted.
pub const NEW_ITEM_SENTINEL: i64 = -1;

/// Lifecycle operations parameterized by the integer sentinel in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLifecycle {
    sentinel_id: i64,
}

impl Default for ItemLifecycle {
    fn default() -> Self {
        Self::new(NEW_ITEM_SENTINEL)
    }
}

impl ItemLifecycle {
    #[must_use]
    pub fn new(sentinel_id: i64) -> Self {
        Self { sentinel_id }
    }

    #[must_use]
    pub fn sentinel_id(&self) -> i64 {
        self.sentinel_id
    }

    /// Whether `entity` has not been persisted yet.
    ///
    /// True when the identity is null, the integer sentinel, the nil UUID, or
    /// a random (v4) placeholder UUID; stores assign v7 UUIDs. Types without
    /// an identity field count as new.
    ///
    /// Version 4 UUIDs are reserved as placeholders. An entity carrying a v4
    /// identity minted elsewhere is treated as new, so [`Gateway::save`]
    /// inserts it under a fresh key instead of updating a stored row.
    ///
    /// [`Gateway::save`]: crate::gateway::Gateway::save
    #[must_use]
    pub fn is_new<E: Entity>(&self, entity: &E) -> bool {
        match identity_value(entity) {
            Ok(FieldValue::Int(id)) => id == self.sentinel_id,
            Ok(FieldValue::Uuid(id)) => {
                id.is_nil() || id.get_version() == Some(uuid::Version::Random)
            }
            Ok(FieldValue::Text(id)) => id.trim().is_empty() || id.trim() == self.sentinel_text(),
            Ok(FieldValue::Null) | Err(_) => true,
            Ok(_) => false,
        }
    }

    /// Construct a fresh `E` carrying the sentinel identity and, when a
    /// display-name field resolves, the placeholder `"New <TypeName>"`.
    pub fn initialize<E: Entity>(&self) -> Result<E, EngineError> {
        let identity = resolve_supported_identity::<E>()?;
        let type_name = E::type_name();
        let mut entity = E::default();

        let sentinel = match identity.kind() {
            FieldKind::Uuid => FieldValue::Uuid(Uuid::new_v4()),
            _ => FieldValue::Int(self.sentinel_id),
        };
        identity
            .set(&mut entity, sentinel)
            .map_err(|e| EngineError::TypeConversion {
                type_name: type_name.to_string(),
                field: identity.name().to_string(),
                value: e.to_string(),
                expected: identity.kind(),
            })?;

        match resolve_display_name_field::<E>() {
            Some(name_field) => {
                name_field
                    .set(&mut entity, FieldValue::Text(format!("New {type_name}")))
                    .map_err(|e| EngineError::TypeConversion {
                        type_name: type_name.to_string(),
                        field: name_field.name().to_string(),
                        value: e.to_string(),
                        expected: FieldKind::Text,
                    })?;
            }
            None => debug!(type_name, "No display-name field; placeholder name skipped"),
        }
        Ok(entity)
    }

    fn sentinel_text(&self) -> String {
        self.sentinel_id.to_string()
    }
}

/// Assign `related` into `parent`'s reference and mirror its identity
/// into the declared foreign-key field.
///
/// A relation without a foreign key only sets the reference. A foreign
/// key whose kind cannot hold the related identity is an error.
pub fn link_related<P, R>(parent: &mut P, related: &R) -> Result<(), EngineError>
where
    P: Related<R>,
    R: Entity,
{
    let parent_type = P::type_name();
    let relation = P::descriptor().relation_to(R::type_name()).copied();
    parent.set_related(related.clone());

    let Some(foreign_key) = relation.and_then(|r| r.foreign_key) else {
        debug!(
            parent = parent_type,
            related = R::type_name(),
            "No foreign key declared; linked by reference only"
        );
        return Ok(());
    };
    let Some(fk_field) = P::descriptor().field(foreign_key) else {
        debug!(
            parent = parent_type,
            foreign_key, "Declared foreign key is not a field; linked by reference only"
        );
        return Ok(());
    };

    let related_id = resolve_identity_field::<R>()?.get(related);
    fk_field
        .set(parent, related_id.clone())
        .map_err(|_| EngineError::TypeConversion {
            type_name: parent_type.to_string(),
            field: foreign_key.to_string(),
            value: related_id.to_string(),
            expected: fk_field.kind(),
        })
}

/// The identity of `entity` rendered as text; `None` when the type has no
/// identity field or the identity is null.
#[must_use]
pub fn id_string<E: Entity>(entity: &E) -> Option<String> {
    match identity_value(entity) {
        Ok(FieldValue::Null) | Err(_) => None,
        Ok(value) => Some(value.to_string()),
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
