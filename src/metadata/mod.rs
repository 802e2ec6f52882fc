//! Type metadata resolution: identity and display-name discovery plus
//! generic field reads.

use crate::entity::{Entity, EntityId, FieldDef, FieldKind, FieldValue};
use crate::error::EngineError;

/// Resolve the identity field of `E`.
///
/// A field explicitly flagged as identity wins; otherwise the field named
/// `Id` (any case) is used.
pub fn resolve_identity_field<E: Entity>() -> Result<&'static FieldDef<E>, EngineError> {
    let descriptor = E::descriptor();
    descriptor
        .fields()
        .iter()
        .find(|f| f.is_identity())
        .or_else(|| {
            descriptor
                .fields()
                .iter()
                .find(|f| f.name().eq_ignore_ascii_case("id"))
        })
        .ok_or_else(|| EngineError::metadata(descriptor.type_name()))
}

/// Resolve the identity field and check it can carry an identity.
pub fn resolve_supported_identity<E: Entity>() -> Result<&'static FieldDef<E>, EngineError> {
    let field = resolve_identity_field::<E>()?;
    match field.kind() {
        FieldKind::Int | FieldKind::Uuid => Ok(field),
        kind => Err(EngineError::UnsupportedIdentityType {
            type_name: E::type_name().to_string(),
            field: field.name().to_string(),
            kind,
        }),
    }
}

/// Resolve the field that represents `E` in short summaries.
///
/// Selection order over the fields in declaration order:
/// 1. a field annotated as display name
/// 2. the first text field whose name contains "name" (any case)
/// 3. the first text field
#[must_use]
pub fn resolve_display_name_field<E: Entity>() -> Option<&'static FieldDef<E>> {
    let fields = E::descriptor().fields();
    let is_text = |f: &&FieldDef<E>| f.kind() == FieldKind::Text;

    fields
        .iter()
        .find(|f| f.is_display_name())
        .or_else(|| {
            fields
                .iter()
                .filter(is_text)
                .find(|f| f.name().to_ascii_lowercase().contains("name"))
        })
        .or_else(|| fields.iter().find(is_text))
}

/// Render the display-name field of `entity`; empty when none resolves.
#[must_use]
pub fn display_name<E: Entity>(entity: &E) -> String {
    resolve_display_name_field::<E>()
        .map(|field| field.get(entity).to_string())
        .unwrap_or_default()
}

/// Read a field by name.
///
/// Date-only values come back as text in the `dd-mon-yy` display form.
#[must_use]
pub fn field_value<E: Entity>(entity: &E, field_name: &str) -> Option<FieldValue> {
    let field = E::descriptor().field(field_name)?;
    match field.get(entity) {
        date @ FieldValue::Date(_) => Some(FieldValue::Text(date.to_display_text())),
        value => Some(value),
    }
}

/// The raw identity value of `entity`.
pub fn identity_value<E: Entity>(entity: &E) -> Result<FieldValue, EngineError> {
    Ok(resolve_identity_field::<E>()?.get(entity))
}

/// The typed identity of `entity`, `None` while it is null or nil.
pub fn entity_id<E: Entity>(entity: &E) -> Result<Option<EntityId>, EngineError> {
    Ok(EntityId::from_value(&identity_value(entity)?))
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod metadata_tests;
