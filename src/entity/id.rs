//! Entity identifier types supporting integer and UUID identities.

use super::value::{FieldKind, FieldValue};
use std::fmt;
use uuid::Uuid;

/// Storage identity of a persisted entity.
///
/// - Integer identities are assigned by the store from a per-table counter
/// - UUID identities are assigned by the store as time-ordered (v7) UUIDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Int(i64),
    Uuid(Uuid),
}

impl EntityId {
    /// Create a new store-assigned UUID identity.
    #[must_use]
    pub fn new_uuid() -> Self {
        EntityId::Uuid(Uuid::now_v7())
    }

    /// Convert text to an identity of the given kind.
    ///
    /// Returns `None` when the text does not parse as that kind or the kind
    /// cannot carry an identity.
    #[must_use]
    pub fn parse_as(kind: FieldKind, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match kind {
            FieldKind::Int => trimmed.parse::<i64>().ok().map(EntityId::Int),
            FieldKind::Uuid => Uuid::parse_str(trimmed).ok().map(EntityId::Uuid),
            _ => None,
        }
    }

    /// Build an identity from a field value; `None` for null or nil values.
    #[must_use]
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(id) => Some(EntityId::Int(*id)),
            FieldValue::Uuid(id) if !id.is_nil() => Some(EntityId::Uuid(*id)),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            EntityId::Int(_) => FieldKind::Int,
            EntityId::Uuid(_) => FieldKind::Uuid,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> FieldValue {
        match self {
            EntityId::Int(id) => FieldValue::Int(*id),
            EntityId::Uuid(id) => FieldValue::Uuid(*id),
        }
    }

    /// Get the string representation used as a storage key.
    #[must_use]
    pub fn to_storage_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{id}"),
            EntityId::Uuid(uuid) => write!(f, "{uuid}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Int(id)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        EntityId::Uuid(uuid)
    }
}
