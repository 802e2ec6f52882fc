//! Startup registry of described entity types.

use super::{Entity, FieldKind, Relation};
use crate::error::EngineError;
use crate::metadata::{resolve_display_name_field, resolve_supported_identity};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Name and kind of one registered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// What the engine resolved for a registered type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    pub type_name: &'static str,
    pub identity: FieldSummary,
    pub display_name: Option<&'static str>,
    pub fields: Vec<FieldSummary>,
    #[serde(skip)]
    pub relations: Vec<Relation>,
}

/// Registered entity types keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<&'static str, TypeSummary>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `E`, resolving its identity and display-name fields.
    ///
    /// Fails when `E` has no identity field or one of an unsupported kind,
    /// so mismatched types are caught at startup rather than on first use.
    pub fn register<E: Entity>(&mut self) -> Result<&TypeSummary, EngineError> {
        let identity = resolve_supported_identity::<E>()?;
        let descriptor = E::descriptor();
        let summary = TypeSummary {
            type_name: descriptor.type_name(),
            identity: FieldSummary {
                name: identity.name(),
                kind: identity.kind(),
                required: identity.is_required(),
            },
            display_name: resolve_display_name_field::<E>().map(|f| f.name()),
            fields: descriptor
                .fields()
                .iter()
                .map(|f| FieldSummary {
                    name: f.name(),
                    kind: f.kind(),
                    required: f.is_required(),
                })
                .collect(),
            relations: descriptor.relations().to_vec(),
        };
        debug!(
            type_name = summary.type_name,
            identity = summary.identity.name,
            display_name = ?summary.display_name,
            "Registered entity type"
        );
        Ok(self.types.entry(summary.type_name).or_insert(summary))
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeSummary> {
        self.types.get(type_name)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Registered type names in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
