//! Field policy: which fields are hidden, read-only or sized, and how an
//! entity is summarized in dropdowns.

use crate::config::SurveyConfig;
use crate::entity::{Entity, FieldKind};
use crate::error::EngineError;
use crate::metadata::field_value;
use serde::Serialize;
use std::sync::Arc;

/// Separator between composed dropdown values.
pub const DROPDOWN_SEPARATOR: &str = " - ";

/// Policy decisions for one field, in the type's declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLayout {
    pub name: &'static str,
    pub kind: FieldKind,
    pub hidden: bool,
    pub read_only: bool,
    pub width_px: Option<u32>,
}

/// Answers per-field questions from the loaded configuration.
#[derive(Debug, Clone)]
pub struct FieldPolicy {
    config: Arc<SurveyConfig>,
}

impl FieldPolicy {
    #[must_use]
    pub fn new(config: Arc<SurveyConfig>) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// True if any hidden rule for `type_name` or `"all"` names `field`.
    #[must_use]
    pub fn is_hidden(&self, type_name: &str, field: &str) -> bool {
        self.config
            .hidden_fields
            .iter()
            .any(|rule| rule.matches(type_name, field))
    }

    /// True if any read-only rule for `type_name` or `"all"` names `field`.
    #[must_use]
    pub fn is_read_only(&self, type_name: &str, field: &str) -> bool {
        self.config
            .read_only_fields
            .iter()
            .any(|rule| rule.matches(type_name, field))
    }

    /// Width of the first matching `FieldSizes` entry.
    #[must_use]
    pub fn field_width_pixels(&self, type_name: &str, field: &str) -> Option<u32> {
        self.config
            .field_sizes
            .iter()
            .find(|size| size.matches(type_name, field))
            .map(|size| size.width)
    }

    /// Inline style for the field width, empty when none is configured.
    #[must_use]
    pub fn field_width_style(&self, type_name: &str, field: &str) -> String {
        self.field_width_pixels(type_name, field)
            .map(|width| format!("width:{width}px"))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_hidden_field<E: Entity>(&self, field: &str) -> bool {
        self.is_hidden(E::type_name(), field)
    }

    #[must_use]
    pub fn is_read_only_field<E: Entity>(&self, field: &str) -> bool {
        self.is_read_only(E::type_name(), field)
    }

    #[must_use]
    pub fn width_of<E: Entity>(&self, field: &str) -> Option<u32> {
        self.field_width_pixels(E::type_name(), field)
    }

    /// Join the configured dropdown fields of `entity` with `" - "`.
    ///
    /// Missing dropdown configuration for the type is an error, as is a
    /// configured field the type does not have.
    pub fn compose_dropdown_display<E: Entity>(&self, entity: &E) -> Result<String, EngineError> {
        let type_name = E::type_name();
        let fields = self
            .config
            .dropdown_fields
            .get(type_name)
            .ok_or_else(|| EngineError::ConfigMissing {
                type_name: type_name.to_string(),
                section: "DropdownFields".to_string(),
            })?;

        let parts = fields
            .iter()
            .map(|field| {
                field_value(entity, field)
                    .map(|value| value.to_string())
                    .ok_or_else(|| EngineError::unknown_field(type_name, field.as_str()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(DROPDOWN_SEPARATOR))
    }

    /// Whether `E` has a dropdown configuration.
    #[must_use]
    pub fn has_dropdown<E: Entity>(&self) -> bool {
        self.config.dropdown_fields.contains_key(E::type_name())
    }

    /// Policy decisions for every field of `E`.
    #[must_use]
    pub fn field_layout<E: Entity>(&self) -> Vec<FieldLayout> {
        let type_name = E::type_name();
        E::descriptor()
            .fields()
            .iter()
            .map(|field| FieldLayout {
                name: field.name(),
                kind: field.kind(),
                hidden: self.is_hidden(type_name, field.name()),
                read_only: self.is_read_only(type_name, field.name()),
                width_px: self.field_width_pixels(type_name, field.name()),
            })
            .collect()
    }
}
