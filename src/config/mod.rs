//! Field policy configuration: hidden, read-only and sized fields plus
//! dropdown composition, keyed by entity type name.

mod io;
mod provider;

pub use io::{load_config, parse_config};
pub use provider::ConfigProvider;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Type name that applies a rule to every entity type.
pub const ALL_ITEMS: &str = "all";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A rule naming fields of one type (or of every type via `"all"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(rename = "Item", alias = "ItemTypeName")]
    pub item: String,
    #[serde(rename = "Fields")]
    pub fields: Vec<String>,
}

impl FieldRule {
    /// Whether this rule covers `field` on `type_name`.
    ///
    /// Type names compare exactly; field names ignore ASCII case.
    #[must_use]
    pub fn matches(&self, type_name: &str, field: &str) -> bool {
        applies_to(&self.item, type_name)
            && self.fields.iter().any(|f| f.eq_ignore_ascii_case(field))
    }
}

/// A configured display width for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSize {
    #[serde(rename = "Item", alias = "ItemTypeName")]
    pub item: String,
    #[serde(rename = "Field", alias = "FieldName")]
    pub field: String,
    #[serde(rename = "Width", alias = "WidthPixels")]
    pub width: u32,
}

impl FieldSize {
    #[must_use]
    pub fn matches(&self, type_name: &str, field: &str) -> bool {
        applies_to(&self.item, type_name) && self.field.eq_ignore_ascii_case(field)
    }
}

/// Parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SurveyConfig {
    #[serde(default)]
    pub hidden_fields: Vec<FieldRule>,
    #[serde(default)]
    pub read_only_fields: Vec<FieldRule>,
    #[serde(default)]
    pub field_sizes: Vec<FieldSize>,
    /// Ordered field names composing each type's dropdown text.
    #[serde(default)]
    pub dropdown_fields: HashMap<String, Vec<String>>,
    /// Reserved identity value; parsed and kept but not used as the
    /// new-item sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_id: Option<i64>,
}

fn applies_to(rule_item: &str, type_name: &str) -> bool {
    rule_item == ALL_ITEMS || rule_item == type_name
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
