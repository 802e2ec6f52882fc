//! Unified error type for engine operations.

use crate::config::ConfigError;
use crate::entity::FieldKind;
use crate::store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the metadata engine and persistence gateway.
///
/// Metadata and policy errors point at a type or configuration mismatch the
/// operator has to fix; none of them are retried.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No identity field resolvable on {type_name}")]
    Metadata { type_name: String },

    #[error("No {section} entry configured for {type_name}")]
    ConfigMissing { type_name: String, section: String },

    #[error("Unsupported identity type {kind} for {type_name}.{field}; expected int or uuid")]
    UnsupportedIdentityType {
        type_name: String,
        field: String,
        kind: FieldKind,
    },

    #[error("Cannot convert '{value}' to {expected} for {type_name}.{field}")]
    TypeConversion {
        type_name: String,
        field: String,
        value: String,
        expected: FieldKind,
    },

    #[error("Store rejected write to {type_name}: {source}")]
    Persistence {
        type_name: String,
        #[source]
        source: StoreError,
    },

    #[error("{type_name} {id} not found")]
    NotFound { type_name: String, id: String },

    #[error("{type_name} has no field named {field}")]
    UnknownField { type_name: String, field: String },

    #[error("{operation} on {type_name} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        type_name: String,
        after: Duration,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Create a metadata error for a type without a resolvable identity
    pub fn metadata(type_name: impl Into<String>) -> Self {
        EngineError::Metadata {
            type_name: type_name.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        EngineError::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Map a store failure, keeping missing targets distinct from rejections.
    pub fn from_store(type_name: &str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound { key, .. } => EngineError::NotFound {
                type_name: type_name.to_string(),
                id: key,
            },
            other => EngineError::Persistence {
                type_name: type_name.to_string(),
                source: other,
            },
        }
    }
}
