//! Entity store contract and its in-memory and JSON-file implementations.
//!
//! A store hands out short-lived sessions. Reads go straight to the store;
//! writes are staged on the session and applied together on `commit`.

mod atomic;
mod file;
mod memory;
mod table;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::entity::{EntityId, FieldKind, FieldValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// One persisted row: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, FieldValue>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Shape of one table as the store needs to know it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub key_field: String,
    pub key_kind: FieldKind,
    pub required: Vec<String>,
}

impl TableSchema {
    /// The key carried by `record`, if any.
    #[must_use]
    pub fn key_of(&self, record: &Record) -> Option<EntityId> {
        record.get(&self.key_field).and_then(EntityId::from_value)
    }

    /// Reject records whose required fields are null or blank text.
    pub fn check_required(&self, record: &Record) -> Result<(), StoreError> {
        for field in &self.required {
            let missing = match record.get(field) {
                None | Some(FieldValue::Null) => true,
                Some(FieldValue::Text(text)) => text.trim().is_empty(),
                Some(_) => false,
            };
            if missing {
                return Err(StoreError::Constraint {
                    table: self.name.clone(),
                    message: format!("required field {field} is empty"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No record {key} in {table}")]
    NotFound { table: String, key: String },

    #[error("Constraint violated on {table}: {message}")]
    Constraint { table: String, message: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Keys assigned to staged additions, in the order they were staged.
    pub assigned: Vec<EntityId>,
    pub updated: usize,
    pub removed: usize,
}

/// A staged write, applied at commit.
#[derive(Debug, Clone)]
pub(crate) enum PendingOp {
    Add { schema: TableSchema, record: Record },
    Update { schema: TableSchema, record: Record },
    Remove { schema: TableSchema, key: EntityId },
}

impl PendingOp {
    pub(crate) fn table(&self) -> &str {
        match self {
            PendingOp::Add { schema, .. }
            | PendingOp::Update { schema, .. }
            | PendingOp::Remove { schema, .. } => &schema.name,
        }
    }
}

/// Source of sessions.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn StoreSession>, StoreError>;
}

/// A unit of work against a store.
///
/// Dropping a session without committing discards everything staged on it.
#[async_trait]
pub trait StoreSession: Send {
    async fn list(&mut self, schema: &TableSchema) -> Result<Vec<Record>, StoreError>;

    async fn find(
        &mut self,
        schema: &TableSchema,
        key: &EntityId,
    ) -> Result<Option<Record>, StoreError>;

    /// Stage an insert. A null key is assigned by the store at commit.
    fn stage_add(&mut self, schema: &TableSchema, record: Record);

    /// Stage a full-record replace of the row with the same key.
    fn stage_update(&mut self, schema: &TableSchema, record: Record);

    fn stage_remove(&mut self, schema: &TableSchema, key: EntityId);

    /// Apply every staged write, or none of them.
    async fn commit(self: Box<Self>) -> Result<CommitReceipt, StoreError>;
}
