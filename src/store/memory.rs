use super::table::{apply_ops, TableData};
use super::{CommitReceipt, EntityStore, PendingOp, Record, StoreError, StoreSession, TableSchema};
use crate::entity::EntityId;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type Tables = Arc<RwLock<BTreeMap<String, TableData>>>;

/// Process-local store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn open_session(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        Ok(Box::new(MemorySession {
            tables: Arc::clone(&self.tables),
            pending: Vec::new(),
        }))
    }
}

struct MemorySession {
    tables: Tables,
    pending: Vec<PendingOp>,
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn list(&mut self, schema: &TableSchema) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&schema.name)
            .map(|table| table.records().to_vec())
            .unwrap_or_default())
    }

    async fn find(
        &mut self,
        schema: &TableSchema,
        key: &EntityId,
    ) -> Result<Option<Record>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&schema.name)
            .and_then(|table| table.find(schema, key))
            .cloned())
    }

    fn stage_add(&mut self, schema: &TableSchema, record: Record) {
        self.pending.push(PendingOp::Add {
            schema: schema.clone(),
            record,
        });
    }

    fn stage_update(&mut self, schema: &TableSchema, record: Record) {
        self.pending.push(PendingOp::Update {
            schema: schema.clone(),
            record,
        });
    }

    fn stage_remove(&mut self, schema: &TableSchema, key: EntityId) {
        self.pending.push(PendingOp::Remove {
            schema: schema.clone(),
            key,
        });
    }

    async fn commit(self: Box<Self>) -> Result<CommitReceipt, StoreError> {
        let MemorySession { tables, pending } = *self;
        if pending.is_empty() {
            return Ok(CommitReceipt::default());
        }

        let mut guard = tables.write().await;
        let receipt = apply_ops(&mut *guard, pending)?;
        debug!(
            assigned = receipt.assigned.len(),
            updated = receipt.updated,
            removed = receipt.removed,
            "Memory store commit applied"
        );
        Ok(receipt)
    }
}
