use super::atomic::atomic_write;
use super::table::{apply_ops, TableData};
use super::{CommitReceipt, EntityStore, PendingOp, Record, StoreError, StoreSession, TableSchema};
use crate::entity::EntityId;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Store keeping one `<table>.json` file per type under a data directory.
///
/// Commits are serialized by a store-wide mutex. Each touched table is
/// written atomically once every staged write has been validated.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    commit_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Open (creating if needed) the data directory at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io(&root, e))?;
        info!(root = %root.display(), "Opened JSON file store");
        Ok(Self {
            root,
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn table_path(root: &Path, table: &str) -> PathBuf {
    root.join(format!("{table}.json"))
}

async fn read_table(root: &Path, table: &str) -> Result<TableData, StoreError> {
    let path = table_path(root, table);
    match fs::read_to_string(&path).await {
        Ok(content) => {
            serde_json::from_str(&content).map_err(|source| StoreError::Json { path, source })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TableData::default()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

async fn write_table(root: &Path, table: &str, data: &TableData) -> Result<(), StoreError> {
    let path = table_path(root, table);
    let content = serde_json::to_string_pretty(data).map_err(|source| StoreError::Json {
        path: path.clone(),
        source,
    })?;
    atomic_write(&path, content)
        .await
        .map_err(|e| StoreError::io(path, e))
}

#[async_trait]
impl EntityStore for JsonFileStore {
    async fn open_session(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        Ok(Box::new(FileSession {
            root: self.root.clone(),
            commit_lock: Arc::clone(&self.commit_lock),
            pending: Vec::new(),
        }))
    }
}

struct FileSession {
    root: PathBuf,
    commit_lock: Arc<Mutex<()>>,
    pending: Vec<PendingOp>,
}

#[async_trait]
impl StoreSession for FileSession {
    async fn list(&mut self, schema: &TableSchema) -> Result<Vec<Record>, StoreError> {
        let table = read_table(&self.root, &schema.name).await?;
        Ok(table.records().to_vec())
    }

    async fn find(
        &mut self,
        schema: &TableSchema,
        key: &EntityId,
    ) -> Result<Option<Record>, StoreError> {
        let table = read_table(&self.root, &schema.name).await?;
        Ok(table.find(schema, key).cloned())
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
        let FileSession {
            root,
            commit_lock,
            pending,
        } = *self;
        if pending.is_empty() {
            return Ok(CommitReceipt::default());
        }

        let _guard = commit_lock.lock().await;
        let mut working = BTreeMap::new();
        for op in &pending {
            if !working.contains_key(op.table()) {
                let data = read_table(&root, op.table()).await?;
                working.insert(op.table().to_string(), data);
            }
        }

        let receipt = apply_ops(&mut working, pending)?;
        for (table, data) in &working {
            write_table(&root, table, data).await?;
        }
        debug!(
            root = %root.display(),
            tables = working.len(),
            assigned = receipt.assigned.len(),
            "File store commit written"
        );
        Ok(receipt)
    }
}
