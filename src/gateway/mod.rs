//! Generic persistence gateway.
//!
//! Every operation opens its own store session and stages at most one
//! commit. Opening the session and any reads are bounded by the configured
//! timeout; a commit that has started always runs to completion, so the
//! caller learns whether the write landed. Nothing is cached between calls.

use crate::entity::{Entity, EntityId, FieldKind, FieldValue};
use crate::error::EngineError;
use crate::lifecycle::ItemLifecycle;
use crate::metadata::{entity_id, resolve_supported_identity};
use crate::notify::{ItemEventKind, UpdateNotifier};
use crate::store::{CommitReceipt, EntityStore, Record, StoreSession, TableSchema};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default bound on a single gateway operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Table layout the store needs for `E`.
pub fn schema_for<E: Entity>() -> Result<TableSchema, EngineError> {
    let identity = resolve_supported_identity::<E>()?;
    let required = E::descriptor()
        .fields()
        .iter()
        .filter(|field| field.is_required() && field.name() != identity.name())
        .map(|field| field.name().to_string())
        .collect();
    Ok(TableSchema {
        name: E::type_name().to_string(),
        key_field: identity.name().to_string(),
        key_kind: identity.kind(),
        required,
    })
}

fn hydrate<E: Entity>(record: &Record) -> Result<E, EngineError> {
    let descriptor = E::descriptor();
    let mut entity = E::default();
    descriptor
        .apply_record(&mut entity, record)
        .map_err(|(field, e)| EngineError::TypeConversion {
            type_name: E::type_name().to_string(),
            field: field.to_string(),
            value: e.to_string(),
            expected: descriptor
                .field(field)
                .map_or(FieldKind::Text, |f| f.kind()),
        })?;
    Ok(entity)
}

/// Record for `entity` with its identity cleared so the store assigns one.
fn record_for_insert<E: Entity>(entity: &E, schema: &TableSchema) -> Record {
    let mut record = E::descriptor().to_record(entity);
    record.insert(schema.key_field.clone(), FieldValue::Null);
    record
}

fn write_identity<E: Entity>(entity: &mut E, id: EntityId) -> Result<(), EngineError> {
    let identity = resolve_supported_identity::<E>()?;
    identity
        .set(entity, id.to_value())
        .map_err(|e| EngineError::TypeConversion {
            type_name: E::type_name().to_string(),
            field: identity.name().to_string(),
            value: e.to_string(),
            expected: identity.kind(),
        })
}

fn persisted_id<E: Entity>(entity: &E) -> Result<EntityId, EngineError> {
    entity_id(entity)?.ok_or_else(|| EngineError::NotFound {
        type_name: E::type_name().to_string(),
        id: "(unsaved)".to_string(),
    })
}

/// Store-backed CRUD for any registered entity type.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn EntityStore>,
    timeout: Duration,
    lifecycle: ItemLifecycle,
    notifier: UpdateNotifier,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("timeout", &self.timeout)
            .field("lifecycle", &self.lifecycle)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    #[must_use]
    pub fn new(
        store: Arc<dyn EntityStore>,
        timeout: Duration,
        lifecycle: ItemLifecycle,
        notifier: UpdateNotifier,
    ) -> Self {
        Self {
            store,
            timeout,
            lifecycle,
            notifier,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        type_name: &str,
        work: F,
    ) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, EngineError>>,
    {
        if let Ok(result) = tokio::time::timeout(self.timeout, work).await {
            result
        } else {
            warn!(operation, type_name, after = ?self.timeout, "Store operation timed out");
            Err(EngineError::Timeout {
                operation,
                type_name: type_name.to_string(),
                after: self.timeout,
            })
        }
    }

    async fn session(&self, type_name: &str) -> Result<Box<dyn StoreSession>, EngineError> {
        let session = self
            .store
            .open_session()
            .await
            .map_err(|e| EngineError::from_store(type_name, e))?;
        debug!(type_name, "Opened store session");
        Ok(session)
    }

    async fn commit(
        type_name: &str,
        session: Box<dyn StoreSession>,
    ) -> Result<CommitReceipt, EngineError> {
        session
            .commit()
            .await
            .map_err(|e| EngineError::from_store(type_name, e))
    }

    fn first_assigned(type_name: &str, receipt: &CommitReceipt) -> Result<EntityId, EngineError> {
        receipt
            .assigned
            .first()
            .copied()
            .ok_or_else(|| EngineError::metadata(type_name))
    }

    /// Every stored `E`.
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, EngineError> {
        let type_name = E::type_name();
        let schema = schema_for::<E>()?;
        self.bounded("list", type_name, async {
            let mut session = self.session(type_name).await?;
            let records = session
                .list(&schema)
                .await
                .map_err(|e| EngineError::from_store(type_name, e))?;
            debug!(type_name, count = records.len(), "Listed items");
            records
                .iter()
                .map(hydrate::<E>)
                .collect::<Result<Vec<E>, EngineError>>()
        })
        .await
    }

    /// Look up `E` by identity text, converted to the identity's kind first.
    pub async fn get_by_id<E: Entity>(&self, raw_id: &str) -> Result<Option<E>, EngineError> {
        let identity = resolve_supported_identity::<E>()?;
        let id = EntityId::parse_as(identity.kind(), raw_id).ok_or_else(|| {
            EngineError::TypeConversion {
                type_name: E::type_name().to_string(),
                field: identity.name().to_string(),
                value: raw_id.to_string(),
                expected: identity.kind(),
            }
        })?;
        self.find(&id).await
    }

    /// Look up `E` by typed identity.
    pub async fn find<E: Entity>(&self, id: &EntityId) -> Result<Option<E>, EngineError> {
        let type_name = E::type_name();
        let schema = schema_for::<E>()?;
        if id.kind() != schema.key_kind {
            return Err(EngineError::TypeConversion {
                type_name: type_name.to_string(),
                field: schema.key_field,
                value: id.to_string(),
                expected: schema.key_kind,
            });
        }
        self.bounded("find", type_name, async {
            let mut session = self.session(type_name).await?;
            let record = session
                .find(&schema, id)
                .await
                .map_err(|e| EngineError::from_store(type_name, e))?;
            debug!(type_name, %id, found = record.is_some(), "Looked up item");
            record.as_ref().map(hydrate::<E>).transpose()
        })
        .await
    }

    /// Insert `entity`, writing the store-assigned identity back onto it.
    ///
    /// Whatever identity the caller set is ignored.
    pub async fn add<E: Entity>(&self, entity: &mut E) -> Result<EntityId, EngineError> {
        let type_name = E::type_name();
        let schema = schema_for::<E>()?;
        let record = record_for_insert(entity, &schema);
        let mut session = self
            .bounded("add", type_name, self.session(type_name))
            .await?;
        session.stage_add(&schema, record);
        let receipt = Self::commit(type_name, session).await?;
        let id = Self::first_assigned(type_name, &receipt)?;

        write_identity(entity, id)?;
        info!(type_name, %id, "Added item");
        self.notifier
            .notify_item_updated(ItemEventKind::Added, type_name, &id.to_string());
        Ok(id)
    }

    /// Replace the stored record with `entity`. Last write wins.
    pub async fn update<E: Entity>(&self, entity: &E) -> Result<(), EngineError> {
        let type_name = E::type_name();
        let schema = schema_for::<E>()?;
        let id = persisted_id(entity)?;
        let record = E::descriptor().to_record(entity);
        let mut session = self
            .bounded("update", type_name, self.session(type_name))
            .await?;
        session.stage_update(&schema, record);
        Self::commit(type_name, session).await?;

        info!(type_name, %id, "Updated item");
        self.notifier
            .notify_item_updated(ItemEventKind::Updated, type_name, &id.to_string());
        Ok(())
    }

    /// Remove the stored record matching `entity`'s identity.
    pub async fn delete<E: Entity>(&self, entity: &E) -> Result<(), EngineError> {
        let type_name = E::type_name();
        let schema = schema_for::<E>()?;
        let id = persisted_id(entity)?;
        let mut session = self
            .bounded("delete", type_name, self.session(type_name))
            .await?;
        session.stage_remove(&schema, id);
        Self::commit(type_name, session).await?;

        info!(type_name, %id, "Deleted item");
        self.notifier
            .notify_item_updated(ItemEventKind::Deleted, type_name, &id.to_string());
        Ok(())
    }

    /// Insert or update `entity` in a single session and commit.
    ///
    /// New entities are inserted without a lookup. Otherwise the stored
    /// record is looked up first and replaced when present; an identity the
    /// store does not know is inserted under a freshly assigned key.
    pub async fn save<E: Entity>(&self, entity: &mut E) -> Result<EntityId, EngineError> {
        let type_name = E::type_name();
        let schema = schema_for::<E>()?;
        let existing_id = if self.lifecycle.is_new(entity) {
            None
        } else {
            entity_id(entity)?
        };
        let full = E::descriptor().to_record(entity);
        let fresh = record_for_insert(entity, &schema);

        let (mut session, stored) = self
            .bounded("save", type_name, async {
                let mut session = self.session(type_name).await?;
                let stored = match existing_id {
                    Some(id) => session
                        .find(&schema, &id)
                        .await
                        .map_err(|e| EngineError::from_store(type_name, e))?
                        .map(|_| id),
                    None => None,
                };
                Ok::<_, EngineError>((session, stored))
            })
            .await?;

        let (id, kind) = if let Some(id) = stored {
            session.stage_update(&schema, full);
            Self::commit(type_name, session).await?;
            (id, ItemEventKind::Updated)
        } else {
            session.stage_add(&schema, fresh);
            let receipt = Self::commit(type_name, session).await?;
            (Self::first_assigned(type_name, &receipt)?, ItemEventKind::Added)
        };

        if kind == ItemEventKind::Added {
            write_identity(entity, id)?;
        }
        info!(type_name, %id, ?kind, "Saved item");
        self.notifier
            .notify_item_updated(kind, type_name, &id.to_string());
        Ok(id)
    }
}
