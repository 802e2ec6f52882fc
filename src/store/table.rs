use super::{CommitReceipt, PendingOp, Record, StoreError, TableSchema};
use crate::entity::{EntityId, FieldKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Rows of one table plus its integer key counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TableData {
    next_key: i64,
    #[serde(default)]
    records: Vec<Record>,
}

impl Default for TableData {
    fn default() -> Self {
        Self {
            next_key: 1,
            records: Vec::new(),
        }
    }
}

impl TableData {
    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn find(&self, schema: &TableSchema, key: &EntityId) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| schema.key_of(record).as_ref() == Some(key))
    }

    fn contains(&self, schema: &TableSchema, key: &EntityId) -> bool {
        self.find(schema, key).is_some()
    }

    fn next_int_key(&mut self, schema: &TableSchema) -> Result<i64, StoreError> {
        let key = self.next_key;
        self.next_key = key.checked_add(1).ok_or_else(|| StoreError::Constraint {
            table: schema.name.clone(),
            message: "integer key space exhausted".to_string(),
        })?;
        Ok(key)
    }

    fn insert(&mut self, schema: &TableSchema, mut record: Record) -> Result<EntityId, StoreError> {
        schema.check_required(&record)?;

        let key = match schema.key_of(&record) {
            Some(key) => {
                if self.contains(schema, &key) {
                    return Err(StoreError::Constraint {
                        table: schema.name.clone(),
                        message: format!("duplicate key {key}"),
                    });
                }
                if let EntityId::Int(explicit) = key {
                    self.next_key = self.next_key.max(explicit.saturating_add(1));
                }
                key
            }
            None => match schema.key_kind {
                FieldKind::Int => EntityId::Int(self.next_int_key(schema)?),
                FieldKind::Uuid => EntityId::Uuid(Uuid::now_v7()),
                other => {
                    return Err(StoreError::Constraint {
                        table: schema.name.clone(),
                        message: format!("cannot assign a {other} key"),
                    })
                }
            },
        };

        record.insert(schema.key_field.clone(), key.to_value());
        self.records.push(record);
        Ok(key)
    }

    fn replace(
        &mut self,
        schema: &TableSchema,
        record: Record,
    ) -> Result<(usize, Record), StoreError> {
        schema.check_required(&record)?;
        let key = schema.key_of(&record).ok_or_else(|| StoreError::Constraint {
            table: schema.name.clone(),
            message: format!("update without a {} value", schema.key_field),
        })?;

        let index = self.position(schema, &key)?;
        let slot = self
            .records
            .get_mut(index)
            .ok_or_else(|| StoreError::NotFound {
                table: schema.name.clone(),
                key: key.to_string(),
            })?;
        Ok((index, std::mem::replace(slot, record)))
    }

    fn remove(
        &mut self,
        schema: &TableSchema,
        key: &EntityId,
    ) -> Result<(usize, Record), StoreError> {
        let index = self.position(schema, key)?;
        Ok((index, self.records.remove(index)))
    }

    fn position(&self, schema: &TableSchema, key: &EntityId) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|record| schema.key_of(record).as_ref() == Some(key))
            .ok_or_else(|| StoreError::NotFound {
                table: schema.name.clone(),
                key: key.to_string(),
            })
    }
}

/// What an applied op displaced, replayed in reverse to roll a commit back.
enum Undo {
    Created { table: String },
    Inserted { table: String, next_key: i64 },
    Replaced { table: String, index: usize, previous: Record },
    Removed { table: String, index: usize, previous: Record },
}

fn rollback(tables: &mut BTreeMap<String, TableData>, undo: Vec<Undo>) {
    for step in undo.into_iter().rev() {
        match step {
            Undo::Created { table } => {
                tables.remove(&table);
            }
            Undo::Inserted { table, next_key } => {
                if let Some(data) = tables.get_mut(&table) {
                    data.records.pop();
                    data.next_key = next_key;
                }
            }
            Undo::Replaced {
                table,
                index,
                previous,
            } => {
                let slot = tables
                    .get_mut(&table)
                    .and_then(|data| data.records.get_mut(index));
                if let Some(slot) = slot {
                    *slot = previous;
                }
            }
            Undo::Removed {
                table,
                index,
                previous,
            } => {
                if let Some(data) = tables.get_mut(&table) {
                    data.records.insert(index, previous);
                }
            }
        }
    }
}

/// Apply `ops` in order to `tables`, all or nothing.
///
/// When any op fails the ones already applied are undone, leaving `tables`
/// exactly as it was.
pub(crate) fn apply_ops(
    tables: &mut BTreeMap<String, TableData>,
    ops: Vec<PendingOp>,
) -> Result<CommitReceipt, StoreError> {
    let mut receipt = CommitReceipt::default();
    let mut undo = Vec::new();
    for op in ops {
        if let Err(e) = apply_one(tables, op, &mut receipt, &mut undo) {
            rollback(tables, undo);
            return Err(e);
        }
    }
    Ok(receipt)
}

fn apply_one(
    tables: &mut BTreeMap<String, TableData>,
    op: PendingOp,
    receipt: &mut CommitReceipt,
    undo: &mut Vec<Undo>,
) -> Result<(), StoreError> {
    let name = op.table().to_string();
    if !tables.contains_key(&name) {
        undo.push(Undo::Created {
            table: name.clone(),
        });
    }
    let table = tables.entry(name.clone()).or_default();
    match op {
        PendingOp::Add { schema, record } => {
            let next_key = table.next_key;
            receipt.assigned.push(table.insert(&schema, record)?);
            undo.push(Undo::Inserted {
                table: name,
                next_key,
            });
        }
        PendingOp::Update { schema, record } => {
            let (index, previous) = table.replace(&schema, record)?;
            undo.push(Undo::Replaced {
                table: name,
                index,
                previous,
            });
            receipt.updated = receipt.updated.saturating_add(1);
        }
        PendingOp::Remove { schema, key } => {
            let (index, previous) = table.remove(&schema, &key)?;
            undo.push(Undo::Removed {
                table: name,
                index,
                previous,
            });
            receipt.removed = receipt.removed.saturating_add(1);
        }
    }
    Ok(())
}
