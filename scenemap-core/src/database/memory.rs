use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use scenemap_model::{RecordId, RecordKind, SeriesId};
use serde_json::Value;
use tokio::sync::Mutex;

use super::ports::{RecordStore, StoreResult, StoredRecord};
use crate::error::StoreError;

/// Process-local store used by tests and embedded callers.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecordStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    records: BTreeMap<RecordId, StoredRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records of `kind` across all partitions.
    pub async fn count(&self, kind: RecordKind) -> usize {
        let guard = self.state.lock().await;
        guard.records.values().filter(|r| r.kind == kind).count()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
    ) -> StoreResult<Option<StoredRecord>> {
        let guard = self.state.lock().await;
        Ok(guard
            .records
            .values()
            .find(|r| r.kind == kind && r.partition_key == partition_key)
            .cloned())
    }

    async fn get_many(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
    ) -> StoreResult<Vec<StoredRecord>> {
        let guard = self.state.lock().await;
        Ok(guard
            .records
            .values()
            .filter(|r| r.kind == kind && r.partition_key == partition_key)
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
        document: Value,
    ) -> StoreResult<RecordId> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument);
        }

        let mut guard = self.state.lock().await;
        guard.next_id += 1;
        let id = RecordId(guard.next_id);
        guard.records.insert(
            id,
            StoredRecord {
                id,
                kind,
                partition_key,
                document,
            },
        );
        Ok(id)
    }

    async fn update(&self, record: &StoredRecord) -> StoreResult<()> {
        if !record.document.is_object() {
            return Err(StoreError::InvalidDocument);
        }

        let mut guard = self.state.lock().await;
        let existing = guard
            .records
            .get_mut(&record.id)
            .ok_or(StoreError::NotFound(record.id))?;
        existing.document = record.document.clone();
        Ok(())
    }
}
