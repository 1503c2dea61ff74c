use async_trait::async_trait;
use scenemap_model::{RecordId, RecordKind, SeriesId};
use serde_json::Value;

use crate::error::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A schemaless document as held by the store.
///
/// Every record kind is partitioned by series id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    pub partition_key: SeriesId,
    pub document: Value,
}

/// Keyed document store contract.
///
/// Implementations serialize individual operations; nothing spans more than
/// one call.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// First record of `kind` in the partition, in insertion order.
    async fn get(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
    ) -> StoreResult<Option<StoredRecord>>;

    /// All records of `kind` in the partition, in insertion order.
    async fn get_many(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
    ) -> StoreResult<Vec<StoredRecord>>;

    async fn insert(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
        document: Value,
    ) -> StoreResult<RecordId>;

    /// Replaces the document of an existing record.
    async fn update(&self, record: &StoredRecord) -> StoreResult<()>;
}
