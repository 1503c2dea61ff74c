use async_trait::async_trait;
use scenemap_model::{RecordId, RecordKind, SeriesId};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use tracing::info;

use super::ports::{RecordStore, StoreResult, StoredRecord};
use crate::error::StoreError;

/// Stores every record kind as JSONB rows of `scene_records`.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRecordStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: i64,
    kind: String,
    partition_key: i64,
    document: Json<Value>,
}

impl TryFrom<RecordRow> for StoredRecord {
    type Error = StoreError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        Ok(StoredRecord {
            id: RecordId(row.id),
            kind: row.kind.parse()?,
            partition_key: SeriesId(row.partition_key),
            document: row.document.0,
        })
    }
}

impl PostgresRecordStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        info!("Connecting to record store");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        crate::MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn get(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
    ) -> StoreResult<Option<StoredRecord>> {
        let row: Option<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, kind, partition_key, document
            FROM scene_records
            WHERE kind = $1 AND partition_key = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(kind.as_str())
        .bind(partition_key.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoredRecord::try_from).transpose()
    }

    async fn get_many(
        &self,
        kind: RecordKind,
        partition_key: SeriesId,
    ) -> StoreResult<Vec<StoredRecord>> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT id, kind, partition_key, document
            FROM scene_records
            WHERE kind = $1 AND partition_key = $2
            ORDER BY id
            "#,
        )
        .bind(kind.as_str())
        .bind(partition_key.value())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StoredRecord::try_from).collect()
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

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO scene_records (kind, partition_key, document)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(kind.as_str())
        .bind(partition_key.value())
        .bind(Json(document))
        .fetch_one(&self.pool)
        .await?;

        Ok(RecordId(id))
    }

    async fn update(&self, record: &StoredRecord) -> StoreResult<()> {
        if !record.document.is_object() {
            return Err(StoreError::InvalidDocument);
        }

        let result = sqlx::query(
            r#"
            UPDATE scene_records
            SET document = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(record.id.0)
        .bind(Json(&record.document))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(record.id));
        }
        Ok(())
    }
}
