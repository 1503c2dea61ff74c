//! Typed access to override, episode and refresh-ledger documents.

use std::sync::Arc;

use scenemap_model::{
    Document, EpisodeEntry, IndexerKind, RecordId, RefreshLedgerEntry,
    SceneNumbers, SceneOverride, SeasonEpisode, SeriesId,
};
use serde_json::Value;
use tracing::warn;

use crate::database::{RecordStore, StoreResult, StoredRecord};
use crate::error::StoreError;

/// A decoded record together with the document it came from.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub id: RecordId,
    pub record: T,
    document: Value,
}

impl<T: Document> Stored<T> {
    fn decode(raw: StoredRecord) -> Option<Self> {
        match serde_json::from_value::<T>(raw.document.clone()) {
            Ok(record) => Some(Self {
                id: raw.id,
                record,
                document: raw.document,
            }),
            Err(err) => {
                warn!(
                    record = %raw.id,
                    kind = %T::KIND,
                    error = %err,
                    "Skipping undecodable record"
                );
                None
            }
        }
    }

    /// The stored document with this record's fields written over it.
    fn merged_document(&self) -> StoreResult<Value> {
        let Value::Object(fields) = serde_json::to_value(&self.record)? else {
            return Err(StoreError::InvalidDocument);
        };
        let mut document = self.document.clone();
        let Value::Object(target) = &mut document else {
            return Err(StoreError::InvalidDocument);
        };
        target.extend(fields);
        Ok(document)
    }
}

#[derive(Clone)]
pub struct MappingRepository {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for MappingRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingRepository").finish_non_exhaustive()
    }
}

impl MappingRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    async fn load<T: Document>(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> StoreResult<Vec<Stored<T>>> {
        let raw = self.store.get_many(T::KIND, series).await?;
        Ok(raw
            .into_iter()
            .filter_map(Stored::<T>::decode)
            .filter(|stored| stored.record.indexer() == indexer)
            .collect())
    }

    pub(crate) async fn insert<T: Document>(
        &self,
        record: &T,
    ) -> StoreResult<RecordId> {
        let document = serde_json::to_value(record)?;
        self.store
            .insert(T::KIND, record.partition_key(), document)
            .await
    }

    async fn save<T: Document>(&self, stored: &Stored<T>) -> StoreResult<()> {
        let record = StoredRecord {
            id: stored.id,
            kind: T::KIND,
            partition_key: stored.record.partition_key(),
            document: stored.merged_document()?,
        };
        self.store.update(&record).await
    }

    pub async fn scene_overrides(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> StoreResult<Vec<Stored<SceneOverride>>> {
        self.load(series, indexer).await
    }

    /// First override addressed by the native pair, cleared ones included.
    pub async fn find_override_by_episode(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        native: SeasonEpisode,
    ) -> StoreResult<Option<Stored<SceneOverride>>> {
        Ok(self
            .scene_overrides(series, indexer)
            .await?
            .into_iter()
            .find(|stored| stored.record.native() == native))
    }

    /// First override addressed by the native absolute number.
    pub async fn find_override_by_absolute(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        absolute_number: u32,
    ) -> StoreResult<Option<Stored<SceneOverride>>> {
        Ok(self
            .scene_overrides(series, indexer)
            .await?
            .into_iter()
            .find(|stored| stored.record.absolute_number == absolute_number))
    }

    pub async fn insert_override(
        &self,
        record: &SceneOverride,
    ) -> StoreResult<RecordId> {
        self.insert(record).await
    }

    pub async fn update_override(
        &self,
        stored: &Stored<SceneOverride>,
    ) -> StoreResult<()> {
        self.save(stored).await
    }

    pub async fn episodes(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> StoreResult<Vec<Stored<EpisodeEntry>>> {
        self.load(series, indexer).await
    }

    /// Writes the three scene fields; other document keys are preserved.
    pub async fn set_episode_scene(
        &self,
        stored: &mut Stored<EpisodeEntry>,
        scene: SceneNumbers,
    ) -> StoreResult<()> {
        stored.record.scene_season = scene.season;
        stored.record.scene_episode = scene.episode;
        stored.record.scene_absolute_number = scene.absolute;
        self.save(stored).await
    }

    /// Resets scene fields on every episode of the series. Returns how many
    /// documents changed.
    pub async fn clear_episode_scenes(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> StoreResult<usize> {
        let mut cleared = 0;
        for mut stored in self.episodes(series, indexer).await? {
            if stored.record.scene_numbers() == SceneNumbers::UNMAPPED {
                continue;
            }
            self.set_episode_scene(&mut stored, SceneNumbers::UNMAPPED)
                .await?;
            cleared += 1;
        }
        Ok(cleared)
    }

    /// Native absolute number, provided exactly one episode has this pair.
    pub async fn absolute_number_for(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        native: SeasonEpisode,
    ) -> StoreResult<Option<u32>> {
        let matches: Vec<_> = self
            .episodes(series, indexer)
            .await?
            .into_iter()
            .filter(|stored| stored.record.native() == native)
            .collect();

        Ok(match matches.as_slice() {
            [only] => Some(only.record.absolute_number),
            _ => None,
        })
    }

    pub async fn refresh_ledger(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> StoreResult<Option<Stored<RefreshLedgerEntry>>> {
        Ok(self.load(series, indexer).await?.into_iter().next())
    }

    /// Records a refresh at `at` (unix seconds), reusing `existing` if given.
    pub async fn mark_refreshed(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        at: i64,
        existing: Option<Stored<RefreshLedgerEntry>>,
    ) -> StoreResult<()> {
        match existing {
            Some(mut stored) => {
                stored.record.last_refreshed = at;
                self.save(&stored).await
            }
            None => {
                let entry = RefreshLedgerEntry {
                    indexer_id: series,
                    indexer,
                    last_refreshed: at,
                };
                self.insert(&entry).await.map(|_| ())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryRecordStore;
    use scenemap_model::RecordKind;
    use serde_json::json;

    const SERIES: SeriesId = SeriesId(100);

    fn repo() -> (InMemoryRecordStore, MappingRepository) {
        let store = InMemoryRecordStore::new();
        let repository = MappingRepository::new(Arc::new(store.clone()));
        (store, repository)
    }

    #[tokio::test]
    async fn scene_update_preserves_catalog_fields() {
        let (store, repository) = repo();
        store
            .insert(
                RecordKind::TvEpisode,
                SERIES,
                json!({
                    "indexer_id": 100,
                    "indexer": 1,
                    "season": 2,
                    "episode": 3,
                    "absolute_number": 15,
                    "name": "The Return",
                    "airdate": 735000,
                }),
            )
            .await
            .expect("seed episode");

        let mut episodes = repository
            .episodes(SERIES, IndexerKind::TVDB)
            .await
            .expect("episodes");
        let scene = SceneNumbers {
            season: 3,
            episode: 1,
            absolute: 15,
        };
        repository
            .set_episode_scene(&mut episodes[0], scene)
            .await
            .expect("update scene");

        let raw = store
            .get(RecordKind::TvEpisode, SERIES)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(raw.document["name"], "The Return");
        assert_eq!(raw.document["airdate"], 735000);
        assert_eq!(raw.document["scene_season"], 3);
        assert_eq!(raw.document["scene_episode"], 1);
        assert_eq!(raw.document["scene_absolute_number"], 15);
    }

    #[tokio::test]
    async fn queries_are_scoped_to_the_indexer() {
        let (_, repository) = repo();
        for indexer in [IndexerKind::TVDB, IndexerKind::TVRAGE] {
            repository
                .insert_override(&SceneOverride {
                    indexer_id: SERIES,
                    indexer,
                    season: 1,
                    episode: 1,
                    absolute_number: 0,
                    scene_season: indexer.value() as u32,
                    scene_episode: 1,
                    scene_absolute_number: 0,
                })
                .await
                .expect("insert override");
        }

        let found = repository
            .find_override_by_episode(
                SERIES,
                IndexerKind::TVRAGE,
                SeasonEpisode::new(1, 1),
            )
            .await
            .expect("query")
            .expect("override present");
        assert_eq!(found.record.scene_season, 2);
    }

    #[tokio::test]
    async fn undecodable_documents_are_skipped() {
        let (store, repository) = repo();
        store
            .insert(
                RecordKind::TvEpisode,
                SERIES,
                json!({"indexer_id": 100, "indexer": 1, "season": "one"}),
            )
            .await
            .expect("seed bad doc");

        let episodes = repository
            .episodes(SERIES, IndexerKind::TVDB)
            .await
            .expect("episodes");
        assert!(episodes.is_empty());
    }

    #[tokio::test]
    async fn absolute_number_requires_a_unique_match() {
        let (_, repository) = repo();
        let series_eps = [
            EpisodeEntry::new(SERIES, IndexerKind::TVDB, 1, 1)
                .with_absolute_number(1),
            EpisodeEntry::new(SERIES, IndexerKind::TVDB, 1, 2)
                .with_absolute_number(2),
            EpisodeEntry::new(SERIES, IndexerKind::TVDB, 1, 2)
                .with_absolute_number(3),
        ];
        for episode in &series_eps {
            repository.insert(episode).await.expect("seed episode");
        }

        let unique = repository
            .absolute_number_for(
                SERIES,
                IndexerKind::TVDB,
                SeasonEpisode::new(1, 1),
            )
            .await
            .expect("query");
        assert_eq!(unique, Some(1));

        let ambiguous = repository
            .absolute_number_for(
                SERIES,
                IndexerKind::TVDB,
                SeasonEpisode::new(1, 2),
            )
            .await
            .expect("query");
        assert_eq!(ambiguous, None);
    }

    #[tokio::test]
    async fn mark_refreshed_keeps_one_ledger_entry() {
        let (store, repository) = repo();
        repository
            .mark_refreshed(SERIES, IndexerKind::TVDB, 1_000, None)
            .await
            .expect("first mark");
        let existing = repository
            .refresh_ledger(SERIES, IndexerKind::TVDB)
            .await
            .expect("ledger");
        repository
            .mark_refreshed(SERIES, IndexerKind::TVDB, 2_000, existing)
            .await
            .expect("second mark");

        assert_eq!(store.count(RecordKind::XemRefresh).await, 1);
        let ledger = repository
            .refresh_ledger(SERIES, IndexerKind::TVDB)
            .await
            .expect("ledger")
            .expect("present");
        assert_eq!(ledger.record.last_refreshed, 2_000);
    }
}
