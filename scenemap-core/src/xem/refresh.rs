use std::sync::Arc;

use scenemap_model::{IndexerKind, SeriesId};
use tracing::{debug, info, warn};

use super::XemError;
use super::client::XemApi;
use crate::error::NumberingError;
use crate::indexers::IndexerRegistry;
use crate::repository::MappingRepository;

/// What a refresh request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing to do for this series or indexer.
    Skipped,
    /// Last refresh is still within the TTL.
    NotDue,
    /// XEM does not know the series; scene numbers were reset.
    Cleared { episodes: usize },
    /// Mapping table fetched and written to matching episodes.
    Applied { mappings: usize, episodes: usize },
    /// Remote or store failure; stored numbering left as it was.
    Failed,
}

/// Pulls XEM mappings for a series and writes them onto its episodes.
///
/// Failures are logged here and reported as [`RefreshOutcome::Failed`];
/// nothing propagates to lookup callers.
#[derive(Clone)]
pub struct XemRefresher {
    api: Arc<dyn XemApi>,
    repository: MappingRepository,
    indexers: Arc<dyn IndexerRegistry>,
}

impl std::fmt::Debug for XemRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XemRefresher")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl XemRefresher {
    pub fn new(
        api: Arc<dyn XemApi>,
        repository: MappingRepository,
        indexers: Arc<dyn IndexerRegistry>,
    ) -> Self {
        Self {
            api,
            repository,
            indexers,
        }
    }

    pub async fn refresh(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> RefreshOutcome {
        let Some(info) = self.indexers.indexer(indexer) else {
            warn!(%series, %indexer, "Unknown indexer, skipping XEM refresh");
            return RefreshOutcome::Skipped;
        };
        let Some(origin) = info.xem_origin() else {
            debug!(
                %series,
                indexer = %info.name,
                "Indexer has no XEM origin, skipping refresh"
            );
            return RefreshOutcome::Skipped;
        };

        debug!(%series, indexer = %info.name, origin, "Looking up XEM mapping");
        match self.try_refresh(series, indexer, origin).await {
            Ok(outcome) => outcome,
            Err(NumberingError::Xem(XemError::Rejected { message })) => {
                info!(
                    %series,
                    indexer = %info.name,
                    %message,
                    "No XEM data for show"
                );
                RefreshOutcome::Failed
            }
            Err(NumberingError::Xem(err)) => {
                warn!(
                    %series,
                    indexer = %info.name,
                    origin,
                    error = %err,
                    "XEM refresh failed"
                );
                RefreshOutcome::Failed
            }
            Err(err) => {
                warn!(
                    %series,
                    indexer = %info.name,
                    error = %err,
                    "Could not store XEM mapping"
                );
                RefreshOutcome::Failed
            }
        }
    }

    async fn try_refresh(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        origin: &str,
    ) -> crate::Result<RefreshOutcome> {
        let have_map = self.api.have_map(origin).await?;
        debug!(%series, origin, known = have_map.len(), "Fetched XEM havemap");
        if !have_map.contains(series) {
            let episodes =
                self.repository.clear_episode_scenes(series, indexer).await?;
            info!(
                %series,
                %indexer,
                episodes,
                "Series unknown to XEM, cleared scene numbering"
            );
            return Ok(RefreshOutcome::Cleared { episodes });
        }

        let table = self.api.all_mappings(series, origin).await?;
        debug!(%series, origin, entries = table.len(), "Fetched XEM mapping table");
        if !table.is_success() {
            return Err(XemError::Rejected {
                message: table
                    .message
                    .clone()
                    .or_else(|| table.result.clone())
                    .unwrap_or_else(|| "missing result".to_string()),
            }
            .into());
        }

        let mut episodes = self.repository.episodes(series, indexer).await?;
        let mut mappings = 0;
        let mut updated = 0;
        for mapping in table.mappings(origin) {
            mappings += 1;
            let Some(scene) = mapping.effective_scene() else {
                continue;
            };
            let Some(episode) = episodes
                .iter_mut()
                .find(|stored| stored.record.native() == mapping.origin)
            else {
                debug!(%series, origin = %mapping.origin, "No episode for XEM entry");
                continue;
            };
            self.repository.set_episode_scene(episode, scene).await?;
            updated += 1;
        }

        info!(%series, %indexer, mappings, episodes = updated, "Applied XEM mapping");
        Ok(RefreshOutcome::Applied {
            mappings,
            episodes: updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InMemoryRecordStore, RecordStore};
    use crate::indexers::StaticIndexerRegistry;
    use crate::xem::{HaveMap, MappingTable, MockXemApi};
    use scenemap_model::{
        Document, EpisodeEntry, SceneNumbers, SeasonEpisode,
    };
    use serde_json::json;

    const SERIES: SeriesId = SeriesId(100);

    async fn seeded() -> (InMemoryRecordStore, MappingRepository) {
        let store = InMemoryRecordStore::new();
        let mut mapped = EpisodeEntry::new(SERIES, IndexerKind::TVDB, 1, 1);
        mapped.scene_season = 1;
        mapped.scene_episode = 5;
        mapped.scene_absolute_number = 5;
        let episodes = [
            mapped,
            EpisodeEntry::new(SERIES, IndexerKind::TVDB, 1, 2),
            EpisodeEntry::new(SERIES, IndexerKind::TVDB, 2, 1),
        ];
        for episode in &episodes {
            store
                .insert(
                    EpisodeEntry::KIND,
                    SERIES,
                    serde_json::to_value(episode).expect("encode"),
                )
                .await
                .expect("seed episode");
        }
        let repository = MappingRepository::new(Arc::new(store.clone()));
        (store, repository)
    }

    fn refresher(api: MockXemApi, repository: MappingRepository) -> XemRefresher {
        XemRefresher::new(
            Arc::new(api),
            repository,
            Arc::new(StaticIndexerRegistry::builtin()),
        )
    }

    async fn scenes(repository: &MappingRepository) -> Vec<(SeasonEpisode, SceneNumbers)> {
        repository
            .episodes(SERIES, IndexerKind::TVDB)
            .await
            .expect("episodes")
            .into_iter()
            .map(|stored| (stored.record.native(), stored.record.scene_numbers()))
            .collect()
    }

    #[tokio::test]
    async fn absent_series_clears_scene_numbers() {
        let (_, repository) = seeded().await;
        let mut api = MockXemApi::new();
        api.expect_have_map().times(1).returning(|origin| {
            assert_eq!(origin, "tvdb");
            Ok(HaveMap::from_ids([7, 8]))
        });
        api.expect_all_mappings().never();

        let outcome = refresher(api, repository.clone())
            .refresh(SERIES, IndexerKind::TVDB)
            .await;

        assert_eq!(outcome, RefreshOutcome::Cleared { episodes: 1 });
        assert!(
            scenes(&repository)
                .await
                .iter()
                .all(|(_, scene)| *scene == SceneNumbers::UNMAPPED)
        );
    }

    #[tokio::test]
    async fn probe_failure_keeps_existing_numbers() {
        let (_, repository) = seeded().await;
        let mut api = MockXemApi::new();
        api.expect_have_map()
            .times(1)
            .returning(|_| Err(XemError::Status { status: 503 }));
        api.expect_all_mappings().never();

        let outcome = refresher(api, repository.clone())
            .refresh(SERIES, IndexerKind::TVDB)
            .await;

        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(
            scenes(&repository).await[0].1,
            SceneNumbers {
                season: 1,
                episode: 5,
                absolute: 5
            }
        );
    }

    #[tokio::test]
    async fn unsuccessful_fetch_leaves_data_untouched() {
        let (_, repository) = seeded().await;
        let mut api = MockXemApi::new();
        api.expect_have_map()
            .returning(|_| Ok(HaveMap::from_ids([SERIES.value()])));
        api.expect_all_mappings()
            .times(1)
            .returning(|_, _| Ok(MappingTable::failure("no show")));

        let outcome = refresher(api, repository.clone())
            .refresh(SERIES, IndexerKind::TVDB)
            .await;

        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(scenes(&repository).await[0].1.episode, 5);
    }

    #[tokio::test]
    async fn mapping_applies_scene_2_and_skips_orphans() {
        let (_, repository) = seeded().await;
        let mut api = MockXemApi::new();
        api.expect_have_map()
            .returning(|_| Ok(HaveMap::from_ids([SERIES.value()])));
        api.expect_all_mappings().times(1).returning(|series, origin| {
            assert_eq!(series, SERIES);
            assert_eq!(origin, "tvdb");
            Ok(MappingTable::from_entries(vec![
                json!({
                    "tvdb": {"season": 1, "episode": 2, "absolute": 2},
                    "scene": {"season": 1, "episode": 2, "absolute": 2},
                    "scene_2": {"season": 1, "episode": 3, "absolute": 3},
                }),
                json!({
                    "tvdb": {"season": 2, "episode": 1, "absolute": 3},
                    "scene": {"season": 1, "episode": 4, "absolute": 4},
                }),
                json!({
                    "tvdb": {"season": 9, "episode": 9},
                    "scene": {"season": 9, "episode": 1},
                }),
            ]))
        });

        let outcome = refresher(api, repository.clone())
            .refresh(SERIES, IndexerKind::TVDB)
            .await;

        assert_eq!(
            outcome,
            RefreshOutcome::Applied {
                mappings: 3,
                episodes: 2
            }
        );
        let scenes = scenes(&repository).await;
        assert_eq!(
            scenes[1],
            (
                SeasonEpisode::new(1, 2),
                SceneNumbers {
                    season: 1,
                    episode: 3,
                    absolute: 3
                }
            )
        );
        assert_eq!(
            scenes[2].1,
            SceneNumbers {
                season: 1,
                episode: 4,
                absolute: 4
            }
        );
    }

    #[tokio::test]
    async fn indexer_without_origin_is_skipped() {
        let (_, repository) = seeded().await;
        let mut api = MockXemApi::new();
        api.expect_have_map().never();

        let outcome = refresher(api, repository)
            .refresh(SERIES, IndexerKind(42))
            .await;

        assert_eq!(outcome, RefreshOutcome::Skipped);
    }
}
