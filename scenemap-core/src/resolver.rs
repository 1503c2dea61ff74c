//! Native to scene numbering lookups.
//!
//! Forward lookups try a local override first, then the XEM-backed episode
//! fields, then hand the input back unchanged. Reverse lookups only read
//! episode fields; overrides are not indexed by their scene side.
//!
//! Nothing here returns an error. Store failures are logged and treated as
//! "no mapping".

use std::collections::BTreeMap;
use std::sync::Arc;

use scenemap_model::{
    EpisodeEntry, IndexerKind, SceneOverride, SeasonEpisode, SeriesId,
};
use tracing::{debug, warn};

use crate::database::StoreResult;
use crate::repository::{MappingRepository, Stored};
use crate::scheduler::RefreshScheduler;
use crate::series::SeriesCatalog;

pub struct SceneNumberingResolver {
    repository: MappingRepository,
    scheduler: Arc<RefreshScheduler>,
    series: Arc<dyn SeriesCatalog>,
}

impl std::fmt::Debug for SceneNumberingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNumberingResolver")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

fn records<T>(
    result: StoreResult<Vec<Stored<T>>>,
    series: SeriesId,
    indexer: IndexerKind,
) -> Vec<T> {
    match result {
        Ok(stored) => stored.into_iter().map(|s| s.record).collect(),
        Err(err) => {
            warn!(%series, %indexer, error = %err, "Numbering lookup fell back to identity");
            Vec::new()
        }
    }
}

impl SceneNumberingResolver {
    pub fn new(
        repository: MappingRepository,
        scheduler: Arc<RefreshScheduler>,
        series: Arc<dyn SeriesCatalog>,
    ) -> Self {
        Self {
            repository,
            scheduler,
            series,
        }
    }

    /// Series explicitly flagged as not scene numbered always resolve to
    /// their input. Unknown series are treated as scene numbered.
    async fn uses_scene_numbering(&self, series: SeriesId) -> bool {
        self.series.is_scene_numbered(series).await != Some(false)
    }

    async fn overrides(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> Vec<SceneOverride> {
        records(
            self.repository.scene_overrides(series, indexer).await,
            series,
            indexer,
        )
    }

    async fn episodes(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> Vec<EpisodeEntry> {
        records(self.repository.episodes(series, indexer).await, series, indexer)
    }

    async fn refreshed_episodes(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> Vec<EpisodeEntry> {
        self.scheduler.refresh(series, indexer, false).await;
        self.episodes(series, indexer).await
    }

    /// Scene (season, episode) for a native pair; the input when unmapped.
    pub async fn scene_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        native: SeasonEpisode,
        fallback_to_xem: bool,
    ) -> SeasonEpisode {
        if !self.uses_scene_numbering(series).await {
            return native;
        }
        if let Some(scene) =
            self.find_scene_numbering(series, indexer, native).await
        {
            return scene;
        }
        if fallback_to_xem
            && let Some(scene) =
                self.find_xem_numbering(series, indexer, native).await
        {
            return scene;
        }
        native
    }

    /// [`Self::scene_numbering`] for callers holding partial data. Any
    /// missing part returns the season and episode as given.
    pub async fn scene_numbering_parts(
        &self,
        series: Option<SeriesId>,
        indexer: IndexerKind,
        season: Option<u32>,
        episode: Option<u32>,
        fallback_to_xem: bool,
    ) -> (Option<u32>, Option<u32>) {
        let (Some(series), Some(native)) =
            (series, SeasonEpisode::from_parts(season, episode))
        else {
            return (season, episode);
        };
        let scene = self
            .scene_numbering(series, indexer, native, fallback_to_xem)
            .await;
        (Some(scene.season), Some(scene.episode))
    }

    /// Local override for a native pair, ignoring cleared overrides.
    async fn find_scene_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        native: SeasonEpisode,
    ) -> Option<SeasonEpisode> {
        self.overrides(series, indexer)
            .await
            .into_iter()
            .find(|o| o.native() == native && o.scene().is_mapped())
            .map(|o| o.scene())
    }

    /// XEM numbering for a native pair, refreshing first when due.
    async fn find_xem_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        native: SeasonEpisode,
    ) -> Option<SeasonEpisode> {
        self.refreshed_episodes(series, indexer)
            .await
            .into_iter()
            .find(|e| e.native() == native && e.scene().is_mapped())
            .map(|e| e.scene())
    }

    /// Scene absolute number for a native one. `0` is never resolved.
    pub async fn scene_absolute_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        absolute_number: u32,
        fallback_to_xem: bool,
    ) -> u32 {
        if absolute_number == 0 || !self.uses_scene_numbering(series).await {
            return absolute_number;
        }
        if let Some(scene) = self
            .find_scene_absolute_numbering(series, indexer, absolute_number)
            .await
        {
            return scene;
        }
        if fallback_to_xem
            && let Some(scene) = self
                .find_xem_absolute_numbering(series, indexer, absolute_number)
                .await
        {
            return scene;
        }
        absolute_number
    }

    pub async fn scene_absolute_numbering_parts(
        &self,
        series: Option<SeriesId>,
        indexer: IndexerKind,
        absolute_number: Option<u32>,
        fallback_to_xem: bool,
    ) -> Option<u32> {
        let (Some(series), Some(absolute)) = (series, absolute_number) else {
            return absolute_number;
        };
        Some(
            self.scene_absolute_numbering(
                series,
                indexer,
                absolute,
                fallback_to_xem,
            )
            .await,
        )
    }

    async fn find_scene_absolute_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        absolute_number: u32,
    ) -> Option<u32> {
        self.overrides(series, indexer)
            .await
            .into_iter()
            .find(|o| {
                o.absolute_number == absolute_number
                    && o.scene_absolute_number != 0
            })
            .map(|o| o.scene_absolute_number)
    }

    async fn find_xem_absolute_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        absolute_number: u32,
    ) -> Option<u32> {
        self.refreshed_episodes(series, indexer)
            .await
            .into_iter()
            .find(|e| {
                e.absolute_number == absolute_number
                    && e.scene_absolute_number != 0
            })
            .map(|e| e.scene_absolute_number)
    }

    /// Native (season, episode) for a scene pair.
    ///
    /// Only episode fields are searched. On a miss with `fallback_to_xem`
    /// the series is refreshed (subject to the TTL) and searched once more.
    pub async fn indexer_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        scene: SeasonEpisode,
        fallback_to_xem: bool,
    ) -> SeasonEpisode {
        if !scene.is_mapped() || !self.uses_scene_numbering(series).await {
            return scene;
        }
        let find = |episodes: Vec<EpisodeEntry>| {
            episodes
                .into_iter()
                .find(|e| e.scene() == scene)
                .map(|e| e.native())
        };

        if let Some(native) = find(self.episodes(series, indexer).await) {
            return native;
        }
        if fallback_to_xem
            && let Some(native) =
                find(self.refreshed_episodes(series, indexer).await)
        {
            return native;
        }
        scene
    }

    pub async fn indexer_numbering_parts(
        &self,
        series: Option<SeriesId>,
        indexer: IndexerKind,
        scene_season: Option<u32>,
        scene_episode: Option<u32>,
        fallback_to_xem: bool,
    ) -> (Option<u32>, Option<u32>) {
        let (Some(series), Some(scene)) =
            (series, SeasonEpisode::from_parts(scene_season, scene_episode))
        else {
            return (scene_season, scene_episode);
        };
        let native = self
            .indexer_numbering(series, indexer, scene, fallback_to_xem)
            .await;
        (Some(native.season), Some(native.episode))
    }

    /// Native absolute number for a scene absolute number.
    ///
    /// `scene_season` narrows the match when one absolute number appears in
    /// two scene seasons.
    pub async fn indexer_absolute_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        scene_absolute: u32,
        scene_season: Option<u32>,
        fallback_to_xem: bool,
    ) -> u32 {
        if scene_absolute == 0 || !self.uses_scene_numbering(series).await {
            return scene_absolute;
        }
        let find = |episodes: Vec<EpisodeEntry>| {
            episodes
                .into_iter()
                .find(|e| {
                    e.scene_absolute_number == scene_absolute
                        && e.absolute_number != 0
                        && scene_season.is_none_or(|s| e.scene_season == s)
                })
                .map(|e| e.absolute_number)
        };

        if let Some(native) = find(self.episodes(series, indexer).await) {
            return native;
        }
        if fallback_to_xem
            && let Some(native) =
                find(self.refreshed_episodes(series, indexer).await)
        {
            return native;
        }
        scene_absolute
    }

    pub async fn indexer_absolute_numbering_parts(
        &self,
        series: Option<SeriesId>,
        indexer: IndexerKind,
        scene_absolute: Option<u32>,
        scene_season: Option<u32>,
        fallback_to_xem: bool,
    ) -> Option<u32> {
        let (Some(series), Some(absolute)) = (series, scene_absolute) else {
            return scene_absolute;
        };
        Some(
            self.indexer_absolute_numbering(
                series,
                indexer,
                absolute,
                scene_season,
                fallback_to_xem,
            )
            .await,
        )
    }

    /// Every local override of the series. Cleared overrides are left out,
    /// and a series without scene numbering has none.
    pub async fn scene_numbering_for_show(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> BTreeMap<SeasonEpisode, SeasonEpisode> {
        if !self.uses_scene_numbering(series).await {
            return BTreeMap::new();
        }
        self.overrides(series, indexer)
            .await
            .into_iter()
            .filter(|o| !o.scene().is_unset())
            .map(|o| (o.native(), o.scene()))
            .collect()
    }

    /// Every XEM mapped episode of the series, refreshing first when due.
    pub async fn xem_numbering_for_show(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> BTreeMap<SeasonEpisode, SeasonEpisode> {
        if !self.uses_scene_numbering(series).await {
            return BTreeMap::new();
        }
        self.refreshed_episodes(series, indexer)
            .await
            .into_iter()
            .filter(|e| !e.scene().is_unset())
            .map(|e| (e.native(), e.scene()))
            .collect()
    }

    pub async fn scene_absolute_numbering_for_show(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> BTreeMap<u32, u32> {
        if !self.uses_scene_numbering(series).await {
            return BTreeMap::new();
        }
        self.overrides(series, indexer)
            .await
            .into_iter()
            .filter(|o| o.absolute_number != 0 && o.scene_absolute_number != 0)
            .map(|o| (o.absolute_number, o.scene_absolute_number))
            .collect()
    }

    pub async fn xem_absolute_numbering_for_show(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
    ) -> BTreeMap<u32, u32> {
        if !self.uses_scene_numbering(series).await {
            return BTreeMap::new();
        }
        self.refreshed_episodes(series, indexer)
            .await
            .into_iter()
            .filter(|e| e.absolute_number != 0 && e.scene_absolute_number != 0)
            .map(|e| (e.absolute_number, e.scene_absolute_number))
            .collect()
    }

    /// Native absolute number of an episode, when exactly one episode of the
    /// series carries this (season, episode).
    pub async fn absolute_number_from_season_and_episode(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        native: SeasonEpisode,
    ) -> Option<u32> {
        if !native.is_mapped() {
            return None;
        }
        match self
            .repository
            .absolute_number_for(series, indexer, native)
            .await
        {
            Ok(Some(absolute)) if absolute != 0 => {
                debug!(%series, episode = %native, absolute, "Found absolute number");
                Some(absolute)
            }
            Ok(_) => {
                debug!(%series, episode = %native, "No unique absolute number");
                None
            }
            Err(err) => {
                warn!(%series, %indexer, error = %err, "Absolute number lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use scenemap_model::{Document, RecordKind};
    use serde_json::json;

    use super::*;
    use crate::clock::ManualClock;
    use crate::database::{InMemoryRecordStore, RecordStore};
    use crate::indexers::StaticIndexerRegistry;
    use crate::xem::{HaveMap, MappingTable, MockXemApi, XemRefresher};

    const SERIES: SeriesId = SeriesId(100);
    const TVDB: IndexerKind = IndexerKind::TVDB;

    struct Catalog(Option<bool>);

    #[async_trait]
    impl SeriesCatalog for Catalog {
        async fn is_scene_numbered(&self, _series: SeriesId) -> Option<bool> {
            self.0
        }

        async fn invalidate_episode_cache(&self, _series: SeriesId) {}
    }

    struct Harness {
        store: InMemoryRecordStore,
        repository: MappingRepository,
    }

    impl Harness {
        fn new() -> Self {
            let store = InMemoryRecordStore::new();
            let repository = MappingRepository::new(Arc::new(store.clone()));
            Self { store, repository }
        }

        fn resolver(
            &self,
            api: MockXemApi,
            scene_numbered: Option<bool>,
        ) -> SceneNumberingResolver {
            let refresher = XemRefresher::new(
                Arc::new(api),
                self.repository.clone(),
                Arc::new(StaticIndexerRegistry::builtin()),
            );
            let scheduler = RefreshScheduler::new(
                self.repository.clone(),
                refresher,
                Arc::new(ManualClock::at(1_700_000_000)),
            );
            SceneNumberingResolver::new(
                self.repository.clone(),
                Arc::new(scheduler),
                Arc::new(Catalog(scene_numbered)),
            )
        }

        async fn episode(&self, entry: EpisodeEntry) {
            self.store
                .insert(
                    EpisodeEntry::KIND,
                    SERIES,
                    serde_json::to_value(&entry).expect("encode"),
                )
                .await
                .expect("seed episode");
        }

        async fn mapped_episode(
            &self,
            native: (u32, u32, u32),
            scene: (u32, u32, u32),
        ) {
            let mut entry = EpisodeEntry::new(SERIES, TVDB, native.0, native.1)
                .with_absolute_number(native.2);
            entry.scene_season = scene.0;
            entry.scene_episode = scene.1;
            entry.scene_absolute_number = scene.2;
            self.episode(entry).await;
        }

        async fn scene_override(
            &self,
            native: (u32, u32, u32),
            scene: (u32, u32, u32),
        ) {
            self.repository
                .insert_override(&SceneOverride {
                    indexer_id: SERIES,
                    indexer: TVDB,
                    season: native.0,
                    episode: native.1,
                    absolute_number: native.2,
                    scene_season: scene.0,
                    scene_episode: scene.1,
                    scene_absolute_number: scene.2,
                })
                .await
                .expect("insert override");
        }
    }

    /// XEM that is never expected to be called.
    fn offline() -> MockXemApi {
        let mut api = MockXemApi::new();
        api.expect_have_map().never();
        api.expect_all_mappings().never();
        api
    }

    /// XEM that knows the series and maps S01E01 to S01E13.
    fn xem_with_mapping() -> MockXemApi {
        let mut api = MockXemApi::new();
        api.expect_have_map()
            .times(1)
            .returning(|_| Ok(HaveMap::from_ids([SERIES.value()])));
        api.expect_all_mappings().times(1).returning(|_, _| {
            Ok(MappingTable::from_entries(vec![json!({
                "tvdb": {"season": 1, "episode": 1, "absolute": 1},
                "scene": {"season": 1, "episode": 13, "absolute": 13},
            })]))
        });
        api
    }

    #[tokio::test]
    async fn unmapped_episode_resolves_to_itself() {
        let harness = Harness::new();
        let resolver = harness.resolver(offline(), None);

        let scene = resolver
            .scene_numbering(SERIES, TVDB, SeasonEpisode::new(1, 1), false)
            .await;
        assert_eq!(scene, SeasonEpisode::new(1, 1));
    }

    #[tokio::test]
    async fn partial_inputs_are_returned_unchanged() {
        let harness = Harness::new();
        let resolver = harness.resolver(offline(), None);

        assert_eq!(
            resolver
                .scene_numbering_parts(Some(SERIES), TVDB, Some(1), None, true)
                .await,
            (Some(1), None)
        );
        assert_eq!(
            resolver
                .scene_numbering_parts(None, TVDB, Some(1), Some(2), true)
                .await,
            (Some(1), Some(2))
        );
        assert_eq!(
            resolver
                .scene_absolute_numbering_parts(Some(SERIES), TVDB, None, true)
                .await,
            None
        );
        assert_eq!(
            resolver
                .indexer_absolute_numbering_parts(None, TVDB, Some(7), None, true)
                .await,
            Some(7)
        );
    }

    #[tokio::test]
    async fn override_wins_over_episode_fields() {
        let harness = Harness::new();
        harness.mapped_episode((1, 1, 1), (1, 5, 5)).await;
        harness.scene_override((1, 1, 0), (1, 13, 0)).await;
        let resolver = harness.resolver(offline(), None);

        let scene = resolver
            .scene_numbering(SERIES, TVDB, SeasonEpisode::new(1, 1), false)
            .await;
        assert_eq!(scene, SeasonEpisode::new(1, 13));
    }

    #[tokio::test]
    async fn cleared_override_is_ignored() {
        let harness = Harness::new();
        harness.scene_override((1, 1, 0), (0, 0, 0)).await;
        harness.scene_override((1, 2, 0), (3, 0, 0)).await;
        let resolver = harness.resolver(offline(), None);

        for episode in [1, 2] {
            let native = SeasonEpisode::new(1, episode);
            assert_eq!(
                resolver.scene_numbering(SERIES, TVDB, native, false).await,
                native
            );
        }
        let dump = resolver.scene_numbering_for_show(SERIES, TVDB).await;
        assert_eq!(dump.len(), 1);
        assert_eq!(
            dump.get(&SeasonEpisode::new(1, 2)),
            Some(&SeasonEpisode::new(3, 0))
        );
    }

    #[tokio::test]
    async fn series_without_scene_numbering_short_circuits() {
        let harness = Harness::new();
        harness.scene_override((1, 1, 1), (1, 13, 13)).await;
        harness.mapped_episode((1, 1, 1), (1, 13, 13)).await;
        let resolver = harness.resolver(offline(), Some(false));

        assert_eq!(
            resolver
                .scene_numbering(SERIES, TVDB, SeasonEpisode::new(1, 1), true)
                .await,
            SeasonEpisode::new(1, 1)
        );
        assert_eq!(
            resolver.scene_absolute_numbering(SERIES, TVDB, 1, true).await,
            1
        );
        assert_eq!(
            resolver
                .indexer_numbering(SERIES, TVDB, SeasonEpisode::new(1, 13), true)
                .await,
            SeasonEpisode::new(1, 13)
        );
        assert_eq!(
            resolver
                .indexer_absolute_numbering(SERIES, TVDB, 13, None, true)
                .await,
            13
        );
        assert!(resolver.scene_numbering_for_show(SERIES, TVDB).await.is_empty());
        assert!(resolver.xem_numbering_for_show(SERIES, TVDB).await.is_empty());
        assert!(
            resolver
                .scene_absolute_numbering_for_show(SERIES, TVDB)
                .await
                .is_empty()
        );
        assert!(
            resolver
                .xem_absolute_numbering_for_show(SERIES, TVDB)
                .await
                .is_empty()
        );
        assert_eq!(harness.store.count(RecordKind::XemRefresh).await, 0);
    }

    #[tokio::test]
    async fn xem_fallback_refreshes_then_reads_episode_fields() {
        let harness = Harness::new();
        harness
            .episode(EpisodeEntry::new(SERIES, TVDB, 1, 1).with_absolute_number(1))
            .await;
        let resolver = harness.resolver(xem_with_mapping(), None);

        let scene = resolver
            .scene_numbering(SERIES, TVDB, SeasonEpisode::new(1, 1), true)
            .await;
        assert_eq!(scene, SeasonEpisode::new(1, 13));

        // Inside the TTL now; the mock allows a single fetch.
        assert_eq!(
            resolver.find_xem_absolute_numbering(SERIES, TVDB, 1).await,
            Some(13)
        );
        assert_eq!(
            resolver
                .xem_numbering_for_show(SERIES, TVDB)
                .await
                .get(&SeasonEpisode::new(1, 1)),
            Some(&SeasonEpisode::new(1, 13))
        );
    }

    #[tokio::test]
    async fn no_fallback_never_touches_xem() {
        let harness = Harness::new();
        harness.mapped_episode((1, 1, 1), (1, 13, 13)).await;
        let resolver = harness.resolver(offline(), None);

        assert_eq!(
            resolver
                .scene_numbering(SERIES, TVDB, SeasonEpisode::new(1, 1), false)
                .await,
            SeasonEpisode::new(1, 1)
        );
        assert_eq!(harness.store.count(RecordKind::XemRefresh).await, 0);
    }

    #[tokio::test]
    async fn absolute_lookups_use_override_then_episode_fields() {
        let harness = Harness::new();
        harness.scene_override((0, 0, 10), (0, 0, 20)).await;
        harness.mapped_episode((1, 11, 11), (2, 1, 30)).await;
        harness.mapped_episode((1, 12, 12), (0, 0, 0)).await;
        let mut api = MockXemApi::new();
        api.expect_have_map()
            .times(1)
            .returning(|_| Ok(HaveMap::from_ids([SERIES.value()])));
        api.expect_all_mappings()
            .times(1)
            .returning(|_, _| Ok(MappingTable::from_entries(Vec::new())));
        let resolver = harness.resolver(api, None);

        for (native, scene) in [(10, 20), (11, 30), (12, 12)] {
            assert_eq!(
                resolver
                    .scene_absolute_numbering(SERIES, TVDB, native, true)
                    .await,
                scene
            );
        }
    }

    #[tokio::test]
    async fn reverse_lookup_ignores_overrides() {
        let harness = Harness::new();
        harness.scene_override((1, 1, 0), (1, 13, 0)).await;
        let resolver = harness.resolver(offline(), None);

        let native = resolver
            .indexer_numbering(SERIES, TVDB, SeasonEpisode::new(1, 13), false)
            .await;
        assert_eq!(native, SeasonEpisode::new(1, 13));
    }

    #[tokio::test]
    async fn reverse_lookup_retries_after_refresh() {
        let harness = Harness::new();
        harness.episode(EpisodeEntry::new(SERIES, TVDB, 1, 1)).await;
        let resolver = harness.resolver(xem_with_mapping(), None);

        let native = resolver
            .indexer_numbering(SERIES, TVDB, SeasonEpisode::new(1, 13), true)
            .await;
        assert_eq!(native, SeasonEpisode::new(1, 1));
    }

    #[tokio::test]
    async fn reverse_absolute_can_be_narrowed_by_scene_season() {
        let harness = Harness::new();
        harness.mapped_episode((1, 1, 1), (1, 1, 5)).await;
        harness.mapped_episode((2, 1, 14), (2, 1, 5)).await;
        let resolver = harness.resolver(offline(), None);

        assert_eq!(
            resolver
                .indexer_absolute_numbering(SERIES, TVDB, 5, None, false)
                .await,
            1
        );
        assert_eq!(
            resolver
                .indexer_absolute_numbering(SERIES, TVDB, 5, Some(2), false)
                .await,
            14
        );
        assert_eq!(
            resolver
                .indexer_absolute_numbering(SERIES, TVDB, 5, Some(3), false)
                .await,
            5
        );
    }

    #[tokio::test]
    async fn absolute_dumps_skip_unmapped_entries() {
        let harness = Harness::new();
        harness.mapped_episode((1, 1, 1), (1, 1, 3)).await;
        harness.mapped_episode((1, 2, 2), (0, 0, 0)).await;
        harness.mapped_episode((0, 1, 0), (0, 1, 9)).await;
        harness.scene_override((0, 0, 4), (0, 0, 8)).await;
        harness.scene_override((0, 0, 5), (0, 0, 0)).await;
        let mut api = MockXemApi::new();
        api.expect_have_map()
            .returning(|_| Err(crate::xem::XemError::Status { status: 502 }));
        let resolver = harness.resolver(api, None);

        let xem = resolver.xem_absolute_numbering_for_show(SERIES, TVDB).await;
        assert_eq!(xem, BTreeMap::from([(1, 3)]));
        let local = resolver.scene_absolute_numbering_for_show(SERIES, TVDB).await;
        assert_eq!(local, BTreeMap::from([(4, 8)]));
    }

    #[tokio::test]
    async fn absolute_number_needs_a_full_pair() {
        let harness = Harness::new();
        harness.mapped_episode((3, 4, 28), (0, 0, 0)).await;
        let resolver = harness.resolver(offline(), None);

        assert_eq!(
            resolver
                .absolute_number_from_season_and_episode(
                    SERIES,
                    TVDB,
                    SeasonEpisode::new(3, 4),
                )
                .await,
            Some(28)
        );
        assert_eq!(
            resolver
                .absolute_number_from_season_and_episode(
                    SERIES,
                    TVDB,
                    SeasonEpisode::new(0, 4),
                )
                .await,
            None
        );
    }
}
