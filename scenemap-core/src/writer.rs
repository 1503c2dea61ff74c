use std::sync::Arc;

use scenemap_model::{
    IndexerKind, RecordId, SceneOverride, SeasonEpisode, SeriesId,
};
use tracing::{info, warn};

use crate::error::Result;
use crate::repository::MappingRepository;
use crate::series::SeriesCatalog;

/// Fields of a local override write. Zero means "not given".
///
/// A non-zero `season` and `episode` address the override by pair;
/// otherwise a non-zero `absolute_number` addresses it by absolute number.
/// Writing a zero scene pair clears a pair override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneNumberingUpdate {
    pub season: u32,
    pub episode: u32,
    pub absolute_number: u32,
    pub scene_season: u32,
    pub scene_episode: u32,
    pub scene_absolute_number: u32,
}

impl SceneNumberingUpdate {
    pub fn episode(native: SeasonEpisode, scene: SeasonEpisode) -> Self {
        Self {
            season: native.season,
            episode: native.episode,
            scene_season: scene.season,
            scene_episode: scene.episode,
            ..Self::default()
        }
    }

    pub fn absolute(absolute_number: u32, scene_absolute_number: u32) -> Self {
        Self {
            absolute_number,
            scene_absolute_number,
            ..Self::default()
        }
    }

    fn record(&self, series: SeriesId, indexer: IndexerKind) -> SceneOverride {
        SceneOverride {
            indexer_id: series,
            indexer,
            season: self.season,
            episode: self.episode,
            absolute_number: self.absolute_number,
            scene_season: self.scene_season,
            scene_episode: self.scene_episode,
            scene_absolute_number: self.scene_absolute_number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted(RecordId),
    Updated(RecordId),
    /// Neither a pair nor an absolute number was given, or the series id
    /// is invalid.
    Ignored,
}

/// Writes local overrides and tells the series to drop cached episodes.
#[derive(Clone)]
pub struct OverrideWriter {
    repository: MappingRepository,
    series: Arc<dyn SeriesCatalog>,
}

impl std::fmt::Debug for OverrideWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideWriter")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl OverrideWriter {
    pub fn new(
        repository: MappingRepository,
        series: Arc<dyn SeriesCatalog>,
    ) -> Self {
        Self { repository, series }
    }

    pub async fn set_scene_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        update: SceneNumberingUpdate,
    ) -> Result<WriteOutcome> {
        if !series.is_valid() {
            warn!(%series, %indexer, "Refusing scene override for invalid series id");
            return Ok(WriteOutcome::Ignored);
        }

        let outcome = if update.season != 0 && update.episode != 0 {
            self.write_episode(series, indexer, update).await?
        } else if update.absolute_number != 0 {
            self.write_absolute(series, indexer, update).await?
        } else {
            return Ok(WriteOutcome::Ignored);
        };

        self.series.invalidate_episode_cache(series).await;
        info!(%series, %indexer, ?outcome, "Stored scene numbering override");
        Ok(outcome)
    }

    async fn write_episode(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        update: SceneNumberingUpdate,
    ) -> Result<WriteOutcome> {
        let native = SeasonEpisode::new(update.season, update.episode);
        match self
            .repository
            .find_override_by_episode(series, indexer, native)
            .await?
        {
            Some(mut stored) => {
                stored.record.scene_season = update.scene_season;
                stored.record.scene_episode = update.scene_episode;
                self.repository.update_override(&stored).await?;
                Ok(WriteOutcome::Updated(stored.id))
            }
            None => {
                let id = self
                    .repository
                    .insert_override(&update.record(series, indexer))
                    .await?;
                Ok(WriteOutcome::Inserted(id))
            }
        }
    }

    async fn write_absolute(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        update: SceneNumberingUpdate,
    ) -> Result<WriteOutcome> {
        match self
            .repository
            .find_override_by_absolute(series, indexer, update.absolute_number)
            .await?
        {
            Some(mut stored) => {
                stored.record.scene_absolute_number =
                    update.scene_absolute_number;
                self.repository.update_override(&stored).await?;
                Ok(WriteOutcome::Updated(stored.id))
            }
            None => {
                let id = self
                    .repository
                    .insert_override(&update.record(series, indexer))
                    .await?;
                Ok(WriteOutcome::Inserted(id))
            }
        }
    }
}
