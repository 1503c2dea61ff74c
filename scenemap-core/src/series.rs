use async_trait::async_trait;
use scenemap_model::SeriesId;

/// The host application's view of a series.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesCatalog: Send + Sync {
    /// `None` when the series is not loaded locally.
    async fn is_scene_numbered(&self, series: SeriesId) -> Option<bool>;

    /// Drop any cached episode objects so the next read hits the store.
    async fn invalidate_episode_cache(&self, series: SeriesId);
}

/// Catalog for processes that hold no series objects, such as the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSeriesCatalog;

#[async_trait]
impl SeriesCatalog for DetachedSeriesCatalog {
    async fn is_scene_numbered(&self, _series: SeriesId) -> Option<bool> {
        None
    }

    async fn invalidate_episode_cache(&self, _series: SeriesId) {}
}
