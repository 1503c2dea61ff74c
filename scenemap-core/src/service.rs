//! Wiring for embedders: one handle over resolver, writer and scheduler.

use std::sync::Arc;

use scenemap_config::{Config, XemConfig};
use scenemap_model::{IndexerKind, SeriesId};

use crate::clock::{Clock, SystemClock};
use crate::database::RecordStore;
use crate::error::Result;
use crate::indexers::{IndexerRegistry, StaticIndexerRegistry};
use crate::repository::MappingRepository;
use crate::resolver::SceneNumberingResolver;
use crate::scheduler::RefreshScheduler;
use crate::series::{DetachedSeriesCatalog, SeriesCatalog};
use crate::writer::{OverrideWriter, SceneNumberingUpdate, WriteOutcome};
use crate::xem::{RefreshOutcome, XemApi, XemHttpClient, XemRefresher};

#[derive(Debug)]
pub struct SceneNumbering {
    resolver: SceneNumberingResolver,
    writer: OverrideWriter,
    scheduler: Arc<RefreshScheduler>,
}

impl SceneNumbering {
    pub fn builder(store: Arc<dyn RecordStore>) -> SceneNumberingBuilder {
        SceneNumberingBuilder::new(store)
    }

    /// Service over `store` using the XEM settings and indexers in `config`.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn RecordStore>,
        series: Arc<dyn SeriesCatalog>,
    ) -> Result<Self> {
        Self::builder(store)
            .xem_config(config.xem.clone())
            .indexers(Arc::new(StaticIndexerRegistry::from_config(
                &config.indexers,
            )))
            .series_catalog(series)
            .build()
    }

    pub fn resolver(&self) -> &SceneNumberingResolver {
        &self.resolver
    }

    pub fn writer(&self) -> &OverrideWriter {
        &self.writer
    }

    pub async fn set_scene_numbering(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        update: SceneNumberingUpdate,
    ) -> Result<WriteOutcome> {
        self.writer
            .set_scene_numbering(series, indexer, update)
            .await
    }

    /// Runs the XEM refresh for a series, honouring the TTL unless `force`.
    pub async fn refresh(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        force: bool,
    ) -> RefreshOutcome {
        self.scheduler.refresh(series, indexer, force).await
    }
}

pub struct SceneNumberingBuilder {
    store: Arc<dyn RecordStore>,
    xem: XemConfig,
    api: Option<Arc<dyn XemApi>>,
    indexers: Option<Arc<dyn IndexerRegistry>>,
    series: Option<Arc<dyn SeriesCatalog>>,
    clock: Option<Arc<dyn Clock>>,
}

impl std::fmt::Debug for SceneNumberingBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNumberingBuilder")
            .field("xem", &self.xem)
            .field("custom_api", &self.api.is_some())
            .finish_non_exhaustive()
    }
}

impl SceneNumberingBuilder {
    fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            xem: XemConfig::default(),
            api: None,
            indexers: None,
            series: None,
            clock: None,
        }
    }

    pub fn xem_config(mut self, xem: XemConfig) -> Self {
        self.xem = xem;
        self
    }

    /// Replaces the HTTP client built from the XEM config.
    pub fn xem_api(mut self, api: Arc<dyn XemApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn indexers(mut self, indexers: Arc<dyn IndexerRegistry>) -> Self {
        self.indexers = Some(indexers);
        self
    }

    pub fn series_catalog(mut self, series: Arc<dyn SeriesCatalog>) -> Self {
        self.series = Some(series);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<SceneNumbering> {
        let api: Arc<dyn XemApi> = match self.api {
            Some(api) => api,
            None => Arc::new(XemHttpClient::new(&self.xem)?),
        };
        let indexers: Arc<dyn IndexerRegistry> = self
            .indexers
            .unwrap_or_else(|| Arc::new(StaticIndexerRegistry::builtin()));
        let series: Arc<dyn SeriesCatalog> = self
            .series
            .unwrap_or_else(|| Arc::new(DetachedSeriesCatalog));
        let clock: Arc<dyn Clock> =
            self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let repository = MappingRepository::new(self.store);
        let refresher = XemRefresher::new(api, repository.clone(), indexers);
        let scheduler = Arc::new(
            RefreshScheduler::new(repository.clone(), refresher, clock)
                .with_ttl(self.xem.refresh_ttl)
                .with_single_flight(self.xem.single_flight),
        );

        Ok(SceneNumbering {
            resolver: SceneNumberingResolver::new(
                repository.clone(),
                scheduler.clone(),
                series.clone(),
            ),
            writer: OverrideWriter::new(repository, series),
            scheduler,
        })
    }
}
