//! TTL gate in front of the XEM refresher.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use scenemap_config::constants::DEFAULT_REFRESH_TTL;
use scenemap_model::{IndexerKind, SeriesId};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::repository::MappingRepository;
use crate::xem::{RefreshOutcome, XemRefresher};

type RefreshKey = (SeriesId, IndexerKind);

/// `true` when a ledger entry written at `last` is older than `ttl` at `now`.
/// Times are unix seconds; an entry exactly `ttl` old is still fresh.
pub fn is_due(last: Option<i64>, now: i64, ttl: Duration) -> bool {
    let Some(last) = last else {
        return true;
    };
    let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    now.saturating_sub(last) > ttl
}

/// Decides whether a series is due for an XEM refresh and runs it.
///
/// The ledger is stamped before the remote call, so a slow or failing
/// fetch is not retried until the TTL lapses again. Without single-flight,
/// concurrent callers may both fetch; applying a mapping twice is harmless.
pub struct RefreshScheduler {
    repository: MappingRepository,
    refresher: XemRefresher,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    locks: Option<DashMap<RefreshKey, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("ttl", &self.ttl)
            .field("single_flight", &self.locks.is_some())
            .finish_non_exhaustive()
    }
}

impl RefreshScheduler {
    pub fn new(
        repository: MappingRepository,
        refresher: XemRefresher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            refresher,
            clock,
            ttl: DEFAULT_REFRESH_TTL,
            locks: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Serialize due-check and fetch per (series, indexer). A lock lives only
    /// while some caller holds or waits on it.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(DashMap::new);
        self
    }

    pub async fn refresh(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        force: bool,
    ) -> RefreshOutcome {
        if !series.is_valid() {
            debug!(%series, %indexer, "Ignoring refresh for invalid series id");
            return RefreshOutcome::Skipped;
        }

        let Some(locks) = &self.locks else {
            return self.refresh_if_due(series, indexer, force).await;
        };

        let key = (series, indexer);
        let lock = locks.entry(key).or_default().clone();
        let outcome = {
            let _guard = lock.lock_owned().await;
            self.refresh_if_due(series, indexer, force).await
        };
        locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        outcome
    }

    async fn refresh_if_due(
        &self,
        series: SeriesId,
        indexer: IndexerKind,
        force: bool,
    ) -> RefreshOutcome {
        let now = self.clock.now().timestamp();
        let ledger = match self.repository.refresh_ledger(series, indexer).await
        {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(%series, %indexer, error = %err, "Could not read XEM refresh ledger");
                return RefreshOutcome::Failed;
            }
        };

        let last = ledger.as_ref().map(|stored| stored.record.last_refreshed);
        if !force && !is_due(last, now, self.ttl) {
            return RefreshOutcome::NotDue;
        }

        if let Err(err) = self
            .repository
            .mark_refreshed(series, indexer, now, ledger)
            .await
        {
            warn!(%series, %indexer, error = %err, "Could not update XEM refresh ledger");
            return RefreshOutcome::Failed;
        }

        self.refresher.refresh(series, indexer).await
    }
}
