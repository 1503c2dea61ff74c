//! Scene numbering for TV series.
//!
//! Maps an indexer's native season/episode/absolute numbering to the
//! numbering used by scene release groups. Lookups consult local overrides,
//! then episode fields populated from [thexem.de](http://thexem.de), and
//! finally return their input unchanged.
//!
//! [`SceneNumbering`] wires the pieces together; each component can also be
//! constructed directly when an embedder supplies its own ports.

pub mod clock;
pub mod database;
pub mod error;
pub mod indexers;
pub mod repository;
pub mod resolver;
pub mod scheduler;
pub mod series;
pub mod service;
pub mod writer;
pub mod xem;

pub use clock::{Clock, ManualClock, SystemClock};
pub use database::{InMemoryRecordStore, RecordStore, StoredRecord};
#[cfg(feature = "database")]
pub use database::PostgresRecordStore;
pub use error::{NumberingError, Result, StoreError};
pub use indexers::{IndexerInfo, IndexerRegistry, StaticIndexerRegistry};
pub use repository::{MappingRepository, Stored};
pub use resolver::SceneNumberingResolver;
pub use scheduler::{RefreshScheduler, is_due};
pub use series::{DetachedSeriesCatalog, SeriesCatalog};
pub use service::{SceneNumbering, SceneNumberingBuilder};
pub use writer::{OverrideWriter, SceneNumberingUpdate, WriteOutcome};
pub use xem::{
    HaveMap, MappingTable, RefreshOutcome, XemApi, XemError, XemHttpClient,
    XemMapping, XemRefresher,
};

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
