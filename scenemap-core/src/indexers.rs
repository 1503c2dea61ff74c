//! Indexer metadata: display names and per-indexer settings such as the XEM
//! origin key.

use std::collections::{BTreeMap, HashMap};

use scenemap_config::IndexerConfig;
use scenemap_model::IndexerKind;

pub const XEM_ORIGIN_KEY: &str = "xem_origin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerInfo {
    pub kind: IndexerKind,
    pub name: String,
    pub config: BTreeMap<String, String>,
}

impl IndexerInfo {
    pub fn new(kind: IndexerKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            config: BTreeMap::new(),
        }
    }

    pub fn with_xem_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.insert(XEM_ORIGIN_KEY.to_string(), origin.into());
        self
    }

    /// The key XEM uses for this indexer's numbering, if it has one.
    pub fn xem_origin(&self) -> Option<&str> {
        self.config
            .get(XEM_ORIGIN_KEY)
            .map(String::as_str)
            .filter(|origin| !origin.is_empty())
    }
}

pub trait IndexerRegistry: Send + Sync {
    fn indexer(&self, kind: IndexerKind) -> Option<IndexerInfo>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticIndexerRegistry {
    indexers: HashMap<IndexerKind, IndexerInfo>,
}

impl StaticIndexerRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// TheTVDB and TVRage with their XEM origins.
    pub fn builtin() -> Self {
        Self::empty()
            .with(
                IndexerInfo::new(IndexerKind::TVDB, "theTVDB")
                    .with_xem_origin("tvdb"),
            )
            .with(
                IndexerInfo::new(IndexerKind::TVRAGE, "TVRage")
                    .with_xem_origin("rage"),
            )
    }

    /// Built-ins overlaid with configured indexers; config wins on id clashes.
    pub fn from_config(indexers: &[IndexerConfig]) -> Self {
        indexers.iter().fold(Self::builtin(), |registry, entry| {
            let mut info =
                IndexerInfo::new(IndexerKind(entry.id), entry.name.clone());
            if let Some(origin) = &entry.xem_origin {
                info = info.with_xem_origin(origin.clone());
            }
            registry.with(info)
        })
    }

    pub fn with(mut self, info: IndexerInfo) -> Self {
        self.indexers.insert(info.kind, info);
        self
    }
}

impl IndexerRegistry for StaticIndexerRegistry {
    fn indexer(&self, kind: IndexerKind) -> Option<IndexerInfo> {
        self.indexers.get(&kind).cloned()
    }
}
