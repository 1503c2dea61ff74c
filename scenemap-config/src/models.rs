use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_REFRESH_TTL, DEFAULT_USER_AGENT, DEFAULT_XEM_BASE_URL,
};

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub metadata: ConfigMetadata,
    pub database: DatabaseConfig,
    pub xem: XemConfig,
    /// Indexers declared in the config file, in addition to the built-ins.
    pub indexers: Vec<IndexerConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Settings for the XEM client and its refresh policy.
#[derive(Debug, Clone)]
pub struct XemConfig {
    pub base_url: Url,
    pub refresh_ttl: Duration,
    /// `None` keeps the HTTP client's default behaviour.
    pub request_timeout: Option<Duration>,
    /// Serialize refreshes per series/indexer pair.
    pub single_flight: bool,
    pub user_agent: String,
}

impl Default for XemConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_XEM_BASE_URL)
                .expect("default XEM url is valid"),
            refresh_ttl: DEFAULT_REFRESH_TTL,
            request_timeout: None,
            single_flight: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub id: u16,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xem_origin: Option<String>,
}
