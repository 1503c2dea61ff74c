use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ENV_CONFIG_PATH, ENV_DATABASE_URL, ENV_XEM_BASE_URL, ENV_XEM_REFRESH_TTL,
    ENV_XEM_REQUEST_TIMEOUT, ENV_XEM_SINGLE_FLIGHT,
};
use crate::models::IndexerConfig;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub xem: FileXemConfig,
    #[serde(default)]
    pub indexers: Vec<IndexerConfig>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Durations are humantime strings (`"1day"`, `"30s"`).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileXemConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_flight: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Values picked up from the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub xem_base_url: Option<String>,
    pub xem_refresh_ttl: Option<String>,
    pub xem_request_timeout: Option<String>,
    pub xem_single_flight: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();

        Self {
            config_path: vars.remove(ENV_CONFIG_PATH).map(PathBuf::from),
            database_url: vars.remove(ENV_DATABASE_URL),
            xem_base_url: vars.remove(ENV_XEM_BASE_URL),
            xem_refresh_ttl: vars.remove(ENV_XEM_REFRESH_TTL),
            xem_request_timeout: vars.remove(ENV_XEM_REQUEST_TIMEOUT),
            xem_single_flight: vars.remove(ENV_XEM_SINGLE_FLIGHT),
        }
    }
}
