pub mod error;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::constants::DEFAULT_CONFIG_FILES;
use crate::models::{Config, ConfigMetadata, DatabaseConfig, XemConfig};
use crate::sources::{EnvConfig, FileConfig};
use error::ConfigLoadError;

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Applies the `.env` file, then loads from the process environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_from(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Loads using an explicit environment snapshot.
    pub fn load_from(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file, config_path) = self.load_file_config(&env)?;
        let config = compose(file.unwrap_or_default(), env, config_path)?;
        Ok(ConfigLoad { config })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_FILES
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file = read_file_config(&path)?;
        debug!(path = %path.display(), "loaded config file");
        Ok((Some(file), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn compose(
    file: FileConfig,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<Config, ConfigLoadError> {
    let defaults = XemConfig::default();

    let base_url = match env.xem_base_url.or(file.xem.base_url) {
        Some(raw) => Url::parse(&raw).map_err(|source| {
            ConfigLoadError::InvalidBaseUrl { value: raw, source }
        })?,
        None => defaults.base_url,
    };

    let refresh_ttl = match env.xem_refresh_ttl.or(file.xem.refresh_ttl) {
        Some(raw) => parse_duration("xem.refresh_ttl", raw)?,
        None => defaults.refresh_ttl,
    };
    if refresh_ttl.is_zero() {
        return Err(ConfigLoadError::ZeroRefreshTtl);
    }

    let request_timeout =
        match env.xem_request_timeout.or(file.xem.request_timeout) {
            Some(raw) => Some(parse_duration("xem.request_timeout", raw)?),
            None => defaults.request_timeout,
        };

    let single_flight = match env.xem_single_flight {
        Some(raw) => parse_bool("xem.single_flight", raw)?,
        None => file.xem.single_flight.unwrap_or(defaults.single_flight),
    };

    let mut seen = HashSet::new();
    for indexer in &file.indexers {
        if !seen.insert(indexer.id) {
            return Err(ConfigLoadError::DuplicateIndexer { id: indexer.id });
        }
    }

    Ok(Config {
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
        database: DatabaseConfig {
            url: env.database_url.or(file.database.url),
        },
        xem: XemConfig {
            base_url,
            refresh_ttl,
            request_timeout,
            single_flight,
            user_agent: file.xem.user_agent.unwrap_or(defaults.user_agent),
        },
        indexers: file.indexers,
    })
}

fn parse_duration(
    field: &'static str,
    value: String,
) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(value.trim()).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            field,
            value,
            source,
        }
    })
}

fn parse_bool(field: &'static str, value: String) -> Result<bool, ConfigLoadError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigLoadError::InvalidBool { field, value }),
    }
}
