use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config file {path} does not exist")]
    MissingConfig { path: PathBuf },
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid XEM base url '{value}'")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid duration for {field}: '{value}'")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid boolean for {field}: '{value}'")]
    InvalidBool { field: &'static str, value: String },
    #[error("xem refresh ttl must be greater than zero")]
    ZeroRefreshTtl,
    #[error("indexer {id} is declared more than once")]
    DuplicateIndexer { id: u16 },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
