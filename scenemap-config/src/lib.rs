//! Shared configuration library for scenemap.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables (after an optional `.env` file is applied).
//! The CLI and any embedding service load through [`ConfigLoader`] so there
//! is a single set of defaults and validation rules.

pub mod constants;
pub mod loader;
pub mod models;
pub mod sources;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::{Config, ConfigMetadata, DatabaseConfig, IndexerConfig, XemConfig};
pub use sources::{EnvConfig, FileConfig};
