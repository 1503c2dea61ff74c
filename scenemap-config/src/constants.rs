use std::time::Duration;

pub const DEFAULT_XEM_BASE_URL: &str = "http://thexem.de";

/// XEM data is considered fresh for one day.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(86_400);

pub const DEFAULT_USER_AGENT: &str =
    concat!("scenemap/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["scenemap.toml", "config/scenemap.toml"];

pub const ENV_CONFIG_PATH: &str = "SCENEMAP_CONFIG";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_XEM_BASE_URL: &str = "XEM_BASE_URL";
pub const ENV_XEM_REFRESH_TTL: &str = "XEM_REFRESH_TTL";
pub const ENV_XEM_REQUEST_TIMEOUT: &str = "XEM_REQUEST_TIMEOUT";
pub const ENV_XEM_SINGLE_FLIGHT: &str = "XEM_SINGLE_FLIGHT";
