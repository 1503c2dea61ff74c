//! Client side of thexem.de: the `havemap` probe, the full mapping fetch and
//! applying the result to stored episodes.

mod client;
mod models;
mod refresh;

pub use client::{XemApi, XemHttpClient};
#[cfg(test)]
pub use client::MockXemApi;
pub use models::{HaveMap, MappingTable, XemMapping};
pub use refresh::{RefreshOutcome, XemRefresher};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XemError {
    #[error("XEM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("XEM answered with HTTP {status}")]
    Status { status: u16 },

    #[error("Unreadable XEM response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("XEM rejected the request: {message}")]
    Rejected { message: String },

    #[error("Invalid XEM base URL: {0}")]
    BaseUrl(String),
}
