use async_trait::async_trait;
use reqwest::Client;
use scenemap_config::XemConfig;
use scenemap_model::SeriesId;
use tracing::debug;
use url::Url;

use super::XemError;
use super::models::{HaveMap, MappingTable};

/// The two XEM endpoints the refresher needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait XemApi: Send + Sync {
    /// Series ids XEM holds any mapping for, keyed by `origin`.
    async fn have_map(&self, origin: &str) -> Result<HaveMap, XemError>;

    /// Complete `origin` to scene table for one series.
    async fn all_mappings(
        &self,
        series: SeriesId,
        origin: &str,
    ) -> Result<MappingTable, XemError>;
}

#[derive(Debug, Clone)]
pub struct XemHttpClient {
    client: Client,
    base_url: Url,
}

impl XemHttpClient {
    pub fn new(config: &XemConfig) -> Result<Self, XemError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config.base_url.clone()))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, XemError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| XemError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path);
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, XemError> {
        debug!(%url, "Requesting XEM");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(XemError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl XemApi for XemHttpClient {
    async fn have_map(&self, origin: &str) -> Result<HaveMap, XemError> {
        let url = self.endpoint(&["map", "havemap"], &[("origin", origin)])?;
        let body = self.get_bytes(url).await?;
        let have_map = HaveMap::from_slice(&body)?;
        if let Some(message) = have_map.rejection() {
            return Err(XemError::Rejected {
                message: message.to_string(),
            });
        }
        Ok(have_map)
    }

    async fn all_mappings(
        &self,
        series: SeriesId,
        origin: &str,
    ) -> Result<MappingTable, XemError> {
        let id = series.to_string();
        let url = self.endpoint(
            &["map", "all"],
            &[("id", &id), ("origin", origin), ("destination", "scene")],
        )?;
        let body = self.get_bytes(url).await?;
        Ok(MappingTable::from_slice(&body)?)
    }
}
