use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::documents::{
    json_href, ApiRootDocument, DataDocument, PeriodDocument, StationDocument,
    StationListDocument, VersionDocument,
};
use crate::error::{CollectorError, Result};
use crate::models::ResourceDescriptor;

/// Client for the upstream hypermedia API. One shared instance is cloned
/// into each worker; `reqwest::Client` is internally reference counted.
#[derive(Debug, Clone)]
pub struct MetobsClient {
    http: reqwest::Client,
    root_url: String,
}

impl MetobsClient {
    pub fn new(root_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            root_url: root_url.into(),
        })
    }

    /// Resolve the catalog: root -> "latest" version -> JSON link ->
    /// resource list. Any failure here is fatal for the run.
    pub async fn load_catalog(&self) -> Result<Vec<ResourceDescriptor>> {
        let root: ApiRootDocument = self
            .get_json(&self.root_url)
            .await
            .map_err(|e| CollectorError::CatalogUnavailable(e.to_string()))?;

        let latest = root.latest_version().ok_or_else(|| {
            CollectorError::CatalogUnavailable(format!(
                "no 'latest' version entry at {}",
                self.root_url
            ))
        })?;

        let href = json_href(&latest.link).ok_or_else(|| {
            CollectorError::CatalogUnavailable(
                "no JSON-typed link on the 'latest' version entry".to_string(),
            )
        })?;

        let version: VersionDocument = self
            .get_json(href)
            .await
            .map_err(|e| CollectorError::CatalogUnavailable(e.to_string()))?;

        let mut descriptors = Vec::with_capacity(version.resource.len());
        for entry in &version.resource {
            let endpoint = entry.link.first().ok_or_else(|| {
                CollectorError::CatalogUnavailable(format!(
                    "resource '{}' has no link",
                    entry.key
                ))
            })?;
            descriptors.push(ResourceDescriptor::new(
                entry.key.clone(),
                entry.title.clone(),
                entry.summary.clone(),
                endpoint.href.clone(),
            ));
        }

        debug!(resources = descriptors.len(), "catalog loaded");
        Ok(descriptors)
    }

    pub async fn fetch_station_list(&self, endpoint: &str) -> Result<StationListDocument> {
        self.get_json(endpoint).await
    }

    pub async fn fetch_station_document(&self, url: &str) -> Result<StationDocument> {
        self.get_json(url).await
    }

    pub async fn fetch_period_document(&self, url: &str) -> Result<PeriodDocument> {
        self.get_json(url).await
    }

    pub async fn fetch_data_document(&self, url: &str) -> Result<DataDocument> {
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}
