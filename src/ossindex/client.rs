use super::types::{ComponentReport, ComponentReportRequest};
use crate::config::{Credentials, OssIndexConfig};
use crate::model::OSS_INDEX_SOURCE;
use crate::traits::{LookupError, VulnerabilityLookup};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

const COMPONENT_REPORT_PATH: &str = "/api/v3/component-report";

/// Maximum number of coordinates OSS Index accepts per request.
pub const MAX_COORDINATES_PER_REQUEST: usize = 128;

/// Client for the Sonatype OSS Index REST API.
pub struct OssIndexClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl OssIndexClient {
    pub fn new(config: &OssIndexConfig) -> Result<Self, LookupError> {
        let base = config.base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(LookupError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("depscout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base, COMPONENT_REPORT_PATH),
            credentials: config.credentials.clone(),
        })
    }

    async fn fetch_chunk(&self, coordinates: &[String]) -> Result<Vec<ComponentReport>, LookupError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ComponentReportRequest { coordinates });
        if !self.credentials.is_anonymous() {
            request = request.basic_auth(&self.credentials.user, Some(&self.credentials.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable body: {}>", e),
            };
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl VulnerabilityLookup for OssIndexClient {
    fn service_name(&self) -> &str {
        OSS_INDEX_SOURCE
    }

    #[instrument(skip(self, coordinates), fields(count = coordinates.len()))]
    async fn component_reports(
        &self,
        coordinates: &[String],
    ) -> Result<Vec<ComponentReport>, LookupError> {
        let mut reports = Vec::with_capacity(coordinates.len());
        for chunk in coordinates.chunks(MAX_COORDINATES_PER_REQUEST) {
            let mut batch = self.fetch_chunk(chunk).await?;
            debug!(requested = chunk.len(), received = batch.len(), "component reports fetched");
            reports.append(&mut batch);
        }
        Ok(reports)
    }
}
