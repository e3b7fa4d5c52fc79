use crate::ossindex::ComponentReport;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to decode component reports: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait VulnerabilityLookup: Send + Sync {
    /// Returns the display name of the vulnerability service (e.g., "Sonatype OSS Index").
    fn service_name(&self) -> &str;

    /// Fetches one report per coordinate string in a single batched lookup.
    async fn component_reports(
        &self,
        coordinates: &[String],
    ) -> Result<Vec<ComponentReport>, LookupError>;
}
