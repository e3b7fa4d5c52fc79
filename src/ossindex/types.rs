//! OSS Index `component-report` wire format.

use crate::model::{Vulnerability, OSS_INDEX_SOURCE};
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/v3/component-report`.
#[derive(Debug, Serialize)]
pub(crate) struct ComponentReportRequest<'a> {
    pub coordinates: &'a [String],
}

/// One report per requested coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    pub coordinates: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<OssVulnerability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OssVulnerability {
    pub id: String,
    pub display_name: String,
    pub title: String,
    pub description: String,
    pub cvss_score: f64,
    pub cvss_vector: String,
    pub cwe: String,
    pub cve: String,
    pub reference: String,
    pub version_ranges: Vec<String>,
    pub external_references: Vec<String>,
}

impl OssVulnerability {
    /// Converts into the internal representation, tagged with the OSS Index source.
    pub fn to_vulnerability(&self) -> Vulnerability {
        Vulnerability {
            source: OSS_INDEX_SOURCE.to_string(),
            id: self.id.clone(),
            cve: self.cve.clone(),
            cwe: self.cwe.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            reference: self.reference.clone(),
            cvss_score: self.cvss_score,
            cvss_vector: self.cvss_vector.clone(),
            version_ranges: self.version_ranges.clone(),
        }
    }
}

impl ComponentReport {
    pub fn vulnerabilities(&self) -> Vec<Vulnerability> {
        self.vulnerabilities
            .iter()
            .map(OssVulnerability::to_vulnerability)
            .collect()
    }
}
