use crate::purl::Purl;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name of the vulnerability source, stamped on every converted record.
pub const OSS_INDEX_SOURCE: &str = "Sonatype OSS Index";

/// A dependency occurrence found by the upstream discovery stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub coordinate: Purl,
    pub file_path: String, // path inside the repository, e.g. "package.json"
    pub provenance: Provenance,
}

/// Where and when a dependency was introduced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub repo_path: String,
    pub repo_url: String,
    pub commit_hash: String,
    pub timestamp: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub source: String,
    pub id: String,
    pub cve: String,
    pub cwe: String,
    pub title: String,
    pub description: String,
    pub reference: String,
    pub cvss_score: f64,
    pub cvss_vector: String,
    pub version_ranges: Vec<String>,
}

/// A dependency occurrence together with the vulnerabilities reported for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerableDependency {
    pub vulnerabilities: Vec<Vulnerability>,
    pub dependency_name: String,
    pub version: String,
    pub file_path: String,
    pub repo_path: String,
    pub repo_url: String,
    pub commit_hash: String,
    pub timestamp: DateTime<Utc>,
    pub commit_author: String,
    pub commit_email: String,
}

impl VulnerableDependency {
    /// Combines a matched dependency with its converted vulnerabilities.
    pub fn new(dependency: &Dependency, vulnerabilities: Vec<Vulnerability>) -> Self {
        let provenance = &dependency.provenance;
        Self {
            vulnerabilities,
            dependency_name: dependency.coordinate.name().to_string(),
            version: dependency.coordinate.version().to_string(),
            file_path: dependency.file_path.clone(),
            repo_path: provenance.repo_path.clone(),
            repo_url: provenance.repo_url.clone(),
            commit_hash: provenance.commit_hash.clone(),
            timestamp: provenance.timestamp,
            commit_author: provenance.author_name.clone(),
            commit_email: provenance.author_email.clone(),
        }
    }
}
