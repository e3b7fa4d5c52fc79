//! Package coordinates in package-url ("purl") form.
//!
//! The canonical string is the correlation key between a dependency
//! occurrence and an OSS Index component report, so [`Purl`]'s `Display`
//! output must match what the service echoes back in `coordinates`.
//! Encoding and parsing are delegated to `packageurl`; qualifiers and
//! subpath are dropped because they never take part in correlation.

use packageurl::PackageUrl;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when building or parsing a coordinate.
#[derive(Error, Debug)]
pub enum PurlError {
    #[error("invalid package url: {0}")]
    Invalid(#[from] packageurl::Error),
    #[error("coordinate '{0}' has no package name")]
    MissingName(String),
    #[error("coordinate '{0}' has no version")]
    MissingVersion(String),
}

/// Structured package identifier (type, optional namespace, name, version).
///
/// Two coordinates are equal exactly when their canonical strings are.
#[derive(Debug, Clone)]
pub struct Purl {
    inner: PackageUrl<'static>,
}

impl Purl {
    /// Builds a coordinate; the ecosystem (purl type) is lower-cased.
    pub fn new(
        ecosystem: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, PurlError> {
        let ecosystem = ecosystem.into().to_ascii_lowercase();
        let name = name.into();
        let version = version.into();
        if name.is_empty() {
            return Err(PurlError::MissingName(format!("pkg:{}/", ecosystem)));
        }
        if version.is_empty() {
            return Err(PurlError::MissingVersion(format!("pkg:{}/{}", ecosystem, name)));
        }

        let mut inner = PackageUrl::new(ecosystem, name)?;
        inner.with_version(version);
        Ok(Self { inner })
    }

    /// Group, scope or vendor (`org.apache.commons`, `@babel`, `github.com/gorilla`).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        if !namespace.is_empty() {
            self.inner.with_namespace(namespace);
        }
        self
    }

    pub fn ecosystem(&self) -> &str {
        self.inner.ty()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.inner.namespace()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn version(&self) -> &str {
        self.inner.version().unwrap_or_default()
    }
}

impl fmt::Display for Purl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl FromStr for Purl {
    type Err = PurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = PackageUrl::from_str(s)?;
        let version = parsed
            .version()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| PurlError::MissingVersion(s.to_string()))?;

        let purl = Purl::new(parsed.ty(), parsed.name(), version)?;
        Ok(match parsed.namespace() {
            Some(namespace) => purl.with_namespace(namespace),
            None => purl,
        })
    }
}

impl PartialEq for Purl {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Purl {}

impl Hash for Purl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Serialize for Purl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Purl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
