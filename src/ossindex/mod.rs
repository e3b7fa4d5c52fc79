//! Sonatype OSS Index integration.
//!
//! - **Types**: the `component-report` request/response shapes via [`ComponentReport`]
//! - **Client**: [`OssIndexClient`], the HTTP implementation of
//!   [`VulnerabilityLookup`](crate::traits::VulnerabilityLookup)

pub mod client;
pub mod types;

pub use client::{OssIndexClient, MAX_COORDINATES_PER_REQUEST};
pub use types::{ComponentReport, OssVulnerability};
