pub mod config;
pub mod correlate;
pub mod executor;
pub mod logging;
pub mod model;
pub mod ossindex;
pub mod purl;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export common types for convenience
pub use correlate::{
    vulnerability_channel, Diagnostics, SearchError, TracingDiagnostics, VulnerabilityReceiver,
    VulnerabilitySearcher, VulnerabilitySink,
};
pub use executor::*;
pub use model::*;
pub use purl::{Purl, PurlError};
pub use traits::*;
