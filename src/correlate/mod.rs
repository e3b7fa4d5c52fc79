//! Correlate module - matches vulnerability reports back to dependency occurrences.
//!
//! - **Searcher**: [`VulnerabilitySearcher`] runs one batched lookup per call
//! - **Sink**: bounded output channel via [`vulnerability_channel`]
//! - **Diagnostics**: injected event receiver via [`Diagnostics`]

pub mod diagnostics;
pub mod searcher;
pub mod sink;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use searcher::{SearchError, VulnerabilitySearcher};
pub use sink::{vulnerability_channel, SinkError, VulnerabilityReceiver, VulnerabilitySink};
