//! Diagnostic events raised while correlating a batch.

use crate::traits::LookupError;
use tracing::{debug, warn};

/// Receiver of correlation diagnostics.
///
/// Passed to the searcher at construction so callers decide where the
/// events go. [`TracingDiagnostics`] forwards them to `tracing`.
pub trait Diagnostics: Send + Sync {
    fn lookup_started(&self, service: &str, coordinates: usize);

    fn lookup_completed(&self, service: &str, reports: usize);

    /// Warning: the batched lookup failed and the batch is abandoned.
    fn lookup_failed(&self, service: &str, error: &LookupError);

    /// Warning: a report came back for a coordinate nobody asked about.
    fn unmatched_report(&self, coordinates: &str);

    fn vulnerabilities_found(&self, file_path: &str, count: usize);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn lookup_started(&self, service: &str, coordinates: usize) {
        debug!(service, count = coordinates, status = "start", "requesting component reports");
    }

    fn lookup_completed(&self, service: &str, reports: usize) {
        debug!(service, count = reports, status = "complete", "requesting component reports");
    }

    fn lookup_failed(&self, service: &str, error: &LookupError) {
        warn!(service, error = %error, "requesting component reports failed");
    }

    fn unmatched_report(&self, coordinates: &str) {
        warn!(coordinates, "found a component report but no matching dependency");
    }

    fn vulnerabilities_found(&self, file_path: &str, count: usize) {
        debug!(file = file_path, count, "vulnerabilities found");
    }
}
