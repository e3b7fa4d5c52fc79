//! Vulnerability correlator.
//!
//! [`VulnerabilitySearcher::search`] turns one batch of dependencies into
//! [`VulnerableDependency`] records:
//! 1. **Mapping**: canonical coordinate per dependency plus a coordinate index
//! 2. **Lookup**: one batched call to the [`VulnerabilityLookup`] service
//! 3. **Correlation**: every report with findings is matched back to its
//!    dependency and written to the [`VulnerabilitySink`]

use std::collections::HashMap;
use tracing::instrument;

use super::diagnostics::{Diagnostics, TracingDiagnostics};
use super::sink::VulnerabilitySink;
use crate::model::{Dependency, VulnerableDependency};
use crate::traits::{LookupError, VulnerabilityLookup};

/// Errors returned by [`VulnerabilitySearcher::search`].
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The batched lookup failed; nothing was emitted for the batch
    #[error("Vulnerability lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// The consumer dropped the receiving end of the sink
    #[error("Output sink closed after {emitted} record(s)")]
    SinkClosed { emitted: usize },

    /// The executor was shut down before the batch got a slot
    #[error("Search executor is shut down")]
    Shutdown,
}

/// Correlates dependency batches with vulnerability reports.
///
/// The searcher keeps no state between calls: each [`search`](Self::search)
/// builds its own index, so one searcher can serve concurrent batches.
pub struct VulnerabilitySearcher<L, D = TracingDiagnostics>
where
    L: VulnerabilityLookup,
    D: Diagnostics,
{
    lookup: L,
    sink: VulnerabilitySink,
    diagnostics: D,
}

impl<L> VulnerabilitySearcher<L>
where
    L: VulnerabilityLookup,
{
    /// Creates a searcher that reports diagnostics through `tracing`.
    pub fn new(lookup: L, sink: VulnerabilitySink) -> Self {
        Self {
            lookup,
            sink,
            diagnostics: TracingDiagnostics,
        }
    }
}

impl<L, D> VulnerabilitySearcher<L, D>
where
    L: VulnerabilityLookup,
    D: Diagnostics,
{
    /// Replaces the diagnostics receiver.
    pub fn with_diagnostics<D2: Diagnostics>(self, diagnostics: D2) -> VulnerabilitySearcher<L, D2> {
        VulnerabilitySearcher {
            lookup: self.lookup,
            sink: self.sink,
            diagnostics,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Looks up one batch and emits a record per vulnerable coordinate.
    ///
    /// The lookup is issued even for an empty batch. Records are written in
    /// the order the service returned its reports; each write waits for room
    /// in the sink.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Lookup`] if the service call fails. No record is
    ///   emitted for the batch.
    /// - [`SearchError::SinkClosed`] if the consumer is gone.
    ///
    /// Reports that match no dependency are logged and skipped, they do not
    /// fail the call.
    #[instrument(skip_all, fields(dependencies = dependencies.len()))]
    pub async fn search(&self, dependencies: &[Dependency]) -> Result<(), SearchError> {
        let (coordinates, index) = map_coordinates(dependencies);
        let service = self.lookup.service_name();

        self.diagnostics.lookup_started(service, coordinates.len());
        let reports = match self.lookup.component_reports(&coordinates).await {
            Ok(reports) => reports,
            Err(err) => {
                self.diagnostics.lookup_failed(service, &err);
                return Err(err.into());
            }
        };
        self.diagnostics.lookup_completed(service, reports.len());

        let mut emitted = 0;
        for report in &reports {
            if report.vulnerabilities.is_empty() {
                continue;
            }
            let Some(dependency) = index.get(report.coordinates.as_str()) else {
                self.diagnostics.unmatched_report(&report.coordinates);
                continue;
            };

            let vulnerabilities = report.vulnerabilities();
            self.diagnostics
                .vulnerabilities_found(&dependency.file_path, vulnerabilities.len());

            let record = VulnerableDependency::new(dependency, vulnerabilities);
            self.sink
                .send(record)
                .await
                .map_err(|_| SearchError::SinkClosed { emitted })?;
            emitted += 1;
        }

        Ok(())
    }
}

/// Canonical coordinates in input order, and the coordinate index.
///
/// When several dependencies share a coordinate the last one wins the index
/// slot; the coordinate is still requested once per occurrence.
fn map_coordinates(dependencies: &[Dependency]) -> (Vec<String>, HashMap<String, &Dependency>) {
    let mut coordinates = Vec::with_capacity(dependencies.len());
    let mut index = HashMap::with_capacity(dependencies.len());
    for dependency in dependencies {
        let coordinate = dependency.coordinate.to_string();
        index.insert(coordinate.clone(), dependency);
        coordinates.push(coordinate);
    }
    (coordinates, index)
}
