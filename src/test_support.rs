//! Stub collaborators shared by unit tests.

use crate::correlate::Diagnostics;
use crate::model::{Dependency, Provenance};
use crate::ossindex::{ComponentReport, OssVulnerability};
use crate::purl::Purl;
use crate::traits::{LookupError, VulnerabilityLookup};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn dependency(purl: &str, file_path: &str) -> Dependency {
    Dependency {
        coordinate: purl.parse().unwrap(),
        file_path: file_path.to_string(),
        provenance: Provenance {
            repo_path: "group/web".to_string(),
            repo_url: "https://gitlab.example.com/group/web".to_string(),
            commit_hash: format!("commit-{}", file_path),
            timestamp: Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap(),
            author_name: "Dev".to_string(),
            author_email: "dev@example.com".to_string(),
        },
    }
}

pub fn oss_vulnerability(id: &str, cvss_score: f64) -> OssVulnerability {
    OssVulnerability {
        id: id.to_string(),
        display_name: id.to_string(),
        title: format!("[{}] test vulnerability", id),
        cvss_score,
        cve: id.to_string(),
        version_ranges: vec!["[0,2.0.0)".to_string()],
        ..Default::default()
    }
}

pub fn report(coordinates: &str, vulnerabilities: Vec<OssVulnerability>) -> ComponentReport {
    ComponentReport {
        coordinates: coordinates.to_string(),
        vulnerabilities,
        ..Default::default()
    }
}

pub fn purl(s: &str) -> Purl {
    s.parse().unwrap()
}

/// Canned lookup that records every request it receives.
pub struct StubLookup {
    reports: Result<Vec<ComponentReport>, u16>,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<Vec<String>>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StubLookup {
    pub fn returning(reports: Vec<ComponentReport>) -> Self {
        Self {
            reports: Ok(reports),
            delay: None,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reports: Err(status),
            ..Self::returning(vec![])
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl VulnerabilityLookup for StubLookup {
    fn service_name(&self) -> &str {
        "stub"
    }

    async fn component_reports(
        &self,
        coordinates: &[String],
    ) -> Result<Vec<ComponentReport>, LookupError> {
        self.requests.lock().unwrap().push(coordinates.to_vec());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.reports {
            Ok(reports) => Ok(reports.clone()),
            Err(status) => Err(LookupError::Status {
                status: *status,
                body: "stubbed failure".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    LookupStarted(usize),
    LookupCompleted(usize),
    LookupFailed(String),
    UnmatchedReport(String),
    VulnerabilitiesFound(String, usize),
}

impl Event {
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::LookupFailed(_) | Event::UnmatchedReport(_))
    }
}

/// Captures diagnostics in memory.
#[derive(Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<Event>>,
}

impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<Event> {
        self.events().into_iter().filter(Event::is_warning).collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn lookup_started(&self, _service: &str, coordinates: usize) {
        self.push(Event::LookupStarted(coordinates));
    }

    fn lookup_completed(&self, _service: &str, reports: usize) {
        self.push(Event::LookupCompleted(reports));
    }

    fn lookup_failed(&self, _service: &str, error: &LookupError) {
        self.push(Event::LookupFailed(error.to_string()));
    }

    fn unmatched_report(&self, coordinates: &str) {
        self.push(Event::UnmatchedReport(coordinates.to_string()));
    }

    fn vulnerabilities_found(&self, file_path: &str, count: usize) {
        self.push(Event::VulnerabilitiesFound(file_path.to_string(), count));
    }
}
