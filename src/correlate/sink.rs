//! Bounded output channel for correlated records.
//!
//! The consumer creates the channel and decides its capacity. Writes wait
//! while the channel is full, so a slow consumer slows the search down
//! instead of growing an unbounded queue.

use crate::model::VulnerableDependency;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Sink capacity must be at least 1")]
    ZeroCapacity,
    #[error("Sink receiver has been dropped")]
    Closed,
}

/// Write half handed to a [`VulnerabilitySearcher`](super::VulnerabilitySearcher).
#[derive(Debug, Clone)]
pub struct VulnerabilitySink {
    tx: mpsc::Sender<VulnerableDependency>,
}

/// Read half kept by the consumer.
pub type VulnerabilityReceiver = mpsc::Receiver<VulnerableDependency>;

/// Creates a bounded sink holding at most `capacity` undelivered records.
pub fn vulnerability_channel(
    capacity: usize,
) -> Result<(VulnerabilitySink, VulnerabilityReceiver), SinkError> {
    if capacity == 0 {
        return Err(SinkError::ZeroCapacity);
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((VulnerabilitySink { tx }, rx))
}

impl VulnerabilitySink {
    /// Sends one record, waiting for room if the channel is full.
    pub async fn send(&self, record: VulnerableDependency) -> Result<(), SinkError> {
        self.tx.send(record).await.map_err(|_| SinkError::Closed)
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, Provenance};
    use crate::purl::Purl;

    fn record() -> VulnerableDependency {
        let dep = Dependency {
            coordinate: Purl::new("npm", "left-pad", "1.0.0").unwrap(),
            file_path: "package.json".to_string(),
            provenance: Provenance::default(),
        };
        VulnerableDependency::new(&dep, vec![])
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(vulnerability_channel(0).unwrap_err(), SinkError::ZeroCapacity);
    }

    #[tokio::test]
    async fn test_capacity_accounting() {
        let (sink, mut rx) = vulnerability_channel(2).unwrap();
        assert_eq!(sink.capacity(), 2);
        sink.send(record()).await.unwrap();
        assert_eq!(sink.available(), 1);
        rx.recv().await.unwrap();
        assert_eq!(sink.available(), 2);
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (sink, rx) = vulnerability_channel(1).unwrap();
        drop(rx);
        assert_eq!(sink.send(record()).await.unwrap_err(), SinkError::Closed);
    }
}
