use crate::correlate::{Diagnostics, SearchError, VulnerabilitySearcher};
use crate::model::Dependency;
use crate::traits::VulnerabilityLookup;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument};

/// Runs batches through a shared searcher with a cap on concurrent lookups.
pub struct SearchExecutor<L, D>
where
    L: VulnerabilityLookup,
    D: Diagnostics,
{
    searcher: Arc<VulnerabilitySearcher<L, D>>,
    semaphore: Arc<Semaphore>,
}

impl<L, D> Clone for SearchExecutor<L, D>
where
    L: VulnerabilityLookup,
    D: Diagnostics,
{
    fn clone(&self) -> Self {
        Self {
            searcher: Arc::clone(&self.searcher),
            semaphore: Arc::clone(&self.semaphore),
        }
    }
}

impl<L, D> SearchExecutor<L, D>
where
    L: VulnerabilityLookup,
    D: Diagnostics,
{
    pub fn new(searcher: VulnerabilitySearcher<L, D>, concurrency_limit: usize) -> Self {
        Self {
            searcher: Arc::new(searcher),
            semaphore: Arc::new(Semaphore::new(concurrency_limit.max(1))),
        }
    }

    pub fn searcher(&self) -> &VulnerabilitySearcher<L, D> {
        &self.searcher
    }

    #[instrument(skip(self, batch), fields(dependencies = batch.len()))]
    pub async fn execute(&self, batch: &[Dependency]) -> Result<(), SearchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SearchError::Shutdown)?;

        info!("Starting vulnerability search");
        let result = self.searcher.search(batch).await;
        info!(ok = result.is_ok(), "Finished vulnerability search");
        result
    }

    /// Searches every batch concurrently, at most `concurrency_limit` at a time.
    ///
    /// All batches run to completion; the first failure (in completion
    /// order) is returned.
    pub async fn execute_all(&self, batches: Vec<Vec<Dependency>>) -> Result<(), SearchError>
    where
        L: 'static,
        D: 'static,
    {
        let mut tasks = JoinSet::new();
        for batch in batches {
            let executor = self.clone();
            tasks.spawn(async move { executor.execute(&batch).await });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => Err(SearchError::Shutdown),
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Rejects batches that have not yet acquired a slot.
    pub fn shutdown(&self) {
        self.semaphore.close();
    }
}
