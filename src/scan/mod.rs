//! Concurrent multi-region scanner.
//!
//! The scanner fans one probe out per region over a bounded worker budget
//! and collects exactly one [`ProbeOutcome`] per submitted region. A
//! region's failure is recorded in its own outcome and never cancels or
//! degrades the probes of other regions; the scan only returns once every
//! dispatched probe has reached a terminal state.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{self, JoinHandle};
use tracing::{info, warn};

use crate::probe::{ProbeError, ProbeOutcome, ResourceProber};

/// Default cap on simultaneously in-flight region probes.
///
/// A tunable constant, independent of how many regions the account spans.
pub const DEFAULT_WORKER_LIMIT: usize = 10;

/// Bounded fan-out scanner over a [`ResourceProber`].
#[derive(Debug)]
pub struct Scanner<P> {
    prober: Arc<P>,
    worker_limit: usize,
}

impl<P> Scanner<P>
where
    P: ResourceProber + Send + Sync + 'static,
{
    /// Creates a scanner with the default worker budget.
    #[must_use]
    pub fn new(prober: P) -> Self {
        Self {
            prober: Arc::new(prober),
            worker_limit: DEFAULT_WORKER_LIMIT,
        }
    }

    /// Overrides the worker budget. A limit of zero is clamped to one so the
    /// scan can always make progress.
    #[must_use]
    pub const fn with_worker_limit(mut self, limit: usize) -> Self {
        self.worker_limit = if limit == 0 { 1 } else { limit };
        self
    }

    /// Probes every region, bounded by the worker budget, and returns one
    /// outcome per submitted region.
    ///
    /// Outcomes are collected in submission order, but probes complete in
    /// whatever order the provider answers; callers must not read meaning
    /// into the ordering. Failed probes (including panicking ones) are
    /// captured as failed outcomes and logged, never retried.
    pub async fn scan(&self, regions: &[String]) -> Vec<ProbeOutcome> {
        info!(
            regions = regions.len(),
            worker_limit = self.worker_limit,
            "starting region scan"
        );

        let permits = Arc::new(Semaphore::new(self.worker_limit));
        let mut handles: Vec<(String, JoinHandle<ProbeOutcome>)> =
            Vec::with_capacity(regions.len());
        for region in regions {
            let handle = task::spawn(run_probe(
                Arc::clone(&self.prober),
                Arc::clone(&permits),
                region.clone(),
            ));
            handles.push((region.clone(), handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (region, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    let error =
                        ProbeError::new(region.as_str(), format!("probe task aborted: {join_err}"));
                    ProbeOutcome::failure(region, error)
                }
            };
            if let Some(error) = &outcome.error {
                warn!(region = %outcome.region, error = %error.message, "region probe failed");
            }
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            regions = outcomes.len(),
            failed, "region scan complete"
        );
        outcomes
    }
}

/// Runs one probe on the blocking pool once a worker permit is available.
async fn run_probe<P>(prober: Arc<P>, permits: Arc<Semaphore>, region: String) -> ProbeOutcome
where
    P: ResourceProber + Send + Sync + 'static,
{
    // acquire_owned only fails when the semaphore is closed; the scanner
    // never closes it.
    let _permit = permits.acquire_owned().await.ok();

    let target = region.clone();
    match task::spawn_blocking(move || prober.probe(&target)).await {
        Ok(Ok(findings)) => ProbeOutcome::success(region, findings),
        Ok(Err(error)) => ProbeOutcome::failure(region, error),
        Err(join_err) => {
            let error = ProbeError::new(region.as_str(), format!("probe panicked: {join_err}"));
            ProbeOutcome::failure(region, error)
        }
    }
}

#[cfg(test)]
mod tests;
