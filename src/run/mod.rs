//! Detect and delete orchestration flows.
//!
//! Each flow wires the core stages together and treats notification as
//! fire-and-forget: a delivery failure is logged and never aborts the
//! computation, so the caller always receives the computed report or
//! outcome.

use thiserror::Error;
use tracing::warn;

use crate::notify::Notifier;
use crate::probe::{DiscoveryError, RegionLister, ResourceProber};
use crate::reap::{DeletionClientFactory, DeletionExecutor, DeletionOutcome, DeletionRequest};
use crate::report::{AggregatedReport, aggregate};
use crate::scan::Scanner;

/// Errors that abort a detect run.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DetectError {
    /// Raised when region discovery fails; without regions there is nothing
    /// to scan.
    #[error("region discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
}

/// Runs the scan flow: enumerate regions, probe them concurrently,
/// aggregate, notify.
#[derive(Debug)]
pub struct DetectOrchestrator<L, P, N> {
    lister: L,
    scanner: Scanner<P>,
    notifier: N,
}

impl<L, P, N> DetectOrchestrator<L, P, N>
where
    L: RegionLister,
    P: ResourceProber + Send + Sync + 'static,
    N: Notifier,
{
    /// Creates a detect orchestrator from its collaborators.
    #[must_use]
    pub const fn new(lister: L, scanner: Scanner<P>, notifier: N) -> Self {
        Self {
            lister,
            scanner,
            notifier,
        }
    }

    /// Executes the detect flow and returns the aggregated report.
    ///
    /// Per-region probe failures are captured inside the scan and leave the
    /// report untouched; only region discovery is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Discovery`] when the region listing fails.
    pub async fn execute(&self) -> Result<AggregatedReport, DetectError> {
        let regions = self.lister.list_regions()?;
        let outcomes = self.scanner.scan(&regions).await;
        let report = aggregate(&outcomes);
        if let Err(err) = self.notifier.notify_report(&report).await {
            warn!(error = %err, "report notification failed");
        }
        Ok(report)
    }
}

/// Runs the delete flow: execute the request, notify the outcome.
#[derive(Debug)]
pub struct DeleteOrchestrator<F, N> {
    executor: DeletionExecutor<F>,
    notifier: N,
}

impl<F, N> DeleteOrchestrator<F, N>
where
    F: DeletionClientFactory,
    N: Notifier,
{
    /// Creates a delete orchestrator from its collaborators.
    #[must_use]
    pub const fn new(executor: DeletionExecutor<F>, notifier: N) -> Self {
        Self { executor, notifier }
    }

    /// Executes the deletion request and returns the outcome.
    ///
    /// Deletion failures are data, not errors: every identifier in the
    /// request lands in exactly one of the outcome lists.
    pub async fn execute(&self, request: &DeletionRequest) -> DeletionOutcome {
        let outcome = self.executor.execute(request);
        if let Err(err) = self.notifier.notify_outcome(&outcome).await {
            warn!(error = %err, "outcome notification failed");
        }
        outcome
    }
}
