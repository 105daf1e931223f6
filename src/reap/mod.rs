//! Sequential deletion executor.
//!
//! The delete phase is deliberately serial: one client per region, one
//! deletion call per identifier, in the deterministic lexicographic order of
//! the request maps. Every failure is terminal for its own scope only — a
//! failed client acquisition marks that region's identifiers failed, a
//! failed deletion marks that identifier failed, and processing continues.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::resource::{ResourceKind, ResourceRef};

/// Operator selection of resources to delete: kind string → region →
/// identifiers.
///
/// Kinds are kept as raw strings at this boundary; unknown kinds are
/// tolerated and surface through the executor's unsupported branch.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeletionRequest {
    groups: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl DeletionRequest {
    /// Builds a request from pre-grouped identifiers.
    #[must_use]
    pub const fn from_groups(groups: BTreeMap<String, BTreeMap<String, Vec<String>>>) -> Self {
        Self { groups }
    }

    /// Iterates over the kind groups in lexicographic order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Vec<String>>)> {
        self.groups
            .iter()
            .map(|(kind, regions)| (kind.as_str(), regions))
    }

    /// Total number of identifiers across all kinds and regions.
    #[must_use]
    pub fn total_identifiers(&self) -> usize {
        self.groups
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` when the request names no identifiers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_identifiers() == 0
    }
}

/// Per-identifier result of a delete run.
///
/// Built incrementally while the executor walks the request; entries keep
/// the request's iteration order. Deletion is not transactional and nothing
/// is ever rolled back.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeletionOutcome {
    /// Resources deleted successfully.
    pub success: Vec<ResourceRef>,
    /// Resources whose deletion failed or was never attempted.
    pub failed: Vec<ResourceRef>,
}

impl DeletionOutcome {
    /// Returns `true` when nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of identifiers accounted for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.success.len() + self.failed.len()
    }
}

/// Raised when a region-scoped deletion client cannot be acquired.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("failed to acquire deletion client for region {region}: {message}")]
pub struct ClientError {
    /// Region the client was requested for.
    pub region: String,
    /// Description of the failure.
    pub message: String,
}

impl ClientError {
    /// Builds a client error for `region`.
    #[must_use]
    pub fn new(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            message: message.into(),
        }
    }
}

/// Raised when a single resource's deletion call fails.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("failed to delete {kind} {identifier}: {message}")]
pub struct DeleteError {
    /// Kind of the resource.
    pub kind: ResourceKind,
    /// Identifier the call targeted.
    pub identifier: String,
    /// Description of the failure.
    pub message: String,
}

impl DeleteError {
    /// Builds a delete error for one identifier.
    #[must_use]
    pub fn new(
        kind: ResourceKind,
        identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

/// Region-scoped deletion capability.
pub trait DeletionClient {
    /// Deletes one resource of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError`] when the provider call fails; the error is
    /// terminal for this identifier only.
    fn delete(&self, kind: ResourceKind, identifier: &str) -> Result<(), DeleteError>;
}

/// Produces region-scoped deletion clients.
pub trait DeletionClientFactory {
    /// Concrete client type handed out per region.
    type Client: DeletionClient;

    /// Acquires a client scoped to `region`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the client cannot be constructed; the
    /// executor then marks every identifier under that region failed without
    /// attempting any deletion.
    fn client_for(&self, region: &str) -> Result<Self::Client, ClientError>;
}

/// Walks a [`DeletionRequest`] and deletes each resource individually.
#[derive(Debug)]
pub struct DeletionExecutor<F> {
    factory: F,
}

impl<F> DeletionExecutor<F>
where
    F: DeletionClientFactory,
{
    /// Creates an executor over the given client factory.
    #[must_use]
    pub const fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Executes the request, returning one entry per identifier.
    ///
    /// Every identifier in the request appears in exactly one of the outcome
    /// lists. No call is retried and no partial success is compensated.
    #[must_use]
    pub fn execute(&self, request: &DeletionRequest) -> DeletionOutcome {
        let mut outcome = DeletionOutcome::default();
        for (kind_name, regions) in request.entries() {
            match ResourceKind::parse(kind_name) {
                Some(kind) => self.reap_kind(kind, kind_name, regions, &mut outcome),
                None => {
                    warn!(kind = kind_name, "unsupported resource kind in request");
                    fail_all(kind_name, regions, &mut outcome);
                }
            }
        }
        info!(
            succeeded = outcome.success.len(),
            failed = outcome.failed.len(),
            "delete run complete"
        );
        outcome
    }

    fn reap_kind(
        &self,
        kind: ResourceKind,
        kind_name: &str,
        regions: &BTreeMap<String, Vec<String>>,
        outcome: &mut DeletionOutcome,
    ) {
        for (region, identifiers) in regions {
            if identifiers.is_empty() {
                continue;
            }
            match self.factory.client_for(region) {
                Ok(client) => {
                    reap_region(&client, kind, kind_name, region, identifiers, outcome);
                }
                Err(err) => {
                    warn!(region = %region, error = %err, "deletion client unavailable");
                    for identifier in identifiers {
                        outcome
                            .failed
                            .push(ResourceRef::new(region, kind_name, identifier));
                    }
                }
            }
        }
    }
}

/// Deletes each identifier in one (kind, region) group, isolating failures.
fn reap_region<C: DeletionClient>(
    client: &C,
    kind: ResourceKind,
    kind_name: &str,
    region: &str,
    identifiers: &[String],
    outcome: &mut DeletionOutcome,
) {
    for identifier in identifiers {
        match client.delete(kind, identifier) {
            Ok(()) => {
                outcome
                    .success
                    .push(ResourceRef::new(region, kind_name, identifier));
            }
            Err(err) => {
                warn!(region = %region, error = %err, "resource deletion failed");
                outcome
                    .failed
                    .push(ResourceRef::new(region, kind_name, identifier));
            }
        }
    }
}

/// Marks every identifier under an unsupported kind as failed.
fn fail_all(
    kind_name: &str,
    regions: &BTreeMap<String, Vec<String>>,
    outcome: &mut DeletionOutcome,
) {
    for (region, identifiers) in regions {
        for identifier in identifiers {
            outcome
                .failed
                .push(ResourceRef::new(region, kind_name, identifier));
        }
    }
}
