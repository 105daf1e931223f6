//! Aggregation of probe outcomes into the operator-facing report.
//!
//! The aggregator is a pure fold: given the same outcome set it produces the
//! same report regardless of scan interleaving, because both levels of the
//! mapping are `BTreeMap`s. Regions whose probe failed contribute nothing;
//! their failures are logged at collection time, not carried in the report.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::probe::ProbeOutcome;
use crate::reap::DeletionRequest;
use crate::resource::ResourceKind;

/// Canonical kind → region → identifiers view of a completed scan.
///
/// Only kinds and regions with at least one hit are present; the empty
/// report is a real value distinguishable via [`AggregatedReport::is_empty`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedReport {
    by_kind: BTreeMap<ResourceKind, BTreeMap<String, Vec<String>>>,
}

impl AggregatedReport {
    /// Returns `true` when the scan found nothing (or every probe failed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    /// Returns the region → identifiers mapping for one kind, if any region
    /// had a hit for it.
    #[must_use]
    pub fn regions_for(&self, kind: ResourceKind) -> Option<&BTreeMap<String, Vec<String>>> {
        self.by_kind.get(&kind)
    }

    /// Iterates over the kinds present in the report, in canonical order.
    pub fn entries(
        &self,
    ) -> impl Iterator<Item = (ResourceKind, &BTreeMap<String, Vec<String>>)> {
        self.by_kind.iter().map(|(kind, regions)| (*kind, regions))
    }

    /// Computes per-kind and overall identifier counts.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let count_for = |kind: ResourceKind| {
            self.by_kind
                .get(&kind)
                .map_or(0, |regions| regions.values().map(Vec::len).sum())
        };
        ReportSummary {
            addresses: count_for(ResourceKind::Address),
            interfaces: count_for(ResourceKind::Interface),
        }
    }

    /// Converts the whole report into a deletion request.
    ///
    /// This is the payload carried by the interactive delete control: the
    /// operator's selection is logically a subset of it.
    #[must_use]
    pub fn to_request(&self) -> DeletionRequest {
        let groups = self
            .by_kind
            .iter()
            .map(|(kind, regions)| (kind.as_str().to_owned(), regions.clone()))
            .collect();
        DeletionRequest::from_groups(groups)
    }
}

/// Identifier counts derived from an [`AggregatedReport`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReportSummary {
    /// Unattached address allocations across all regions.
    pub addresses: usize,
    /// Unattached network interfaces across all regions.
    pub interfaces: usize,
}

impl ReportSummary {
    /// Overall identifier count.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.addresses + self.interfaces
    }
}

/// Folds probe outcomes into the canonical report shape.
///
/// Errored outcomes are skipped entirely; a region with zero hits for a kind
/// does not appear as an empty entry for that kind.
#[must_use]
pub fn aggregate(outcomes: &[ProbeOutcome]) -> AggregatedReport {
    let mut by_kind: BTreeMap<ResourceKind, BTreeMap<String, Vec<String>>> = BTreeMap::new();
    for outcome in outcomes {
        if !outcome.is_success() {
            continue;
        }
        for kind in ResourceKind::ALL {
            let identifiers = outcome.findings.for_kind(kind);
            if identifiers.is_empty() {
                continue;
            }
            by_kind
                .entry(kind)
                .or_default()
                .insert(outcome.region.clone(), identifiers.to_vec());
        }
    }
    AggregatedReport { by_kind }
}

#[cfg(test)]
mod tests;
