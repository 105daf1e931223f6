//! Probing contracts: region discovery and per-region resource inspection.

use thiserror::Error;

use crate::resource::ResourceKind;

/// Unattached resources found in one region.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProbeFindings {
    /// Allocation ids of unattached elastic IP addresses.
    pub addresses: Vec<String>,
    /// Ids of network interfaces in the `available` state.
    pub interfaces: Vec<String>,
}

impl ProbeFindings {
    /// Returns the identifiers found for one kind.
    #[must_use]
    pub fn for_kind(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Address => &self.addresses,
            ResourceKind::Interface => &self.interfaces,
        }
    }

    /// Returns `true` when no resource of any kind was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.interfaces.is_empty()
    }

    /// Total number of identifiers across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len() + self.interfaces.len()
    }
}

/// Terminal result of probing one region.
///
/// Exactly one outcome exists per region per scan. The value is never
/// mutated once built; downstream stages only fold over it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProbeOutcome {
    /// Region the probe ran against.
    pub region: String,
    /// Resources found; empty when the probe failed.
    pub findings: ProbeFindings,
    /// Failure recorded for this region, if any.
    pub error: Option<ProbeError>,
}

impl ProbeOutcome {
    /// Builds a successful outcome.
    #[must_use]
    pub const fn success(region: String, findings: ProbeFindings) -> Self {
        Self {
            region,
            findings,
            error: None,
        }
    }

    /// Builds a failed outcome with empty findings.
    #[must_use]
    pub const fn failure(region: String, error: ProbeError) -> Self {
        Self {
            region,
            findings: ProbeFindings {
                addresses: Vec::new(),
                interfaces: Vec::new(),
            },
            error: Some(error),
        }
    }

    /// Returns `true` when the probe completed without error.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Raised when the provider cannot list regions. Fatal to the whole scan.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DiscoveryError {
    /// Raised when the listing command cannot be started.
    #[error(transparent)]
    Runner(#[from] crate::exec::ExecError),
    /// Raised when the listing command exits with a non-zero status.
    #[error("region listing exited with status {status_text}: {stderr}")]
    CommandFailure {
        /// Exit status reported by the OS.
        status: Option<i32>,
        /// Human readable representation of the exit status.
        status_text: String,
        /// Stderr captured from the command.
        stderr: String,
    },
    /// Raised when the listing output cannot be parsed.
    #[error("failed to parse region listing: {message}")]
    Parse {
        /// Parser error message.
        message: String,
    },
}

/// Raised when one region's probe fails. Recorded, never fatal.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("probe failed in region {region}: {message}")]
pub struct ProbeError {
    /// Region whose probe failed.
    pub region: String,
    /// Description of the failure.
    pub message: String,
}

impl ProbeError {
    /// Builds a probe error for `region`.
    #[must_use]
    pub fn new(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            message: message.into(),
        }
    }
}

/// Lists every region the account can reach.
pub trait RegionLister {
    /// Returns the full region set, without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the provider call fails; there is no
    /// partial result.
    fn list_regions(&self) -> Result<Vec<String>, DiscoveryError>;
}

/// Inspects a single region for unattached resources.
///
/// Implementations block on provider I/O; the scanner runs them on the
/// blocking pool.
pub trait ResourceProber {
    /// Probes `region`, returning whatever unattached resources it holds.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the region cannot be inspected. The error
    /// covers this region only.
    fn probe(&self, region: &str) -> Result<ProbeFindings, ProbeError>;
}
