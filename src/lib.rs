//! Core library for the netreap cloud-housekeeping tool.
//!
//! The crate scans a cloud account across every region for unattached
//! network resources (elastic IP allocations and network interfaces),
//! aggregates the findings into an operator-facing report, and deletes a
//! selected subset on request. The scan fans out one probe per region over
//! a bounded worker budget and tolerates partial per-region failure; the
//! delete phase runs strictly sequentially, isolating failures per region
//! and per resource.

pub mod config;
pub mod ec2;
pub mod exec;
pub mod notify;
pub mod probe;
pub mod reap;
pub mod report;
pub mod resource;
pub mod run;
pub mod scan;
pub mod test_support;

pub use config::{ConfigError, NetreapConfig};
pub use ec2::{DEFAULT_AWS_BIN, Ec2Cli, Ec2RegionClient};
pub use exec::{CommandOutput, CommandRunner, ExecError, ProcessCommandRunner};
pub use notify::{ConsoleNotifier, Notifier, NotifyError, NotifyFuture, SlackNotifier};
pub use probe::{
    DiscoveryError, ProbeError, ProbeFindings, ProbeOutcome, RegionLister, ResourceProber,
};
pub use reap::{
    ClientError, DeleteError, DeletionClient, DeletionClientFactory, DeletionExecutor,
    DeletionOutcome, DeletionRequest,
};
pub use report::{AggregatedReport, ReportSummary, aggregate};
pub use resource::{ResourceKind, ResourceRef};
pub use run::{DeleteOrchestrator, DetectError, DetectOrchestrator};
pub use scan::{DEFAULT_WORKER_LIMIT, Scanner};
