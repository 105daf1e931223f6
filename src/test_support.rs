//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ffi::OsString;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::exec::{CommandOutput, CommandRunner, ExecError};
use crate::notify::{Notifier, NotifyError, NotifyFuture};
use crate::probe::{DiscoveryError, ProbeError, ProbeFindings, RegionLister, ResourceProber};
use crate::reap::{
    ClientError, DeleteError, DeletionClient, DeletionClientFactory, DeletionOutcome,
};
use crate::report::AggregatedReport;
use crate::resource::ResourceKind;

/// Builds probe findings from identifier slices.
#[must_use]
pub fn findings(addresses: &[&str], interfaces: &[&str]) -> ProbeFindings {
    ProbeFindings {
        addresses: addresses.iter().map(|id| (*id).to_owned()).collect(),
        interfaces: interfaces.iter().map(|id| (*id).to_owned()).collect(),
    }
}

/// Scripted command runner that returns pre-seeded outputs in FIFO order.
///
/// Used to drive deterministic CLI outcomes without spawning processes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: Rc<RefCell<VecDeque<Result<CommandOutput, ExecError>>>>,
    invocations: Rc<RefCell<Vec<CommandInvocation>>>,
}

/// Records a single invocation made through [`ScriptedRunner`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandInvocation {
    /// Program name as passed to the runner.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl CommandInvocation {
    /// Returns a shell-like command string for assertions.
    #[must_use]
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        parts.extend(
            self.args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Pushes a successful exit with empty output.
    pub fn push_success(&self) {
        self.push_output(Some(0), "", "");
    }

    /// Pushes an explicit command output response.
    pub fn push_output(&self, code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) {
        self.responses.borrow_mut().push_back(Ok(CommandOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }));
    }

    /// Pushes a spawn failure, as if the binary were missing.
    pub fn push_spawn_failure(&self, program: impl Into<String>) {
        self.responses.borrow_mut().push_back(Err(ExecError::Spawn {
            program: program.into(),
            message: String::from("No such file or directory"),
        }));
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, ExecError> {
        self.invocations.borrow_mut().push(CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
        });
        self.responses.borrow_mut().pop_front().map_or_else(
            || {
                Ok(CommandOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: String::from("scripted runner exhausted"),
                })
            },
            |response| response,
        )
    }
}

/// Prober that serves findings (or failures) from a fixed per-region table.
///
/// Regions without an entry probe successfully with empty findings.
#[derive(Clone, Debug, Default)]
pub struct StaticProber {
    regions: BTreeMap<String, Result<ProbeFindings, ProbeError>>,
}

impl StaticProber {
    /// Creates an empty prober.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds successful findings for `region`.
    #[must_use]
    pub fn with_findings(mut self, region: &str, found: ProbeFindings) -> Self {
        self.regions.insert(region.to_owned(), Ok(found));
        self
    }

    /// Seeds a probe failure for `region`.
    #[must_use]
    pub fn with_failure(mut self, region: &str, message: &str) -> Self {
        self.regions
            .insert(region.to_owned(), Err(ProbeError::new(region, message)));
        self
    }
}

impl ResourceProber for StaticProber {
    fn probe(&self, region: &str) -> Result<ProbeFindings, ProbeError> {
        self.regions
            .get(region)
            .cloned()
            .unwrap_or_else(|| Ok(ProbeFindings::default()))
    }
}

/// Prober that records how many probes run simultaneously.
///
/// Each probe holds its slot briefly so overlapping probes are observable;
/// the high-water mark validates the scanner's worker budget.
#[derive(Clone, Debug, Default)]
pub struct GaugeProber {
    in_flight: Arc<AtomicUsize>,
    high_water: Arc<AtomicUsize>,
}

impl GaugeProber {
    /// Creates a gauge with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest number of probes observed in flight at once.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }
}

impl ResourceProber for GaugeProber {
    fn probe(&self, _region: &str) -> Result<ProbeFindings, ProbeError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(current, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(25));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(ProbeFindings::default())
    }
}

/// Deletion-client factory with scripted per-region and per-identifier
/// failures, recording every attempted delete call.
#[derive(Clone, Debug, Default)]
pub struct ScriptedFactory {
    failing_regions: BTreeSet<String>,
    failing_ids: BTreeSet<String>,
    attempts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedFactory {
    /// Creates a factory where every deletion succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes client acquisition fail for `region`.
    #[must_use]
    pub fn failing_region(mut self, region: &str) -> Self {
        self.failing_regions.insert(region.to_owned());
        self
    }

    /// Makes deletion fail for `identifier`.
    #[must_use]
    pub fn failing_id(mut self, identifier: &str) -> Self {
        self.failing_ids.insert(identifier.to_owned());
        self
    }

    /// Returns every delete attempt recorded so far, as
    /// `region:kind:identifier` strings in call order.
    #[must_use]
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.borrow().clone()
    }
}

impl DeletionClientFactory for ScriptedFactory {
    type Client = ScriptedClient;

    fn client_for(&self, region: &str) -> Result<Self::Client, ClientError> {
        if self.failing_regions.contains(region) {
            return Err(ClientError::new(region, "scripted client failure"));
        }
        Ok(ScriptedClient {
            region: region.to_owned(),
            failing_ids: self.failing_ids.clone(),
            attempts: Rc::clone(&self.attempts),
        })
    }
}

/// Client handed out by [`ScriptedFactory`].
#[derive(Clone, Debug)]
pub struct ScriptedClient {
    region: String,
    failing_ids: BTreeSet<String>,
    attempts: Rc<RefCell<Vec<String>>>,
}

impl DeletionClient for ScriptedClient {
    fn delete(&self, kind: ResourceKind, identifier: &str) -> Result<(), DeleteError> {
        self.attempts
            .borrow_mut()
            .push(format!("{}:{kind}:{identifier}", self.region));
        if self.failing_ids.contains(identifier) {
            return Err(DeleteError::new(
                kind,
                identifier,
                "scripted delete failure",
            ));
        }
        Ok(())
    }
}

/// Notifier that records every delivered report and outcome.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    reports: Arc<Mutex<Vec<AggregatedReport>>>,
    outcomes: Arc<Mutex<Vec<DeletionOutcome>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports delivered so far.
    #[must_use]
    pub fn reports(&self) -> Vec<AggregatedReport> {
        self.reports.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Outcomes delivered so far.
    #[must_use]
    pub fn outcomes(&self) -> Vec<DeletionOutcome> {
        self.outcomes.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_report<'a>(&'a self, report: &'a AggregatedReport) -> NotifyFuture<'a> {
        Box::pin(async move {
            if let Ok(mut reports) = self.reports.lock() {
                reports.push(report.clone());
            }
            Ok(())
        })
    }

    fn notify_outcome<'a>(&'a self, outcome: &'a DeletionOutcome) -> NotifyFuture<'a> {
        Box::pin(async move {
            if let Ok(mut outcomes) = self.outcomes.lock() {
                outcomes.push(outcome.clone());
            }
            Ok(())
        })
    }
}

/// Notifier whose delivery always fails, for best-effort paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify_report<'a>(&'a self, _report: &'a AggregatedReport) -> NotifyFuture<'a> {
        Box::pin(async move {
            Err(NotifyError::Transport {
                message: String::from("scripted delivery failure"),
            })
        })
    }

    fn notify_outcome<'a>(&'a self, _outcome: &'a DeletionOutcome) -> NotifyFuture<'a> {
        Box::pin(async move {
            Err(NotifyError::Transport {
                message: String::from("scripted delivery failure"),
            })
        })
    }
}

/// Region lister that serves a fixed list.
#[derive(Clone, Debug, Default)]
pub struct StaticLister {
    regions: Vec<String>,
}

impl StaticLister {
    /// Creates a lister over the given regions.
    #[must_use]
    pub fn new(regions: &[&str]) -> Self {
        Self {
            regions: regions.iter().map(|region| (*region).to_owned()).collect(),
        }
    }
}

impl RegionLister for StaticLister {
    fn list_regions(&self) -> Result<Vec<String>, DiscoveryError> {
        Ok(self.regions.clone())
    }
}

/// JSON canner for `describe-regions` responses.
#[must_use]
pub fn json_regions(names: &[&str]) -> String {
    let regions: Vec<_> = names
        .iter()
        .map(|name| serde_json::json!({ "RegionName": name }))
        .collect();
    serde_json::json!({ "Regions": regions }).to_string()
}

/// JSON canner for `describe-addresses` responses.
///
/// Each entry is `(allocation_id, attached)`; attached allocations carry an
/// instance association and must be filtered out by the prober.
#[must_use]
pub fn json_addresses(entries: &[(&str, bool)]) -> String {
    let addresses: Vec<_> = entries
        .iter()
        .map(|(allocation_id, attached)| {
            if *attached {
                serde_json::json!({
                    "AllocationId": allocation_id,
                    "InstanceId": "i-0123456789abcdef0"
                })
            } else {
                serde_json::json!({ "AllocationId": allocation_id })
            }
        })
        .collect();
    serde_json::json!({ "Addresses": addresses }).to_string()
}

/// JSON canner for `describe-network-interfaces` responses.
#[must_use]
pub fn json_interfaces(ids: &[&str]) -> String {
    let interfaces: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({ "NetworkInterfaceId": id }))
        .collect();
    serde_json::json!({ "NetworkInterfaces": interfaces }).to_string()
}
