//! EC2 provider layer driven through the `aws` CLI.
//!
//! Implements the probing and deletion contracts by shelling out to the
//! `aws` binary and parsing its JSON output. All process execution goes
//! through the [`CommandRunner`] seam so tests can script responses.
//!
//! Unattached addresses are allocations with neither an instance nor a
//! network-interface association; unattached interfaces are those the
//! provider reports as `available` (filtered server-side).

use std::ffi::OsString;

use serde::Deserialize;

use crate::exec::{CommandOutput, CommandRunner, ProcessCommandRunner};
use crate::probe::{DiscoveryError, ProbeError, ProbeFindings, RegionLister, ResourceProber};
use crate::reap::{ClientError, DeleteError, DeletionClient, DeletionClientFactory};
use crate::resource::ResourceKind;

/// Default AWS CLI binary name.
pub const DEFAULT_AWS_BIN: &str = "aws";

/// EC2 operations executed via the `aws` CLI.
#[derive(Clone, Debug)]
pub struct Ec2Cli<R> {
    aws_bin: String,
    profile: Option<String>,
    runner: R,
}

impl Ec2Cli<ProcessCommandRunner> {
    /// Creates a CLI wired to the real process runner.
    #[must_use]
    pub fn with_process_runner(aws_bin: impl Into<String>, profile: Option<String>) -> Self {
        Self::new(aws_bin, profile, ProcessCommandRunner)
    }
}

impl<R: CommandRunner> Ec2Cli<R> {
    /// Creates a CLI using the provided runner.
    #[must_use]
    pub fn new(aws_bin: impl Into<String>, profile: Option<String>, runner: R) -> Self {
        Self {
            aws_bin: aws_bin.into(),
            profile,
            runner,
        }
    }

    /// Builds the argument vector for one `aws ec2` operation.
    fn build_args(
        &self,
        operation: &str,
        region: Option<&str>,
        extra: &[(&str, &str)],
    ) -> Vec<OsString> {
        let mut args = vec![OsString::from("ec2"), OsString::from(operation)];
        if let Some(target) = region {
            args.push(OsString::from("--region"));
            args.push(OsString::from(target));
        }
        if let Some(profile) = &self.profile {
            args.push(OsString::from("--profile"));
            args.push(OsString::from(profile));
        }
        for (flag, value) in extra {
            args.push(OsString::from(*flag));
            args.push(OsString::from(*value));
        }
        args.push(OsString::from("--output"));
        args.push(OsString::from("json"));
        args
    }

    /// Runs the CLI and returns stdout, folding failures into a message.
    fn capture(&self, args: &[OsString]) -> Result<String, String> {
        let output = self
            .runner
            .run(&self.aws_bin, args)
            .map_err(|err| err.to_string())?;
        if output.is_success() {
            Ok(output.stdout)
        } else {
            Err(command_failure_message(&self.aws_bin, &output))
        }
    }

    fn describe_addresses(&self, region: &str) -> Result<Vec<String>, ProbeError> {
        let args = self.build_args("describe-addresses", Some(region), &[]);
        let stdout = self
            .capture(&args)
            .map_err(|message| ProbeError::new(region, message))?;
        let listing: DescribeAddresses = serde_json::from_str(&stdout).map_err(|err| {
            ProbeError::new(region, format!("failed to parse address listing: {err}"))
        })?;
        Ok(listing
            .addresses
            .into_iter()
            .filter(Ec2Address::is_unattached)
            .filter_map(|address| address.allocation_id)
            .collect())
    }

    fn describe_interfaces(&self, region: &str) -> Result<Vec<String>, ProbeError> {
        let args = self.build_args(
            "describe-network-interfaces",
            Some(region),
            &[("--filters", "Name=status,Values=available")],
        );
        let stdout = self
            .capture(&args)
            .map_err(|message| ProbeError::new(region, message))?;
        let listing: DescribeNetworkInterfaces = serde_json::from_str(&stdout).map_err(|err| {
            ProbeError::new(region, format!("failed to parse interface listing: {err}"))
        })?;
        Ok(listing
            .network_interfaces
            .into_iter()
            .map(|interface| interface.network_interface_id)
            .collect())
    }
}

impl<R: CommandRunner> RegionLister for Ec2Cli<R> {
    fn list_regions(&self) -> Result<Vec<String>, DiscoveryError> {
        let args = self.build_args("describe-regions", None, &[]);
        let output = self.runner.run(&self.aws_bin, &args)?;
        if !output.is_success() {
            return Err(DiscoveryError::CommandFailure {
                status: output.code,
                status_text: output.status_text(),
                stderr: output.stderr,
            });
        }
        let listing: DescribeRegions =
            serde_json::from_str(&output.stdout).map_err(|err| DiscoveryError::Parse {
                message: err.to_string(),
            })?;
        Ok(listing
            .regions
            .into_iter()
            .map(|region| region.region_name)
            .collect())
    }
}

impl<R: CommandRunner> ResourceProber for Ec2Cli<R> {
    fn probe(&self, region: &str) -> Result<ProbeFindings, ProbeError> {
        let addresses = self.describe_addresses(region)?;
        let interfaces = self.describe_interfaces(region)?;
        Ok(ProbeFindings {
            addresses,
            interfaces,
        })
    }
}

impl<R: CommandRunner + Clone> DeletionClientFactory for Ec2Cli<R> {
    type Client = Ec2RegionClient<R>;

    fn client_for(&self, region: &str) -> Result<Self::Client, ClientError> {
        if region.trim().is_empty() {
            return Err(ClientError::new(region, "region must not be blank"));
        }
        Ok(Ec2RegionClient {
            cli: self.clone(),
            region: region.to_owned(),
        })
    }
}

/// Deletion client scoped to one region.
#[derive(Clone, Debug)]
pub struct Ec2RegionClient<R> {
    cli: Ec2Cli<R>,
    region: String,
}

impl<R: CommandRunner> DeletionClient for Ec2RegionClient<R> {
    fn delete(&self, kind: ResourceKind, identifier: &str) -> Result<(), DeleteError> {
        let (operation, flag) = match kind {
            ResourceKind::Address => ("release-address", "--allocation-id"),
            ResourceKind::Interface => ("delete-network-interface", "--network-interface-id"),
        };
        let args = self
            .cli
            .build_args(operation, Some(&self.region), &[(flag, identifier)]);
        self.cli
            .capture(&args)
            .map(|_| ())
            .map_err(|message| DeleteError::new(kind, identifier, message))
    }
}

fn command_failure_message(program: &str, output: &CommandOutput) -> String {
    format!(
        "{program} exited with status {}: {}",
        output.status_text(),
        output.stderr.trim()
    )
}

#[derive(Debug, Deserialize)]
struct DescribeRegions {
    #[serde(rename = "Regions", default)]
    regions: Vec<Ec2Region>,
}

#[derive(Debug, Deserialize)]
struct Ec2Region {
    #[serde(rename = "RegionName")]
    region_name: String,
}

#[derive(Debug, Deserialize)]
struct DescribeAddresses {
    #[serde(rename = "Addresses", default)]
    addresses: Vec<Ec2Address>,
}

#[derive(Debug, Deserialize)]
struct Ec2Address {
    #[serde(rename = "AllocationId")]
    allocation_id: Option<String>,
    #[serde(rename = "InstanceId")]
    instance_id: Option<String>,
    #[serde(rename = "NetworkInterfaceId")]
    network_interface_id: Option<String>,
}

impl Ec2Address {
    /// An allocation is reapable when nothing references it.
    const fn is_unattached(&self) -> bool {
        self.instance_id.is_none() && self.network_interface_id.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct DescribeNetworkInterfaces {
    #[serde(rename = "NetworkInterfaces", default)]
    network_interfaces: Vec<Ec2NetworkInterface>,
}

#[derive(Debug, Deserialize)]
struct Ec2NetworkInterface {
    #[serde(rename = "NetworkInterfaceId")]
    network_interface_id: String,
}

#[cfg(test)]
mod tests;
