//! Unit tests for the EC2 CLI layer.

use super::*;
use crate::test_support::{ScriptedRunner, json_addresses, json_interfaces, json_regions};
use rstest::rstest;

fn cli(runner: &ScriptedRunner) -> Ec2Cli<ScriptedRunner> {
    Ec2Cli::new(DEFAULT_AWS_BIN, None, runner.clone())
}

fn command_strings(runner: &ScriptedRunner) -> Vec<String> {
    runner
        .invocations()
        .iter()
        .map(|invocation| invocation.command_string())
        .collect()
}

#[rstest]
fn list_regions_parses_the_provider_listing() {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(0), json_regions(&["us-east-1", "eu-west-1"]), "");

    let listed = cli(&runner).list_regions().expect("regions should list");

    assert_eq!(listed, vec!["us-east-1", "eu-west-1"]);
    assert_eq!(
        command_strings(&runner),
        vec!["ec2 describe-regions --output json"]
    );
}

#[rstest]
fn profile_flag_is_threaded_into_every_invocation() {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(0), json_regions(&[]), "");

    Ec2Cli::new("aws", Some(String::from("ops")), runner.clone())
        .list_regions()
        .expect("regions should list");

    assert_eq!(
        command_strings(&runner),
        vec!["ec2 describe-regions --profile ops --output json"]
    );
}

#[rstest]
fn list_regions_surfaces_command_failures() {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(254), "", "AuthFailure");

    let err = cli(&runner).list_regions().expect_err("listing should fail");

    assert_eq!(
        err,
        DiscoveryError::CommandFailure {
            status: Some(254),
            status_text: String::from("254"),
            stderr: String::from("AuthFailure"),
        }
    );
}

#[rstest]
fn list_regions_surfaces_parse_failures() {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(0), "not json", "");

    let err = cli(&runner).list_regions().expect_err("listing should fail");

    assert!(matches!(err, DiscoveryError::Parse { .. }));
}

#[rstest]
fn list_regions_surfaces_spawn_failures() {
    let runner = ScriptedRunner::new();
    runner.push_spawn_failure("aws");

    let err = cli(&runner).list_regions().expect_err("listing should fail");

    assert!(matches!(err, DiscoveryError::Runner(_)));
}

#[rstest]
fn probe_keeps_only_unattached_addresses() {
    let runner = ScriptedRunner::new();
    runner.push_output(
        Some(0),
        json_addresses(&[("eipalloc-1", false), ("eipalloc-2", true)]),
        "",
    );
    runner.push_output(Some(0), json_interfaces(&["eni-1"]), "");

    let found = cli(&runner).probe("us-east-1").expect("probe should succeed");

    assert_eq!(found.addresses, vec!["eipalloc-1"]);
    assert_eq!(found.interfaces, vec!["eni-1"]);
    assert_eq!(
        command_strings(&runner),
        vec![
            "ec2 describe-addresses --region us-east-1 --output json",
            "ec2 describe-network-interfaces --region us-east-1 \
             --filters Name=status,Values=available --output json",
        ]
    );
}

#[rstest]
fn addresses_without_an_allocation_id_are_dropped() {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(0), r#"{"Addresses":[{}]}"#, "");
    runner.push_output(Some(0), json_interfaces(&[]), "");

    let found = cli(&runner).probe("us-east-1").expect("probe should succeed");

    assert!(found.is_empty());
}

#[rstest]
fn probe_failure_names_the_region() {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(1), "", "RequestLimitExceeded");

    let err = cli(&runner)
        .probe("eu-west-1")
        .expect_err("probe should fail");

    assert_eq!(err.region, "eu-west-1");
    assert!(err.message.contains("RequestLimitExceeded"));
}

#[rstest]
fn client_for_rejects_blank_regions() {
    let runner = ScriptedRunner::new();

    let err = cli(&runner)
        .client_for("  ")
        .err()
        .expect("blank region should be rejected");

    assert_eq!(err.region, "  ");
}

#[rstest]
#[case(ResourceKind::Address, "eipalloc-1",
    "ec2 release-address --region us-east-1 --allocation-id eipalloc-1 --output json")]
#[case(ResourceKind::Interface, "eni-1",
    "ec2 delete-network-interface --region us-east-1 --network-interface-id eni-1 --output json")]
fn delete_builds_the_kind_specific_operation(
    #[case] kind: ResourceKind,
    #[case] identifier: &str,
    #[case] expected: &str,
) {
    let runner = ScriptedRunner::new();
    runner.push_success();

    let client = cli(&runner)
        .client_for("us-east-1")
        .expect("client should build");
    client.delete(kind, identifier).expect("delete should succeed");

    assert_eq!(command_strings(&runner), vec![expected]);
}

#[rstest]
fn delete_failure_carries_the_identifier_and_stderr() {
    let runner = ScriptedRunner::new();
    runner.push_output(Some(1), "", "InvalidAllocationID.NotFound");

    let client = cli(&runner)
        .client_for("us-east-1")
        .expect("client should build");
    let err = client
        .delete(ResourceKind::Address, "eipalloc-1")
        .expect_err("delete should fail");

    assert_eq!(err.kind, ResourceKind::Address);
    assert_eq!(err.identifier, "eipalloc-1");
    assert!(err.message.contains("InvalidAllocationID.NotFound"));
}
