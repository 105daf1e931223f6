//! Unit tests for report aggregation.

use super::*;
use crate::probe::{ProbeError, ProbeOutcome};
use crate::test_support::findings;
use rstest::rstest;
use serde_json::json;

fn sample_outcomes() -> Vec<ProbeOutcome> {
    vec![
        ProbeOutcome::success(
            String::from("us-east-1"),
            findings(&["eipalloc-1", "eipalloc-2"], &["eni-1"]),
        ),
        ProbeOutcome::success(String::from("eu-west-1"), findings(&[], &["eni-2"])),
        ProbeOutcome::success(String::from("ap-south-1"), findings(&[], &[])),
        ProbeOutcome::failure(
            String::from("sa-east-1"),
            ProbeError::new("sa-east-1", "throttled"),
        ),
    ]
}

#[rstest]
fn aggregate_groups_by_kind_then_region() {
    let report = aggregate(&sample_outcomes());

    assert_eq!(
        serde_json::to_value(&report).expect("report should serialize"),
        json!({
            "address": { "us-east-1": ["eipalloc-1", "eipalloc-2"] },
            "interface": { "eu-west-1": ["eni-2"], "us-east-1": ["eni-1"] }
        })
    );
}

#[rstest]
fn aggregate_skips_errored_and_empty_regions() {
    let report = aggregate(&sample_outcomes());

    let interfaces = report
        .regions_for(ResourceKind::Interface)
        .expect("interfaces should be present");
    assert!(!interfaces.contains_key("sa-east-1"));
    assert!(!interfaces.contains_key("ap-south-1"));
    let addresses = report
        .regions_for(ResourceKind::Address)
        .expect("addresses should be present");
    assert!(!addresses.contains_key("eu-west-1"));
}

#[rstest]
fn aggregate_is_order_independent() {
    let outcomes = sample_outcomes();
    let mut reversed = outcomes.clone();
    reversed.reverse();

    assert_eq!(aggregate(&outcomes), aggregate(&reversed));
}

#[rstest]
fn aggregate_is_idempotent_over_the_same_input() {
    let outcomes = sample_outcomes();
    assert_eq!(aggregate(&outcomes), aggregate(&outcomes));
}

#[rstest]
fn all_failed_probes_yield_the_canonical_empty_report() {
    let outcomes = vec![
        ProbeOutcome::failure(
            String::from("us-east-1"),
            ProbeError::new("us-east-1", "boom"),
        ),
        ProbeOutcome::failure(
            String::from("eu-west-1"),
            ProbeError::new("eu-west-1", "boom"),
        ),
    ];

    let report = aggregate(&outcomes);
    assert!(report.is_empty());
    assert_eq!(report, AggregatedReport::default());
    assert_eq!(
        serde_json::to_value(&report).expect("report should serialize"),
        json!({})
    );
}

#[rstest]
fn no_outcomes_yield_the_canonical_empty_report() {
    assert_eq!(aggregate(&[]), AggregatedReport::default());
}

#[rstest]
fn summary_counts_identifiers_per_kind() {
    let summary = aggregate(&sample_outcomes()).summary();

    assert_eq!(summary.addresses, 2);
    assert_eq!(summary.interfaces, 2);
    assert_eq!(summary.total(), 4);
}

#[rstest]
fn to_request_carries_every_identifier() {
    let report = aggregate(&sample_outcomes());
    let request = report.to_request();

    assert_eq!(request.total_identifiers(), report.summary().total());
    assert_eq!(
        serde_json::to_value(&request).expect("request should serialize"),
        serde_json::to_value(&report).expect("report should serialize")
    );
}
