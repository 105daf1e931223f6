//! Unit tests for the concurrent scanner.

use super::*;
use crate::test_support::{GaugeProber, StaticProber, findings};
use rstest::rstest;

struct PanickingProber {
    panic_region: String,
}

impl ResourceProber for PanickingProber {
    fn probe(&self, region: &str) -> Result<crate::probe::ProbeFindings, ProbeError> {
        assert_ne!(region, self.panic_region, "scripted probe panic");
        Ok(crate::probe::ProbeFindings::default())
    }
}

fn regions(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[rstest]
#[tokio::test]
async fn scan_returns_one_outcome_per_region_in_submission_order() {
    let prober = StaticProber::new()
        .with_findings("us-east-1", findings(&["eipalloc-1"], &[]))
        .with_findings("eu-west-1", findings(&[], &["eni-1"]));
    let scanner = Scanner::new(prober);

    let outcomes = scanner
        .scan(&regions(&["us-east-1", "eu-west-1", "ap-south-1"]))
        .await;

    let observed: Vec<&str> = outcomes.iter().map(|o| o.region.as_str()).collect();
    assert_eq!(observed, vec!["us-east-1", "eu-west-1", "ap-south-1"]);
    assert!(outcomes.iter().all(ProbeOutcome::is_success));
    let first = outcomes.first().expect("first outcome");
    assert_eq!(first.findings.addresses, vec!["eipalloc-1"]);
}

#[rstest]
#[tokio::test]
async fn failed_region_never_degrades_the_others() {
    let prober = StaticProber::new()
        .with_findings("us-east-1", findings(&["eipalloc-1"], &[]))
        .with_failure("eu-west-1", "throttled");
    let scanner = Scanner::new(prober);

    let outcomes = scanner.scan(&regions(&["us-east-1", "eu-west-1"])).await;

    assert_eq!(outcomes.len(), 2);
    let failed: Vec<&ProbeOutcome> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failed.len(), 1);
    let failure = failed.first().expect("failed outcome");
    assert_eq!(failure.region, "eu-west-1");
    assert!(failure.findings.is_empty());
    let success = outcomes
        .iter()
        .find(|o| o.region == "us-east-1")
        .expect("successful outcome");
    assert_eq!(success.findings.addresses, vec!["eipalloc-1"]);
}

#[rstest]
#[tokio::test]
async fn panicking_probe_becomes_a_failed_outcome() {
    let scanner = Scanner::new(PanickingProber {
        panic_region: String::from("eu-west-1"),
    });

    let outcomes = scanner.scan(&regions(&["us-east-1", "eu-west-1"])).await;

    assert_eq!(outcomes.len(), 2);
    let failure = outcomes
        .iter()
        .find(|o| o.region == "eu-west-1")
        .expect("failed outcome");
    let error = failure.error.as_ref().expect("probe error");
    assert!(error.message.contains("panicked"));
    assert!(
        outcomes
            .iter()
            .find(|o| o.region == "us-east-1")
            .expect("other outcome")
            .is_success()
    );
}

#[rstest]
#[tokio::test]
async fn zero_regions_yield_an_empty_scan() {
    let scanner = Scanner::new(StaticProber::new());
    assert!(scanner.scan(&[]).await.is_empty());
}

#[rstest]
#[tokio::test]
async fn in_flight_probes_never_exceed_the_worker_limit() {
    let prober = GaugeProber::new();
    let scanner = Scanner::new(prober.clone()).with_worker_limit(2);

    let names = regions(&["r1", "r2", "r3", "r4", "r5", "r6"]);
    let outcomes = scanner.scan(&names).await;

    assert_eq!(outcomes.len(), 6);
    assert!(prober.high_water() >= 1);
    assert!(prober.high_water() <= 2);
}

#[rstest]
#[tokio::test]
async fn zero_worker_limit_is_clamped_to_serial_execution() {
    let prober = GaugeProber::new();
    let scanner = Scanner::new(prober.clone()).with_worker_limit(0);

    scanner.scan(&regions(&["r1", "r2", "r3"])).await;

    assert_eq!(prober.high_water(), 1);
}
