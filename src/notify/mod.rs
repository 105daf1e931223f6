//! Operator notification over a Slack-style webhook or the console.
//!
//! Delivery is best-effort from the core's standpoint: orchestrators log a
//! warning when a notification fails and carry on. The rendered report
//! carries an interactive delete control whose value is a serialized
//! [`DeletionRequest`], ready to be posted back as the operator's selection.

use std::fmt::Write as _;
use std::future::Future;
use std::io::{self, Write as _};
use std::pin::Pin;

use serde_json::{Value, json};
use thiserror::Error;

use crate::reap::DeletionOutcome;
use crate::report::AggregatedReport;

/// Future returned by notifier operations.
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;

/// Errors raised while delivering a notification.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum NotifyError {
    /// Raised when the webhook request cannot be sent.
    #[error("failed to deliver notification: {message}")]
    Transport {
        /// Client error string.
        message: String,
    },
    /// Raised when the webhook answers with a non-success status.
    #[error("notification rejected with HTTP status {status}")]
    Rejected {
        /// HTTP status code returned by the webhook.
        status: u16,
    },
    /// Raised when console output cannot be written.
    #[error("failed to write notification: {message}")]
    Io {
        /// Operating system error string.
        message: String,
    },
}

/// Delivers reports and outcomes to the operator channel.
pub trait Notifier {
    /// Delivers a scan report.
    fn notify_report<'a>(&'a self, report: &'a AggregatedReport) -> NotifyFuture<'a>;

    /// Delivers a deletion outcome.
    fn notify_outcome<'a>(&'a self, outcome: &'a DeletionOutcome) -> NotifyFuture<'a>;
}

/// Posts Block Kit payloads to a Slack incoming webhook.
#[derive(Clone, Debug)]
pub struct SlackNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Creates a notifier for the given webhook URL.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn post(&self, payload: Value) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotifyError::Transport {
                message: err.to_string(),
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

impl Notifier for SlackNotifier {
    fn notify_report<'a>(&'a self, report: &'a AggregatedReport) -> NotifyFuture<'a> {
        Box::pin(async move {
            let payload = json!({
                "text": report_text(report),
                "blocks": report_blocks(report),
            });
            self.post(payload).await
        })
    }

    fn notify_outcome<'a>(&'a self, outcome: &'a DeletionOutcome) -> NotifyFuture<'a> {
        Box::pin(async move {
            let payload = json!({
                "text": outcome_text(outcome),
                "blocks": outcome_blocks(outcome),
            });
            self.post(payload).await
        })
    }
}

/// Writes report and outcome summaries to standard output.
///
/// Used when no webhook is configured, keeping `detect`/`delete` usable from
/// a terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_report<'a>(&'a self, report: &'a AggregatedReport) -> NotifyFuture<'a> {
        Box::pin(async move { write_console(&report_text(report)) })
    }

    fn notify_outcome<'a>(&'a self, outcome: &'a DeletionOutcome) -> NotifyFuture<'a> {
        Box::pin(async move { write_console(&outcome_text(outcome)) })
    }
}

fn write_console(text: &str) -> Result<(), NotifyError> {
    writeln!(io::stdout(), "{text}").map_err(|err| NotifyError::Io {
        message: err.to_string(),
    })
}

/// Renders the Block Kit payload for a scan report.
#[must_use]
pub fn report_blocks(report: &AggregatedReport) -> Value {
    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": "Unattached resource scan", "emoji": true }
        }),
        json!({ "type": "divider" }),
    ];

    if report.is_empty() {
        blocks.push(section("*No unattached resources found in any region.*"));
        return Value::Array(blocks);
    }

    let summary = report.summary();
    blocks.push(section(&format!(
        "*Unattached resources found.*\nAddresses: {}, Interfaces: {}, Total: {}",
        summary.addresses,
        summary.interfaces,
        summary.total()
    )));

    for (kind, regions) in report.entries() {
        blocks.push(json!({
            "type": "header",
            "text": { "type": "plain_text", "text": format!("Unattached {kind}s"), "emoji": true }
        }));
        for (region, identifiers) in regions {
            blocks.push(section(&format!(
                "*{region}* ({}): {}",
                identifiers.len(),
                identifiers.join(", ")
            )));
        }
    }

    let request_value =
        serde_json::to_string(&report.to_request()).unwrap_or_else(|_| String::from("{}"));
    blocks.push(json!({ "type": "divider" }));
    blocks.push(json!({
        "type": "actions",
        "elements": [{
            "type": "button",
            "text": { "type": "plain_text", "text": "Delete", "emoji": true },
            "style": "danger",
            "value": request_value,
            "action_id": "delete_unattached"
        }]
    }));
    Value::Array(blocks)
}

/// Renders the Block Kit payload for a deletion outcome.
#[must_use]
pub fn outcome_blocks(outcome: &DeletionOutcome) -> Value {
    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": "Deletion result", "emoji": true }
        }),
        json!({ "type": "divider" }),
    ];

    if outcome.total() == 0 {
        blocks.push(section("*Nothing to delete.*"));
        return Value::Array(blocks);
    }

    if !outcome.success.is_empty() {
        let mut text = format!("*Deleted ({})*:\n", outcome.success.len());
        for entry in &outcome.success {
            writeln!(text, "• `{entry}`").ok();
        }
        blocks.push(section(text.trim_end()));
    }
    if !outcome.failed.is_empty() {
        let mut text = format!("*Failed ({})*:\n", outcome.failed.len());
        for entry in &outcome.failed {
            writeln!(text, "• `{entry}`").ok();
        }
        blocks.push(section(text.trim_end()));
    }
    Value::Array(blocks)
}

/// Plain-text rendering of a report, used as webhook fallback text and for
/// console delivery.
#[must_use]
pub fn report_text(report: &AggregatedReport) -> String {
    if report.is_empty() {
        return String::from("No unattached resources found in any region.");
    }
    let summary = report.summary();
    let mut text = format!(
        "Unattached resources found (addresses: {}, interfaces: {}, total: {})",
        summary.addresses,
        summary.interfaces,
        summary.total()
    );
    for (kind, regions) in report.entries() {
        for (region, identifiers) in regions {
            write!(
                text,
                "\n{kind} {region} ({}): {}",
                identifiers.len(),
                identifiers.join(", ")
            )
            .ok();
        }
    }
    text
}

/// Plain-text rendering of a deletion outcome.
#[must_use]
pub fn outcome_text(outcome: &DeletionOutcome) -> String {
    let mut text = format!(
        "Deletion result: {} succeeded, {} failed",
        outcome.success.len(),
        outcome.failed.len()
    );
    for entry in &outcome.success {
        write!(text, "\ndeleted {entry}").ok();
    }
    for entry in &outcome.failed {
        write!(text, "\nfailed {entry}").ok();
    }
    text
}

fn section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text }
    })
}
