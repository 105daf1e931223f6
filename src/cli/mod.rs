//! Command-line interface definitions for the `netreap` binary.
//!
//! This module centralises the clap parser structures so both the main
//! binary and the build script can reuse them when generating the manual
//! page.

use camino::Utf8PathBuf;
use clap::Parser;

/// Top-level CLI for the `netreap` binary.
#[derive(Debug, Parser)]
#[command(
    name = "netreap",
    about = "Scan every region for unattached network resources and reap them on request",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Scan all regions and report unattached resources.
    #[command(
        name = "detect",
        about = "Scan all regions and report unattached resources"
    )]
    Detect(DetectCommand),
    /// Delete a selected set of resources from a request document.
    #[command(
        name = "delete",
        about = "Delete the resources named in a selection document"
    )]
    Delete(DeleteCommand),
}

/// Arguments for the `netreap detect` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DetectCommand {
    /// Override the cap on simultaneously probed regions for this run.
    #[arg(long, value_name = "N")]
    pub(crate) worker_limit: Option<usize>,
}

/// Arguments for the `netreap delete` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteCommand {
    /// Path to the deletion request JSON (kind -> region -> identifiers).
    /// Reads standard input when omitted.
    #[arg(long, value_name = "PATH")]
    pub(crate) request: Option<Utf8PathBuf>,
}
