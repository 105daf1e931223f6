//! Binary entry point for the netreap CLI.

use std::io::{self, Read as _, Write};
use std::process;

use camino::Utf8Path;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use netreap::{
    AggregatedReport, ConsoleNotifier, DeleteOrchestrator, DeletionExecutor, DeletionOutcome,
    DeletionRequest, DetectError, DetectOrchestrator, Ec2Cli, NetreapConfig, Notifier, Scanner,
    SlackNotifier,
};

mod cli;

use cli::{Cli, DeleteCommand, DetectCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid deletion request: {0}")]
    Request(String),
    #[error(transparent)]
    Detect(#[from] DetectError),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

async fn dispatch(cli: Cli) -> Result<i32, CliError> {
    match cli {
        Cli::Detect(command) => run_detect(command).await,
        Cli::Delete(command) => run_delete(command).await,
    }
}

async fn run_detect(args: DetectCommand) -> Result<i32, CliError> {
    let config = load_config()?;
    let worker_limit = args
        .worker_limit
        .unwrap_or_else(|| config.effective_worker_limit());

    let report = match config.webhook_url.clone() {
        Some(url) => detect_with(&config, worker_limit, SlackNotifier::new(url)).await?,
        None => detect_with(&config, worker_limit, ConsoleNotifier).await?,
    };

    let summary = report.summary();
    writeln!(
        io::stdout(),
        "scan complete: addresses={}, interfaces={}, total={}",
        summary.addresses,
        summary.interfaces,
        summary.total()
    )
    .ok();
    Ok(0)
}

async fn detect_with<N: Notifier>(
    config: &NetreapConfig,
    worker_limit: usize,
    notifier: N,
) -> Result<AggregatedReport, CliError> {
    let provider = Ec2Cli::with_process_runner(config.aws_bin.clone(), config.profile.clone());
    let scanner = Scanner::new(provider.clone()).with_worker_limit(worker_limit);
    let orchestrator = DetectOrchestrator::new(provider, scanner, notifier);
    Ok(orchestrator.execute().await?)
}

async fn run_delete(args: DeleteCommand) -> Result<i32, CliError> {
    let config = load_config()?;
    let text = read_request(args.request.as_deref())?;
    let request = parse_request(&text)?;

    let outcome = match config.webhook_url.clone() {
        Some(url) => delete_with(&config, &request, SlackNotifier::new(url)).await,
        None => delete_with(&config, &request, ConsoleNotifier).await,
    };

    writeln!(
        io::stdout(),
        "delete complete: succeeded={}, failed={}",
        outcome.success.len(),
        outcome.failed.len()
    )
    .ok();
    Ok(0)
}

async fn delete_with<N: Notifier>(
    config: &NetreapConfig,
    request: &DeletionRequest,
    notifier: N,
) -> DeletionOutcome {
    let provider = Ec2Cli::with_process_runner(config.aws_bin.clone(), config.profile.clone());
    let orchestrator = DeleteOrchestrator::new(DeletionExecutor::new(provider), notifier);
    orchestrator.execute(request).await
}

fn load_config() -> Result<NetreapConfig, CliError> {
    let config =
        NetreapConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    config
        .validate()
        .map_err(|err| CliError::Config(err.to_string()))?;
    Ok(config)
}

fn read_request(path: Option<&Utf8Path>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| CliError::Request(format!("cannot read {path}: {err}"))),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| CliError::Request(format!("cannot read stdin: {err}")))?;
            Ok(text)
        }
    }
}

fn parse_request(text: &str) -> Result<DeletionRequest, CliError> {
    serde_json::from_str(text).map_err(|err| CliError::Request(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
