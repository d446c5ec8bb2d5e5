//! evts demo binary.
//!
//! Reproduces the classic main-thread handoff: a runner thread registers
//! three chained handlers and invokes the event inline and onto the main
//! thread, which drains its queue until the runner asks it to stop.

mod cli;
mod config;
mod scenario;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::DemoConfig;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let config = DemoConfig::resolve(&cli)?;

	tracing_subscriber::fmt().with_env_filter(log_filter(cli.verbose, &config.log_filter)?).init();

	info!(event = %config.event_name, dispatch = ?config.dispatch, rounds = config.rounds, "Starting evts-demo");
	let summary = scenario::run(&config)?;
	info!(
		inline = summary.inline,
		on_main = summary.on_main,
		panicked = summary.report.panicked,
		"evts-demo finished"
	);
	Ok(())
}

/// `--verbose` wins over `RUST_LOG`, which wins over the configured filter.
fn log_filter(verbose: bool, configured: &str) -> anyhow::Result<EnvFilter> {
	if verbose {
		return Ok(EnvFilter::try_new(configured)?);
	}
	Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(configured))?)
}
