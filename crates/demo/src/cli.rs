use std::path::PathBuf;

use clap::Parser;

use crate::config::DispatchMode;

#[derive(Parser, Debug)]
#[command(name = "evts-demo")]
#[command(about = "Register handlers on a runner thread and dispatch them inline or onto the main thread")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// TOML configuration file
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Where handler bodies run
	#[arg(short, long, value_enum)]
	pub dispatch: Option<DispatchMode>,

	/// How many times the runner invokes the event per dispatcher
	#[arg(short, long)]
	pub rounds: Option<usize>,

	/// Verbose logging (takes precedence over `RUST_LOG`)
	#[arg(short, long)]
	pub verbose: bool,
}
