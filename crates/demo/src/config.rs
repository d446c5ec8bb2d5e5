//! Demo configuration.
//!
//! ```toml
//! event_name = "name"
//! dispatch = "both"   # immediate | main | both
//! rounds = 1
//! log_filter = "info"
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading the configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// `rounds` must be at least one.
	#[error("rounds must be at least 1")]
	ZeroRounds,
}

/// Which dispatcher the runner uses when invoking the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
	/// Run handlers inline on the runner thread.
	Immediate,
	/// Submit handlers to the main thread's queue.
	Main,
	/// Invoke once inline, then once onto the main thread.
	#[default]
	Both,
}

impl DispatchMode {
	/// Returns `true` if the runner invokes with the immediate dispatcher.
	pub fn inline(self) -> bool {
		matches!(self, Self::Immediate | Self::Both)
	}

	/// Returns `true` if the runner submits handlers to the main thread.
	pub fn deferred(self) -> bool {
		matches!(self, Self::Main | Self::Both)
	}
}

/// Effective demo settings. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
	/// Name given to the event.
	pub event_name: String,
	/// Dispatchers the runner invokes with.
	pub dispatch: DispatchMode,
	/// Invocations per dispatcher.
	pub rounds: usize,
	/// `tracing` filter directives.
	pub log_filter: String,
}

impl Default for DemoConfig {
	fn default() -> Self {
		Self {
			event_name: "name".to_string(),
			dispatch: DispatchMode::default(),
			rounds: 1,
			log_filter: "info".to_string(),
		}
	}
}

impl DemoConfig {
	/// Reads and validates a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&text)
	}

	/// Parses and validates TOML text.
	pub fn parse(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()
	}

	/// Builds the effective config: file (if any), then CLI overrides.
	pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
		let mut config = match &cli.config {
			Some(path) => Self::load(path)?,
			None => Self::default(),
		};
		if let Some(dispatch) = cli.dispatch {
			config.dispatch = dispatch;
		}
		if let Some(rounds) = cli.rounds {
			config.rounds = rounds;
		}
		if cli.verbose {
			config.log_filter = "debug".to_string();
		}
		config.validate()
	}

	fn validate(self) -> Result<Self, ConfigError> {
		if self.rounds == 0 {
			return Err(ConfigError::ZeroRounds);
		}
		Ok(self)
	}
}
