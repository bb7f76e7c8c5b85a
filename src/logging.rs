//! `tracing` subscriber setup.
//!
//! The interactive UI owns the terminal, so its events go to a log file in
//! the cache directory. Headless runs log to stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::app_dirs;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "MISP_SEARCH_LOG";
pub const LOG_FILE_NAME: &str = "misp-search.log";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
	Stderr,
	File(PathBuf),
}

impl LogTarget {
	/// `<cache dir>/misp-search.log`.
	pub fn default_file() -> Result<Self> {
		Ok(Self::File(app_dirs::get_cache_dir()?.join(LOG_FILE_NAME)))
	}
}

/// Filter from `MISP_SEARCH_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
	EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Calling it twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn initialize(target: &LogTarget, default_level: &str) -> Result<()> {
	let filter = env_filter(default_level);
	let builder = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false);

	let installed = match target {
		LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
		LogTarget::File(path) => {
			if let Some(parent) = path.parent() {
				fs::create_dir_all(parent)
					.with_context(|| format!("failed to create log directory {}", parent.display()))?;
			}
			let file = OpenOptions::new()
				.create(true)
				.append(true)
				.open(path)
				.with_context(|| format!("failed to open log file {}", path.display()))?;
			builder
				.with_ansi(false)
				.with_writer(Mutex::new(file))
				.try_init()
		}
	};
	if let Err(err) = installed {
		tracing::debug!(error = %err, "tracing subscriber already installed");
	}
	Ok(())
}
