//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or merging configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// Error converting a configuration back to a TOML table for merging.
	#[error("TOML serialize error: {0}")]
	Serialize(#[from] toml::ser::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// No explicit path was given and the platform has no config directory.
	#[error("no configuration directory available on this platform")]
	NoConfigDir,
}

impl ConfigError {
	/// Returns true if the error is a missing configuration file.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Io { error, .. } if error.kind() == std::io::ErrorKind::NotFound)
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
