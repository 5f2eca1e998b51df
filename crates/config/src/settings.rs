//! Loading base settings from disk.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{CONFIG_NAMESPACE, ConfigError, Configuration, Result};

/// Source of base settings.
///
/// Loading is synchronous and must always produce a configuration; loaders
/// degrade to defaults instead of failing.
pub trait SettingsLoader: Send {
	fn load_configuration(&self) -> Configuration;
}

/// Loads settings from a TOML file.
///
/// Without an explicit path the file is `$XDG_CONFIG_HOME/slidesync/config.toml`.
#[derive(Debug, Clone, Default)]
pub struct TomlSettings {
	path: Option<PathBuf>,
}

impl TomlSettings {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: Some(path.into()),
		}
	}

	/// Loader for the platform default location.
	pub fn from_default_location() -> Self {
		Self::default()
	}

	/// Platform default settings file.
	pub fn default_location() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join(CONFIG_NAMESPACE).join("config.toml"))
	}

	/// Path this loader reads, if one can be determined.
	pub fn path(&self) -> Option<PathBuf> {
		self.path.clone().or_else(Self::default_location)
	}

	/// Loads the settings file, reporting any failure.
	pub fn try_load(&self) -> Result<Configuration> {
		let path = self.path().ok_or(ConfigError::NoConfigDir)?;
		load_file(&path)
	}
}

impl SettingsLoader for TomlSettings {
	fn load_configuration(&self) -> Configuration {
		match self.try_load() {
			Ok(config) => config,
			Err(error) if error.is_not_found() => {
				debug!(path = ?self.path(), "config.missing");
				Configuration::default()
			}
			Err(error) => {
				warn!(%error, "config.load_failed");
				Configuration::default()
			}
		}
	}
}

fn load_file(path: &Path) -> Result<Configuration> {
	let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	Configuration::parse(&content)
}
