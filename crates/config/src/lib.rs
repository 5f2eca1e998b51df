//! Configuration for slidesync.
//!
//! Base settings are written in TOML and loaded through a [`SettingsLoader`].
//! Documents may carry a front matter table ([`ConfigOverlay`]) whose keys
//! override the base settings for that document only:
//!
//! ```toml
//! theme = "white"
//! exportHtmlDir = "dist"
//! slideSeparator = "^---$"
//! transition = "fade" # unknown keys are passed through to the presentation
//! ```
//!
//! The effective configuration is never cached. Callers recompute it with
//! [`Configuration::effective`] every time so it always reflects the latest base
//! settings and the latest document.

pub mod error;
pub mod settings;

pub use error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
pub use settings::{SettingsLoader, TomlSettings};
use tracing::warn;

/// Namespace owned by slidesync in the host's settings tree.
pub const CONFIG_NAMESPACE: &str = "slidesync";

/// Per-document overrides taken from front matter.
pub type ConfigOverlay = toml::Table;

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
	/// Line regex separating top-level slides.
	pub slide_separator: String,
	/// Line regex separating vertical slides.
	pub vertical_separator: String,
	/// Line regex starting speaker notes.
	pub notes_separator: String,
	pub theme: String,
	pub highlight_theme: String,
	/// Export directory, relative to the document's directory unless absolute.
	pub export_html_dir: String,
	pub open_browser_on_export: bool,
	/// Upper bound on how long an export may wait for the surface to settle.
	///
	/// Absent means wait indefinitely.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub export_timeout_ms: Option<u64>,
	/// Port requested from the presentation server; `0` lets it choose.
	pub server_port: u16,
	/// Keys slidesync does not interpret, forwarded to the presentation as-is.
	#[serde(flatten)]
	pub extra: toml::Table,
}

impl Default for Configuration {
	fn default() -> Self {
		Self {
			slide_separator: "^---$".into(),
			vertical_separator: "^--$".into(),
			notes_separator: "^note:".into(),
			theme: "black".into(),
			highlight_theme: "monokai".into(),
			export_html_dir: "export".into(),
			open_browser_on_export: false,
			export_timeout_ms: None,
			server_port: 0,
			extra: toml::Table::new(),
		}
	}
}

impl Configuration {
	/// Parse a TOML string into a [`Configuration`].
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Merges `overlay` over `self`; overlay keys win on collision.
	pub fn try_merge(&self, overlay: &ConfigOverlay) -> Result<Self> {
		let mut table = match toml::Value::try_from(self)? {
			toml::Value::Table(table) => table,
			_ => toml::Table::new(),
		};
		for (key, value) in overlay {
			table.insert(key.clone(), value.clone());
		}
		Ok(toml::Value::Table(table).try_into()?)
	}

	/// Effective configuration for a document with the given overrides.
	///
	/// Overlay keys whose values do not fit the schema are dropped one by one;
	/// the remaining keys still apply.
	pub fn effective(&self, overlay: &ConfigOverlay) -> Self {
		if overlay.is_empty() {
			return self.clone();
		}
		if let Ok(merged) = self.try_merge(overlay) {
			return merged;
		}
		let mut merged = self.clone();
		for (key, value) in overlay {
			let single = ConfigOverlay::from_iter([(key.clone(), value.clone())]);
			match merged.try_merge(&single) {
				Ok(next) => merged = next,
				Err(error) => warn!(key = %key, %error, "config.overlay_key_rejected"),
			}
		}
		merged
	}
}

/// Description of a settings change reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationChange {
	/// Dotted section names that changed (e.g. `slidesync.theme`).
	pub sections: Vec<String>,
}

impl ConfigurationChange {
	pub fn new<I, S>(sections: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			sections: sections.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns true if any changed section is `namespace` or nested under it.
	pub fn affects_configuration(&self, namespace: &str) -> bool {
		self.sections.iter().any(|section| {
			section == namespace
				|| section
					.strip_prefix(namespace)
					.is_some_and(|rest| rest.starts_with('.'))
		})
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn overlay(src: &str) -> ConfigOverlay {
		src.parse().unwrap()
	}

	#[test]
	fn defaults_apply_to_missing_keys() {
		let config = Configuration::parse("theme = \"white\"").unwrap();
		assert_eq!(config.theme, "white");
		assert_eq!(config.export_html_dir, "export");
		assert_eq!(config.export_timeout_ms, None);
	}

	#[test]
	fn unknown_keys_are_kept() {
		let config = Configuration::parse("transition = \"fade\"").unwrap();
		assert_eq!(
			config.extra.get("transition").and_then(|v| v.as_str()),
			Some("fade")
		);
	}

	#[test]
	fn overlay_wins_on_collision() {
		let base = Configuration {
			theme: "black".into(),
			highlight_theme: "zenburn".into(),
			..Default::default()
		};
		let merged = base.effective(&overlay("theme = \"league\"\nexportHtmlDir = \"dist\""));
		assert_eq!(merged.theme, "league");
		assert_eq!(merged.export_html_dir, "dist");
		assert_eq!(merged.highlight_theme, "zenburn");
	}

	#[test]
	fn overlay_can_set_timeout() {
		let merged = Configuration::default().effective(&overlay("exportTimeoutMs = 1500"));
		assert_eq!(merged.export_timeout_ms, Some(1500));
	}

	#[test]
	fn overlay_passes_unknown_keys_through() {
		let merged = Configuration::default().effective(&overlay("controls = false"));
		assert_eq!(
			merged.extra.get("controls").and_then(|v| v.as_bool()),
			Some(false)
		);
	}

	#[test]
	fn mistyped_overlay_falls_back_to_base() {
		let base = Configuration::default();
		let merged = base.effective(&overlay("serverPort = \"not a port\""));
		assert_eq!(merged, base);
	}

	#[test]
	fn mistyped_key_keeps_the_rest_of_the_overlay() {
		let base = Configuration {
			server_port: 8123,
			..Configuration::default()
		};
		let merged = base.effective(&overlay(
			"serverPort = \"bad\"\ntheme = \"league\"\nexportTimeoutMs = 5000\ncustomKey = 1",
		));
		assert_eq!(merged.theme, "league");
		assert_eq!(merged.server_port, 8123);
		assert_eq!(merged.export_timeout_ms, Some(5000));
		assert_eq!(merged.extra.get("customKey"), Some(&toml::Value::Integer(1)));
	}

	#[test]
	fn change_scope_matches_namespace() {
		assert!(ConfigurationChange::new(["slidesync"]).affects_configuration(CONFIG_NAMESPACE));
		assert!(
			ConfigurationChange::new(["editor.fontSize", "slidesync.theme"])
				.affects_configuration(CONFIG_NAMESPACE)
		);
		assert!(!ConfigurationChange::new(["slidesyncx.theme"]).affects_configuration(CONFIG_NAMESPACE));
		assert!(!ConfigurationChange::default().affects_configuration(CONFIG_NAMESPACE));
	}
}
