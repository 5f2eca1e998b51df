//! Error types for parsing and export.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors produced while splitting a document into slides.
///
/// These never reach the orchestrator: a document that fails to parse is
/// treated as having no slides.
#[derive(Debug, Error)]
pub enum ParseError {
	/// A separator setting is not a valid regex.
	#[error("invalid {name} separator {pattern:?}: {source}")]
	InvalidSeparator {
		name: &'static str,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	/// Front matter is not valid TOML.
	#[error("front matter parse error: {0}")]
	FrontMatter(#[from] toml::de::Error),

	/// Front matter opened on the first line but never closed.
	#[error("front matter opened on line 0 is never closed")]
	UnterminatedFrontMatter,
}

/// Errors surfaced through an export future or a save request.
///
/// Cloneable because an export outcome is shared by every caller that joined
/// the session.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
	/// The export settled while no document was bound.
	#[error("no document is bound, nothing to export")]
	NoDocument,

	/// The surface did not settle within the configured export timeout.
	#[error("export did not settle within {timeout_ms}ms")]
	TimedOut { timeout_ms: u64 },

	/// The coordinator was dropped before the export settled.
	#[error("export coordinator dropped before the export settled")]
	Abandoned,

	/// A save request named a path outside the export directory.
	#[error("refusing to write outside the export directory: {0}")]
	InvalidRequestPath(String),

	/// Writing exported content failed.
	#[error("failed to write {path}: {error}")]
	Write { path: PathBuf, error: Arc<std::io::Error> },
}
