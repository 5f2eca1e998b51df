use std::path::PathBuf;

use slidesync_config::Configuration;
use slidesync_primitives::Slide;

use crate::{ExportStatus, SaveHandle};

/// Handles given to the backing server when it starts.
#[derive(Debug, Clone)]
pub struct ServerContext {
	/// Queried while serving; each query while exporting delays export resolution.
	pub export: ExportStatus,
	/// Writes exported content into the current export directory.
	pub save: SaveHandle,
}

/// State the backing server serves, pushed on every server refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentationSnapshot {
	/// Directory of the bound document, used to resolve relative assets.
	pub root_dir: Option<PathBuf>,
	pub slides: Vec<Slide>,
	pub configuration: Configuration,
}

/// The server that renders the presentation.
pub trait BackingServer: Send {
	/// Starts listening. Called only while not listening.
	fn start(&mut self, context: ServerContext);
	fn stop(&mut self);
	fn refresh(&mut self, snapshot: &PresentationSnapshot);
	/// Base address, absent until listening.
	fn uri(&self) -> Option<String>;
	fn is_listening(&self) -> bool;
}
