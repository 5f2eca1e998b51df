//! Command-line stand-ins for the editor host's collaborators.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;
use slidesync_preview::{
	AuxiliaryView, BackingServer, MARKDOWN_LANGUAGE_ID, PresentationSnapshot, PreviewLauncher, RenderSurface,
	ServerContext, TextEditor, ViewState,
};
use slidesync_primitives::EditorId;
use tracing::{debug, info, warn};

/// Editor id of the single file the driver binds.
pub const FILE_EDITOR: EditorId = EditorId(1);

/// Port assumed when the settings leave `serverPort` to the server.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Presentation address for the configured `serverPort`.
pub fn server_base_for(port: u16) -> String {
	let port = if port == 0 { DEFAULT_SERVER_PORT } else { port };
	format!("http://localhost:{port}/")
}

/// Hands `target` to the platform's default opener and waits for it to exit.
pub fn open_in_browser(target: &Path) -> io::Result<()> {
	let status = opener(target).stdout(Stdio::null()).stderr(Stdio::null()).status()?;
	if status.success() {
		Ok(())
	} else {
		Err(io::Error::other(format!("opener exited with {status}")))
	}
}

fn opener(target: &Path) -> Command {
	let mut command = if cfg!(target_os = "windows") {
		let mut command = Command::new("cmd");
		command.args(["/C", "start", ""]);
		command
	} else if cfg!(target_os = "macos") {
		Command::new("open")
	} else {
		Command::new("xdg-open")
	};
	command.arg(target);
	command
}

/// A file loaded once from disk.
#[derive(Debug)]
pub struct FileEditor {
	path: PathBuf,
	language: &'static str,
	text: String,
}

impl FileEditor {
	pub fn open(path: &Path) -> anyhow::Result<Self> {
		let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
		let path = std::path::absolute(path).with_context(|| format!("resolving {}", path.display()))?;
		Ok(Self {
			language: language_for(&path),
			path,
			text,
		})
	}
}

fn language_for(path: &Path) -> &'static str {
	match path.extension().and_then(|e| e.to_str()) {
		Some("md" | "markdown") => MARKDOWN_LANGUAGE_ID,
		_ => "plaintext",
	}
}

impl TextEditor for FileEditor {
	fn id(&self) -> EditorId {
		FILE_EDITOR
	}

	fn language_id(&self) -> &str {
		self.language
	}

	fn path(&self) -> &Path {
		&self.path
	}

	fn text(&self) -> String {
		self.text.clone()
	}
}

/// A presentation server running outside this process.
///
/// The driver only tracks its address; it never serves content itself.
#[derive(Debug)]
pub struct ExternalServer {
	base: String,
	context: Option<ServerContext>,
}

impl ExternalServer {
	pub fn new(base: String) -> Self {
		Self { base, context: None }
	}
}

impl BackingServer for ExternalServer {
	fn start(&mut self, context: ServerContext) {
		info!(base = %self.base, "server.attach");
		self.context = Some(context);
	}

	fn stop(&mut self) {
		self.context = None;
	}

	fn refresh(&mut self, snapshot: &PresentationSnapshot) {
		debug!(
			root = ?snapshot.root_dir,
			slides = snapshot.slides.len(),
			theme = %snapshot.configuration.theme,
			"server.refresh"
		);
	}

	fn uri(&self) -> Option<String> {
		self.context.as_ref().map(|_| self.base.clone())
	}

	fn is_listening(&self) -> bool {
		self.context.is_some()
	}
}

/// Surface that writes its markup to a file.
#[derive(Debug)]
pub struct FileSurface {
	path: PathBuf,
}

impl FileSurface {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}
}

impl RenderSurface for FileSurface {
	fn set_html(&mut self, html: &str) {
		if let Err(error) = std::fs::write(&self.path, html) {
			warn!(path = %self.path.display(), %error, "surface.write_failed");
		}
	}
}

/// Status indicator rendered as log lines.
#[derive(Debug, Default)]
pub struct StatusLine;

impl AuxiliaryView for StatusLine {
	fn update(&mut self, state: &ViewState) {
		match (state.position, &state.server_uri) {
			(Some(position), Some(uri)) => info!(%position, %uri, slides = state.slide_count, "status"),
			(_, _) => debug!(listening = state.is_listening, "status.idle"),
		}
	}
}

/// Slide list rendered as log lines.
#[derive(Debug, Default)]
pub struct SlideOutline;

impl AuxiliaryView for SlideOutline {
	fn update(&mut self, state: &ViewState) {
		for (index, title) in state.slide_titles.iter().enumerate() {
			debug!(index, title = %title, "outline");
		}
	}
}

/// The driver has no way to open a preview on its own.
#[derive(Debug, Default)]
pub struct NoLauncher;

impl PreviewLauncher for NoLauncher {
	fn open_preview(&self) {
		warn!("preview.no_surface");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn server_base_follows_configured_port() {
		assert_eq!(server_base_for(0), "http://localhost:8000/");
		assert_eq!(server_base_for(9123), "http://localhost:9123/");
	}

	#[test]
	fn opener_receives_the_target() {
		let command = opener(Path::new("/tmp/export/index.html"));
		let args: Vec<_> = command.get_args().collect();
		assert_eq!(args.last().copied(), Some(std::ffi::OsStr::new("/tmp/export/index.html")));
		if cfg!(target_os = "linux") {
			assert_eq!(command.get_program(), "xdg-open");
		}
	}

	#[test]
	fn language_from_extension() {
		assert_eq!(language_for(Path::new("a/deck.md")), MARKDOWN_LANGUAGE_ID);
		assert_eq!(language_for(Path::new("deck.markdown")), MARKDOWN_LANGUAGE_ID);
		assert_eq!(language_for(Path::new("notes.txt")), "plaintext");
	}

	#[test]
	fn file_editor_reads_content() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("deck.md");
		std::fs::write(&path, "# A\n---\n# B").unwrap();

		let editor = FileEditor::open(&path).unwrap();
		assert!(editor.is_markdown());
		assert_eq!(editor.text(), "# A\n---\n# B");
		assert!(FileEditor::open(&dir.path().join("missing.md")).is_err());
	}

	#[test]
	fn file_surface_writes_markup() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("preview.html");
		let mut surface = FileSurface::new(path.clone());
		surface.set_html("<p>hi</p>");
		assert_eq!(std::fs::read_to_string(path).unwrap(), "<p>hi</p>");
	}
}
