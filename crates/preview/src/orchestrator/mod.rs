//! The orchestrator: owner of live preview state.
//!
//! # Event contracts
//!
//! | Event | Effect, in order |
//! |-------|------------------|
//! | selection changed | position from cursor, surface, binding refresh, status view, slide list |
//! | active editor changed | rebind (markdown) or unbind, start server, server refresh, surface, status view, slide list |
//! | configuration changed | reload base settings when the slidesync namespace changed |
//! | document changed/saved/closed | nothing |
//!
//! The surface is pushed the position computed from the slide table as of the
//! last refresh, before the binding re-parses, because a re-parse may move slide
//! boundaries under the cursor.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use slidesync_config::{CONFIG_NAMESPACE, Configuration, ConfigurationChange, SettingsLoader};
use slidesync_primitives::{EditorId, Position, Selection, Slide};
use tracing::{debug, info, trace, warn};

use crate::{
	AuxiliaryView, BackingServer, DocumentBinding, DocumentSlot, ExportCoordinator, ExportFuture, ExportStatus,
	ExportWriter, PresentationSnapshot, PreviewLauncher, RenderSurface, RenderSurfaceProxy, SaveHandle,
	ServerContext, SlideParser, TextEditor, ViewState, format_uri,
};

/// Events reported by the editor host.
#[derive(Debug)]
pub enum HostEvent {
	SelectionChanged {
		editor: EditorId,
		selections: Vec<Selection>,
	},
	/// The focused text editor changed; `None` when no text editor has focus.
	ActiveEditorChanged(Option<Arc<dyn TextEditor>>),
	ConfigurationChanged(ConfigurationChange),
	DocumentChanged(PathBuf),
	DocumentSaved(PathBuf),
	DocumentClosed(PathBuf),
}

/// External collaborators injected into an [`Orchestrator`].
pub struct Collaborators {
	pub server: Box<dyn BackingServer>,
	pub parser: Arc<dyn SlideParser>,
	pub settings: Box<dyn SettingsLoader>,
	pub writer: Arc<dyn ExportWriter>,
	pub status_view: Box<dyn AuxiliaryView>,
	pub slide_list: Box<dyn AuxiliaryView>,
	pub launcher: Box<dyn PreviewLauncher>,
}

/// Owns the document binding, render surface and export sessions.
///
/// Handlers run to completion and are not re-entrant; the host delivers events
/// one at a time.
pub struct Orchestrator {
	server: Box<dyn BackingServer>,
	parser: Arc<dyn SlideParser>,
	settings: Box<dyn SettingsLoader>,
	writer: Arc<dyn ExportWriter>,
	status_view: Box<dyn AuxiliaryView>,
	slide_list: Box<dyn AuxiliaryView>,
	launcher: Box<dyn PreviewLauncher>,
	configuration: Configuration,
	document: DocumentSlot,
	surface: RenderSurfaceProxy,
	export: ExportCoordinator,
}

impl std::fmt::Debug for Orchestrator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Orchestrator")
			.field("configuration", &self.configuration)
			.field("document", &self.document)
			.field("surface", &self.surface)
			.field("export", &self.export)
			.finish_non_exhaustive()
	}
}

impl Orchestrator {
	/// Creates an orchestrator and loads base settings.
	pub fn new(collaborators: Collaborators) -> Self {
		let Collaborators {
			server,
			parser,
			settings,
			writer,
			status_view,
			slide_list,
			launcher,
		} = collaborators;
		let configuration = settings.load_configuration();
		Self {
			server,
			parser,
			settings,
			writer,
			status_view,
			slide_list,
			launcher,
			configuration,
			document: DocumentSlot::Unbound,
			surface: RenderSurfaceProxy::default(),
			export: ExportCoordinator::default(),
		}
	}

	/// Dispatches a host event to its handler.
	pub fn handle(&mut self, event: HostEvent) {
		match event {
			HostEvent::SelectionChanged { editor, selections } => self.on_selection_changed(editor, &selections),
			HostEvent::ActiveEditorChanged(editor) => self.on_active_editor_changed(editor),
			HostEvent::ConfigurationChanged(change) => self.on_configuration_changed(&change),
			HostEvent::DocumentChanged(path) => self.on_document_changed(&path),
			HostEvent::DocumentSaved(path) => self.on_document_saved(&path),
			HostEvent::DocumentClosed(path) => self.on_document_closed(&path),
		}
	}

	pub fn on_selection_changed(&mut self, editor: EditorId, selections: &[Selection]) {
		let Some(binding) = self.document.as_bound_mut() else {
			return;
		};
		if binding.editor_id() != editor {
			return;
		}
		let Some(selection) = selections.first() else {
			return;
		};

		binding.update_position(selection.anchor);
		debug!(position = %binding.position(), line = selection.anchor.line, "preview.selection");

		self.refresh_web_view(None);
		if let Some(binding) = self.document.as_bound_mut() {
			binding.refresh(&self.configuration);
		}
		self.sync_export_target();
		self.update_status_view();
		self.update_slide_list();
	}

	pub fn on_active_editor_changed(&mut self, editor: Option<Arc<dyn TextEditor>>) {
		self.document = match editor {
			Some(editor) if editor.is_markdown() => {
				info!(path = %editor.path().display(), "preview.bind");
				DocumentSlot::Bound(DocumentBinding::new(editor, &self.configuration, self.parser.clone()))
			}
			_ => {
				if self.document.is_bound() {
					info!("preview.unbind");
				}
				DocumentSlot::Unbound
			}
		};
		self.sync_export_target();

		self.ensure_server_started();
		let snapshot = self.presentation_snapshot();
		self.server.refresh(&snapshot);
		self.refresh_web_view(None);
		self.update_status_view();
		self.update_slide_list();
	}

	pub fn on_configuration_changed(&mut self, change: &ConfigurationChange) {
		if !change.affects_configuration(CONFIG_NAMESPACE) {
			return;
		}
		self.configuration = self.settings.load_configuration();
		self.sync_export_target();
		info!("preview.config_reloaded");
	}

	pub fn on_document_changed(&mut self, path: &Path) {
		trace!(path = %path.display(), "preview.document_changed");
	}

	pub fn on_document_saved(&mut self, path: &Path) {
		trace!(path = %path.display(), "preview.document_saved");
	}

	pub fn on_document_closed(&mut self, path: &Path) {
		trace!(path = %path.display(), "preview.document_closed");
	}

	/// Jumps to a slide. Indices are not validated.
	pub fn go_to_slide(&mut self, horizontal: usize, vertical: usize) {
		let Some(binding) = self.document.as_bound_mut() else {
			return;
		};
		if !binding.contains(Position::new(horizontal, vertical)) {
			warn!(horizontal, vertical, slides = binding.slide_count(), "preview.goto_out_of_range");
		}
		binding.go_to_slide(horizontal, vertical);
		self.refresh_web_view(None);
	}

	pub fn stop_server(&mut self) {
		self.server.stop();
		info!("preview.server_stopped");
		self.update_status_view();
	}

	/// Re-renders the surface, attaching `surface` first when given.
	pub fn refresh_web_view(&mut self, surface: Option<Box<dyn RenderSurface>>) {
		let uri = self.get_uri(true);
		self.surface.refresh(surface, uri.as_deref());
	}

	/// Drops the attached surface after the host disposed it.
	pub fn detach_web_view(&mut self) {
		if self.surface.detach().is_some() {
			debug!("surface.detach");
		}
	}

	/// Presentation address, absent without a listening server or bound document.
	pub fn get_uri(&self, with_position: bool) -> Option<String> {
		if !self.server.is_listening() {
			return None;
		}
		let binding = self.document.as_bound()?;
		let base = self.server.uri()?;
		let position = with_position.then(|| binding.position());
		Some(format_uri(&base, position, chrono::Utc::now().timestamp_millis()))
	}

	/// Starts an export, or joins the pending one.
	///
	/// The surface is refreshed (or a preview opened when none is attached) so
	/// the quiet period has rendering activity to measure. Must be called from
	/// within a tokio runtime.
	pub fn start_export(&mut self) -> ExportFuture {
		self.sync_export_target();
		let timeout = self
			.effective_configuration()
			.export_timeout_ms
			.map(Duration::from_millis);
		let (future, opened) = self.export.start(timeout);
		if opened {
			debug!(dir = ?self.export.target().get(), "preview.export");
		}

		if self.surface.is_bound() {
			self.refresh_web_view(None);
		} else {
			self.launcher.open_preview();
		}
		future
	}

	/// Whether an export is pending. Restarts the export's quiet period.
	pub fn is_in_export(&self) -> bool {
		self.export.is_in_export()
	}

	pub fn export_status(&self) -> ExportStatus {
		self.export.status()
	}

	pub fn document(&self) -> &DocumentSlot {
		&self.document
	}

	/// Slides of the bound document, empty when unbound.
	pub fn slides(&self) -> &[Slide] {
		self.document.as_bound().map(DocumentBinding::slides).unwrap_or_default()
	}

	pub fn position(&self) -> Option<Position> {
		self.document.as_bound().map(DocumentBinding::position)
	}

	pub fn configuration(&self) -> &Configuration {
		&self.configuration
	}

	/// Base configuration with the bound document's overrides, computed on every call.
	pub fn effective_configuration(&self) -> Configuration {
		match self.document.as_bound() {
			Some(binding) => binding.effective_configuration(&self.configuration),
			None => self.configuration.clone(),
		}
	}

	/// Directory exports write into, absent when unbound.
	pub fn export_path(&self) -> Option<PathBuf> {
		let binding = self.document.as_bound()?;
		let dir = binding.effective_configuration(&self.configuration).export_html_dir;
		Some(binding.dirname().join(dir))
	}

	pub fn view_state(&self) -> ViewState {
		let slides = self.slides();
		ViewState {
			position: self.position(),
			slide_count: slides.len(),
			slide_titles: slides
				.iter()
				.map(|slide| slide.title().unwrap_or_default().to_string())
				.collect(),
			server_uri: self.server.uri(),
			is_listening: self.server.is_listening(),
		}
	}

	pub fn presentation_snapshot(&self) -> PresentationSnapshot {
		PresentationSnapshot {
			root_dir: self.document.as_bound().map(|b| b.dirname().to_path_buf()),
			slides: self.slides().to_vec(),
			configuration: self.effective_configuration(),
		}
	}

	fn ensure_server_started(&mut self) {
		if self.server.is_listening() {
			return;
		}
		let context = ServerContext {
			export: self.export.status(),
			save: SaveHandle::new(self.export.target().clone(), self.writer.clone()),
		};
		self.server.start(context);
		info!(uri = ?self.server.uri(), "preview.server_started");
	}

	fn sync_export_target(&self) {
		self.export.target().set(self.export_path());
	}

	fn update_status_view(&mut self) {
		let state = self.view_state();
		self.status_view.update(&state);
	}

	fn update_slide_list(&mut self) {
		let state = self.view_state();
		self.slide_list.update(&state);
	}
}
