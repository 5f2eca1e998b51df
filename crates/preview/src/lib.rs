//! Live preview orchestration for slide decks written in markdown.
//!
//! Three views of one document move independently: the editor's cursor, the
//! presentation's current slide, and the surface that displays the
//! presentation. [`Orchestrator`] owns the shared state and refreshes each view
//! in a fixed order when the editor host reports an event.
//!
//! # Components
//!
//! | Type | Role |
//! |------|------|
//! | [`PositionModel`] | Current slide coordinate derived from the cursor |
//! | [`DocumentBinding`] | Active editor paired with its parsed slides and overrides |
//! | [`RenderSurfaceProxy`] | Pushes the presentation address into the attached surface |
//! | [`ExportCoordinator`] | Resolves an export once the surface has been quiet for [`EXPORT_QUIET_PERIOD`] |
//! | [`Orchestrator`] | Reacts to host events and drives the above |
//!
//! # Event ordering
//!
//! On a selection change the surface is pushed the position computed from the
//! slide table as of the last refresh, and only then is the binding re-parsed.
//! Auxiliary views always refresh last so they observe fully updated state.
//!
//! # Runtime
//!
//! Export uses tokio timers. [`Orchestrator::start_export`] and
//! [`Orchestrator::is_in_export`] must be called from within a tokio runtime
//! with the time driver enabled. Everything else is synchronous.

mod binding;
mod debounce;
mod editor;
mod error;
mod export;
mod orchestrator;
mod parser;
mod position;
mod server;
mod surface;
mod views;

pub use binding::{DocumentBinding, DocumentSlot};
pub use debounce::Debounce;
pub use editor::{MARKDOWN_LANGUAGE_ID, TextEditor};
pub use error::{ExportError, ParseError};
pub use export::{
	EXPORT_QUIET_PERIOD, ExportCoordinator, ExportFuture, ExportResult, ExportStatus, ExportTarget,
	ExportWriter, FsExportWriter, SaveHandle,
};
pub use orchestrator::{Collaborators, HostEvent, Orchestrator};
pub use parser::{MarkdownSlideParser, ParsedDocument, SlideParser};
pub use position::PositionModel;
pub use server::{BackingServer, PresentationSnapshot, ServerContext};
pub use surface::{
	PLACEHOLDER_MARKUP, RenderSurface, RenderSurfaceProxy, SurfaceBinding, container_markup, format_uri,
};
pub use views::{AuxiliaryView, PreviewLauncher, ViewState};
