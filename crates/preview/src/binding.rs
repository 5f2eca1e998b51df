//! Pairing of the active editor with its parsed slides.

use std::path::Path;
use std::sync::Arc;

use slidesync_config::{ConfigOverlay, Configuration};
use slidesync_primitives::{CursorLocation, EditorId, Position, Slide, SlideBoundaries};
use tracing::{debug, warn};

use crate::{PositionModel, SlideParser, TextEditor};

/// An open editor bound to its slide model.
///
/// Slides reflect the editor content as of the last [`refresh`](Self::refresh);
/// edits in between are not observed.
#[derive(Debug)]
pub struct DocumentBinding {
	editor: Arc<dyn TextEditor>,
	parser: Arc<dyn SlideParser>,
	slides: Vec<Slide>,
	boundaries: SlideBoundaries,
	front_matter: Option<ConfigOverlay>,
	position: PositionModel,
}

impl DocumentBinding {
	/// Binds `editor` and parses its current content.
	pub fn new(editor: Arc<dyn TextEditor>, base: &Configuration, parser: Arc<dyn SlideParser>) -> Self {
		let mut binding = Self {
			editor,
			parser,
			slides: Vec::new(),
			boundaries: SlideBoundaries::default(),
			front_matter: None,
			position: PositionModel::default(),
		};
		binding.refresh(base);
		binding
	}

	/// Re-derives slides from the editor's latest content.
	///
	/// The position is kept as is, even when the slide count shrank.
	pub fn refresh(&mut self, base: &Configuration) {
		let text = self.editor.text();
		match self.parser.parse(&text, base) {
			Ok(doc) => {
				self.slides = doc.slides;
				self.front_matter = doc.front_matter;
			}
			Err(error) => {
				warn!(path = %self.editor.path().display(), %error, "document.parse_failed");
				self.slides = Vec::new();
				self.front_matter = None;
			}
		}
		self.boundaries = SlideBoundaries::from_slides(&self.slides);
		debug!(
			path = %self.editor.path().display(),
			slides = self.slides.len(),
			"document.refresh"
		);
	}

	pub fn editor_id(&self) -> EditorId {
		self.editor.id()
	}

	pub fn slides(&self) -> &[Slide] {
		&self.slides
	}

	/// Number of top-level slides.
	pub fn slide_count(&self) -> usize {
		self.slides.len()
	}

	/// Directory containing the document.
	pub fn dirname(&self) -> &Path {
		self.editor.path().parent().unwrap_or_else(|| Path::new(""))
	}

	pub fn has_front_config(&self) -> bool {
		self.front_matter.is_some()
	}

	/// Overrides declared in front matter, empty when there are none.
	pub fn document_options(&self) -> ConfigOverlay {
		self.front_matter.clone().unwrap_or_default()
	}

	/// Base configuration with this document's overrides applied.
	pub fn effective_configuration(&self, base: &Configuration) -> Configuration {
		match &self.front_matter {
			Some(overlay) => base.effective(overlay),
			None => base.clone(),
		}
	}

	pub fn is_markdown_file(&self) -> bool {
		self.editor.is_markdown()
	}

	pub fn position(&self) -> Position {
		self.position.current()
	}

	/// Moves the position to the slide containing `cursor`, using the slide
	/// table from the last refresh.
	pub fn update_position(&mut self, cursor: CursorLocation) {
		self.position.update_position(&self.boundaries, cursor);
	}

	pub fn go_to_slide(&mut self, horizontal: usize, vertical: usize) {
		self.position.go_to_slide(horizontal, vertical);
	}

	/// Returns true if `position` names a slide in the current table.
	pub fn contains(&self, position: Position) -> bool {
		self.boundaries.contains(position)
	}
}

/// The document slot of the orchestrator: at most one binding is live.
#[derive(Debug, Default)]
pub enum DocumentSlot {
	#[default]
	Unbound,
	Bound(DocumentBinding),
}

impl DocumentSlot {
	pub fn as_bound(&self) -> Option<&DocumentBinding> {
		match self {
			Self::Bound(binding) => Some(binding),
			Self::Unbound => None,
		}
	}

	pub fn as_bound_mut(&mut self) -> Option<&mut DocumentBinding> {
		match self {
			Self::Bound(binding) => Some(binding),
			Self::Unbound => None,
		}
	}

	pub fn is_bound(&self) -> bool {
		matches!(self, Self::Bound(_))
	}
}
