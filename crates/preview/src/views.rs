use slidesync_primitives::Position;

/// Snapshot auxiliary views render from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
	/// Current position, absent without a bound document.
	pub position: Option<Position>,
	pub slide_count: usize,
	pub slide_titles: Vec<String>,
	pub server_uri: Option<String>,
	pub is_listening: bool,
}

/// A view (status indicator, slide list) refreshed from current state.
///
/// Updates must be idempotent.
pub trait AuxiliaryView: Send {
	fn update(&mut self, state: &ViewState);
}

/// Host action that brings a render surface into existence.
pub trait PreviewLauncher: Send {
	fn open_preview(&self);
}
