//! Render surface binding and presentation addresses.

use slidesync_primitives::Position;
use tracing::{debug, trace};

/// Markup shown when there is no presentation to embed.
pub const PLACEHOLDER_MARKUP: &str = "<style>html, body { height: 100%; margin: 0; display: flex; align-items: center; justify-content: center; font-family: sans-serif; }</style><p>No presentation available. Open a markdown document to preview it.</p>";

/// A visual surface that displays markup.
pub trait RenderSurface: Send {
	fn set_html(&mut self, html: &str);
}

/// The attached render surface, if any.
#[derive(Default)]
pub enum SurfaceBinding {
	#[default]
	Unbound,
	Bound(Box<dyn RenderSurface>),
}

impl std::fmt::Debug for SurfaceBinding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Unbound => f.write_str("Unbound"),
			Self::Bound(_) => f.write_str("Bound(..)"),
		}
	}
}

/// Owns the surface reference and pushes addresses into it.
#[derive(Debug, Default)]
pub struct RenderSurfaceProxy {
	binding: SurfaceBinding,
}

impl RenderSurfaceProxy {
	pub fn is_bound(&self) -> bool {
		matches!(self.binding, SurfaceBinding::Bound(_))
	}

	/// Re-renders the surface with `uri` embedded.
	///
	/// A `replacement` surface replaces the previously bound one. Without any
	/// bound surface this does nothing. An absent `uri` renders
	/// [`PLACEHOLDER_MARKUP`].
	pub fn refresh(&mut self, replacement: Option<Box<dyn RenderSurface>>, uri: Option<&str>) {
		if let Some(surface) = replacement {
			debug!(replaced = self.is_bound(), "surface.attach");
			self.binding = SurfaceBinding::Bound(surface);
		}
		let SurfaceBinding::Bound(surface) = &mut self.binding else {
			trace!("surface.refresh_unbound");
			return;
		};
		match uri {
			Some(uri) => {
				trace!(uri, "surface.refresh");
				surface.set_html(&container_markup(uri));
			}
			None => {
				trace!("surface.refresh_placeholder");
				surface.set_html(PLACEHOLDER_MARKUP);
			}
		}
	}

	/// Drops the bound surface, e.g. when the host disposed it.
	pub fn detach(&mut self) -> Option<Box<dyn RenderSurface>> {
		match std::mem::take(&mut self.binding) {
			SurfaceBinding::Bound(surface) => Some(surface),
			SurfaceBinding::Unbound => None,
		}
	}
}

/// Full-size frame embedding `uri`.
pub fn container_markup(uri: &str) -> String {
	let src = uri.replace('&', "&amp;").replace('"', "&quot;");
	format!(
		"<style>html, body, iframe {{ height: 100%; margin: 0; padding: 0; }}</style>\
		 <iframe src=\"{src}\" frameborder=\"0\" style=\"width: 100%; height: 100%; border: none\"></iframe>"
	)
}

/// Presentation address, optionally with a `#/h/v/millis` fragment.
///
/// The trailing timestamp makes every navigation a new address so the frame
/// never serves it from cache.
pub fn format_uri(base: &str, position: Option<Position>, epoch_millis: i64) -> String {
	match position {
		Some(Position { horizontal, vertical }) => format!("{base}#/{horizontal}/{vertical}/{epoch_millis}"),
		None => base.to_string(),
	}
}
