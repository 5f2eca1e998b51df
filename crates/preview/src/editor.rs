use std::fmt;
use std::path::Path;

use slidesync_primitives::EditorId;

/// Language id of documents slidesync binds to.
pub const MARKDOWN_LANGUAGE_ID: &str = "markdown";

/// Handle to an open text editor in the host.
pub trait TextEditor: fmt::Debug + Send + Sync {
	fn id(&self) -> EditorId;
	fn language_id(&self) -> &str;
	fn path(&self) -> &Path;
	/// Current buffer content, including unsaved edits.
	fn text(&self) -> String;

	fn is_markdown(&self) -> bool {
		self.language_id() == MARKDOWN_LANGUAGE_ID
	}
}
