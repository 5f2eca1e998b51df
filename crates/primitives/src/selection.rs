use serde::{Deserialize, Serialize};

/// Opaque identity of an editor instance in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EditorId(pub u64);

/// Zero-based line/character location of a cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CursorLocation {
	pub line: usize,
	pub character: usize,
}

impl CursorLocation {
	pub const fn new(line: usize, character: usize) -> Self {
		Self { line, character }
	}
}

/// A selection as reported by the editor host.
///
/// The anchor is where the selection started; `active` is where the caret is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
	pub anchor: CursorLocation,
	pub active: CursorLocation,
}

impl Selection {
	pub const fn new(anchor: CursorLocation, active: CursorLocation) -> Self {
		Self { anchor, active }
	}

	/// A collapsed selection (plain caret) at `line`/`character`.
	pub const fn caret(line: usize, character: usize) -> Self {
		let at = CursorLocation::new(line, character);
		Self { anchor: at, active: at }
	}
}
