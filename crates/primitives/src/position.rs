use std::fmt;

use serde::{Deserialize, Serialize};

/// Coordinate of the visible slide.
///
/// `horizontal` is the top-level slide index, `vertical` the index inside that
/// slide's vertical stack. Both are zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
	/// Top-level slide index.
	pub horizontal: usize,
	/// Nested slide index.
	pub vertical: usize,
}

impl Position {
	pub const fn new(horizontal: usize, vertical: usize) -> Self {
		Self { horizontal, vertical }
	}
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.horizontal, self.vertical)
	}
}

impl From<(usize, usize)> for Position {
	fn from((horizontal, vertical): (usize, usize)) -> Self {
		Self { horizontal, vertical }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn displays_as_fragment_segment() {
		assert_eq!(Position::new(2, 1).to_string(), "2/1");
		assert_eq!(Position::default().to_string(), "0/0");
	}
}
